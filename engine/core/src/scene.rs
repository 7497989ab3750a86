//! # Scene
//!
//! Every entity of one play session, allocated once into the pool in a
//! fixed order:
//!
//! | Slots   | Entity                |
//! |---------|-----------------------|
//! | 0       | player                |
//! | 1-20    | enemy1 pool           |
//! | 21-40   | enemy2 pool           |
//! | 41-43   | bosses                |
//! | 44-63   | player bullets        |
//! | 64      | enemy bullet          |
//! | 65-70   | score label, digits   |
//!
//! [`Scene::update`] is the whole simulation step for one frame. It only
//! writes to the pool it is handed; committing is the caller's business.

use log::debug;

use crate::combat::{self, Hit};
use crate::config::{SceneConfig, PLAYER_BULLET_COUNT, SCREEN_WIDTH};
use crate::entities::enemy::ENEMY_EXTENT;
use crate::entities::{try_array, Bullet, BulletOwner, Enemies, EnemyClass, Hud, MoveIntent, Player, Score};
use crate::error::PoolError;
use crate::formations::{self, FormationId};
use crate::input::ButtonState;
use crate::oam::ObjectPool;
use crate::tiles::{resolve_tile, BackgroundScroll, TileMap};

/// Where the enemy bullet sits before its first shot.
const ENEMY_BULLET_START: (i32, i32) = (136, 64);

/// What happened during one [`Scene::update`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameEvents {
    /// Enemies destroyed this frame.
    pub kills: u32,
    /// Hits that did not destroy their target.
    pub wounds: u32,
    pub shots_fired: u32,
    pub player_hit: bool,
}

pub struct Scene {
    config: SceneConfig,
    pub player: Player,
    pub enemies: Enemies,
    pub bullets: [Bullet; PLAYER_BULLET_COUNT],
    pub enemy_bullet: Bullet,
    pub hud: Hud,
    pub background: BackgroundScroll,
    score: Score,
    kills: u32,
    formation: FormationId,
    fire_counter: u16,
}

impl Scene {
    /// Allocate every entity. Fails only if the pool was already too full
    /// to take the whole scene.
    pub fn new(pool: &mut ObjectPool, config: SceneConfig) -> Result<Self, PoolError> {
        let player = Player::new(pool, &config)?;
        let enemies = Enemies::new(pool, &config)?;
        let bullets = try_array(|_| Bullet::new(pool, BulletOwner::Player, SCREEN_WIDTH / 2, 0))?;
        let (ex, ey) = ENEMY_BULLET_START;
        let enemy_bullet = Bullet::new(pool, BulletOwner::Enemy, ex, ey)?;
        let hud = Hud::new(pool)?;
        debug!("scene allocated {} of {} objects", pool.allocated(), ObjectPool::CAPACITY);

        Ok(Self {
            background: BackgroundScroll::new(config.scroll_period),
            player,
            enemies,
            bullets,
            enemy_bullet,
            hud,
            score: Score::new(),
            kills: 0,
            formation: FormationId::FIRST,
            fire_counter: 0,
            config,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// The formation most recently spawned.
    pub fn formation(&self) -> FormationId {
        self.formation
    }

    /// One frame of simulation.
    pub fn update(&mut self, pool: &mut ObjectPool, buttons: &ButtonState) -> FrameEvents {
        let mut events = FrameEvents::default();

        let intent = self.player.steer(pool, buttons);
        self.player.animate(pool);

        // the trigger only counts on frames the ship holds still
        if intent == MoveIntent::Idle && Player::wants_to_fire(buttons) && self.fire_player_bullet(pool) {
            events.shots_fired += 1;
        }

        for enemy in self.enemies.iter_mut() {
            enemy.update(pool);
        }

        let Enemies {
            enemy1,
            enemy2,
            bosses,
        } = &mut self.enemies;
        for bullet in &mut self.bullets {
            match combat::advance_bullet(bullet, enemy1, enemy2, bosses, pool, &self.config) {
                Some(Hit { class, killed: true, .. }) => {
                    self.score.add(self.config.points_for(class));
                    self.kills += 1;
                    events.kills += 1;
                }
                Some(_) => events.wounds += 1,
                None => {}
            }
        }

        if self.enemy_bullet.advance(pool) {
            events.player_hit =
                combat::resolve_player_hit(&mut self.enemy_bullet, &mut self.player, pool, &self.config);
        }

        self.background.tick();
        self.hud.show(pool, self.score);
        self.fire_counter = self.fire_counter.saturating_add(1);

        events
    }

    /// Launch the first idle player bullet from the ship, if the cooldown
    /// allows it.
    fn fire_player_bullet(&mut self, pool: &mut ObjectPool) -> bool {
        if self.fire_counter < self.config.fire_cooldown {
            return false;
        }
        let Some(bullet) = self.bullets.iter_mut().find(|b| !b.is_active()) else {
            return false;
        };

        let (x, y) = self.player.muzzle();
        bullet.fire(pool, x, y, self.config.player_bullet_velocity);
        self.fire_counter = 0;
        true
    }

    /// Fire the enemy bullet from below an Alive enemy. Does nothing if the
    /// bullet is already in flight or the enemy is not Alive.
    pub fn fire_enemy_bullet(&mut self, pool: &mut ObjectPool, class: EnemyClass, index: usize) -> bool {
        let Some(enemy) = self.enemies.of(class).get(index).filter(|e| e.is_alive()) else {
            return false;
        };
        let (x, y) = (enemy.x + 4, enemy.y + ENEMY_EXTENT);
        self.enemy_bullet.fire(pool, x, y, self.config.enemy_bullet_velocity)
    }

    pub fn spawn_formation(&mut self, pool: &mut ObjectPool, id: FormationId) -> usize {
        self.formation = id;
        let Enemies {
            enemy1,
            enemy2,
            bosses,
        } = &mut self.enemies;
        formations::spawn(id, enemy1, enemy2, bosses, pool, &self.config)
    }

    pub fn formation_cleared(&self) -> bool {
        formations::formation_cleared(&self.enemies.enemy1, &self.enemies.enemy2, &self.enemies.bosses)
    }

    /// Spawn the next formation once the current one is cleared. Returns the
    /// new formation if one was spawned.
    pub fn advance_formation(&mut self, pool: &mut ObjectPool) -> Option<FormationId> {
        if !self.formation_cleared() {
            return None;
        }
        let next = self.formation.next();
        self.spawn_formation(pool, next);
        Some(next)
    }

    /// True when any Alive enemy has reached the bottom of the playfield.
    pub fn breached(&self) -> bool {
        self.enemies.iter().any(|e| e.has_breached())
    }

    /// Background tile under a screen pixel, with the current scroll.
    pub fn tile_under(&self, x: i32, y: i32, map: &TileMap<'_>) -> u16 {
        resolve_tile(x, y, self.background.x, self.background.y, map)
    }
}
