use log::debug;

use crate::config::{tiles, SceneConfig, BOSS_COUNT, ENEMY1_COUNT, ENEMY2_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::try_array;
use crate::error::PoolError;
use crate::oam::{ObjectDescriptor, ObjectId, ObjectPool, ShapeClass};

/// Enemy hit box edge, measured from the sprite's top-left corner.
pub const ENEMY_EXTENT: i32 = 12;
/// Height of a bullet sprite.
pub const BULLET_EXTENT: i32 = 8;
/// An Alive enemy whose y reaches this line has broken through.
pub const BREACH_LINE: i32 = SCREEN_HEIGHT - ENEMY_EXTENT;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnemyClass {
    Enemy1,
    Enemy2,
    Boss,
}

impl EnemyClass {
    /// Collision iteration order.
    pub const ALL: [EnemyClass; 3] = [EnemyClass::Enemy1, EnemyClass::Enemy2, EnemyClass::Boss];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static pool size for this class.
    pub const fn capacity(self) -> usize {
        match self {
            EnemyClass::Enemy1 => ENEMY1_COUNT,
            EnemyClass::Enemy2 => ENEMY2_COUNT,
            EnemyClass::Boss => BOSS_COUNT,
        }
    }

    pub const fn tile(self) -> u16 {
        match self {
            EnemyClass::Enemy1 => tiles::ENEMY1,
            EnemyClass::Enemy2 => tiles::ENEMY2,
            EnemyClass::Boss => tiles::BOSS,
        }
    }

    /// How far a bullet's box reaches right of its x when tested against
    /// this class.
    pub const fn bullet_reach(self) -> i32 {
        match self {
            EnemyClass::Enemy1 => 8,
            EnemyClass::Enemy2 | EnemyClass::Boss => 4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// Allocated but never spawned.
    Dormant,
    Alive,
    /// Destroyed; only a formation spawn brings it back.
    Dead,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    class: EnemyClass,
    object: ObjectId,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    state: EnemyState,
    /// Descent steps since the last spawn.
    frame: u8,
    counter: u16,
    delay: u16,
}

impl Enemy {
    /// Allocate a Dormant enemy, parked off screen.
    pub fn new(pool: &mut ObjectPool, class: EnemyClass, config: &SceneConfig) -> Result<Self, PoolError> {
        let object = pool.try_allocate(&ObjectDescriptor::new(
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            ShapeClass::Size16x16,
            class.tile(),
        ))?;

        Ok(Self {
            class,
            object,
            x: SCREEN_WIDTH,
            y: SCREEN_HEIGHT,
            health: config.health_of(class),
            state: EnemyState::Dormant,
            frame: 0,
            counter: 0,
            delay: config.descent_delay_of(class).max(1),
        })
    }

    #[inline]
    pub fn class(&self) -> EnemyClass {
        self.class
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    #[inline]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Place the enemy, restore its health and raise it to Alive.
    pub fn spawn(&mut self, pool: &mut ObjectPool, x: i32, y: i32, health: i32) {
        self.x = x;
        self.y = y;
        self.health = health;
        self.state = EnemyState::Alive;
        self.frame = 0;
        self.counter = 0;
        pool[self.object].set_position(x, y);
    }

    /// One frame of motion: every `delay` frames the enemy drops a pixel.
    pub fn update(&mut self, pool: &mut ObjectPool) {
        if !self.is_alive() {
            return;
        }

        self.counter += 1;
        if self.counter >= self.delay {
            self.y += 1;
            pool[self.object].move_by(0, 1);
            self.frame = self.frame.wrapping_add(1);
            self.counter = 0;
        }
    }

    /// Subtract `damage` and run the death check. Returns true if this hit
    /// killed the enemy.
    pub fn take_damage(&mut self, pool: &mut ObjectPool, damage: i32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.check_death(pool)
    }

    /// Alive → Dead once health is gone; the sprite leaves the playfield on
    /// the same update.
    pub fn check_death(&mut self, pool: &mut ObjectPool) -> bool {
        if self.is_alive() && self.health <= 0 {
            self.state = EnemyState::Dead;
            self.x = SCREEN_WIDTH;
            self.y = SCREEN_HEIGHT;
            pool[self.object].set_position(SCREEN_WIDTH, SCREEN_HEIGHT);
            debug!("{:?} in slot {} destroyed", self.class, self.object.index());
            true
        } else {
            false
        }
    }

    /// Whether a bullet whose top-left corner is at `(bx, by)` overlaps this
    /// enemy's hit box.
    pub fn is_hit_by(&self, bx: i32, by: i32) -> bool {
        self.is_alive()
            && bx + self.class.bullet_reach() >= self.x
            && bx <= self.x + ENEMY_EXTENT
            && by <= self.y + ENEMY_EXTENT
            && by + BULLET_EXTENT >= self.y
    }

    pub fn has_breached(&self) -> bool {
        self.is_alive() && self.y >= BREACH_LINE
    }
}

/// The three static enemy pools of a scene.
#[derive(Clone, Debug)]
pub struct Enemies {
    pub enemy1: [Enemy; ENEMY1_COUNT],
    pub enemy2: [Enemy; ENEMY2_COUNT],
    pub bosses: [Enemy; BOSS_COUNT],
}

impl Enemies {
    pub fn new(pool: &mut ObjectPool, config: &SceneConfig) -> Result<Self, PoolError> {
        Ok(Self {
            enemy1: try_array(|_| Enemy::new(pool, EnemyClass::Enemy1, config))?,
            enemy2: try_array(|_| Enemy::new(pool, EnemyClass::Enemy2, config))?,
            bosses: try_array(|_| Enemy::new(pool, EnemyClass::Boss, config))?,
        })
    }

    pub fn of(&self, class: EnemyClass) -> &[Enemy] {
        match class {
            EnemyClass::Enemy1 => &self.enemy1,
            EnemyClass::Enemy2 => &self.enemy2,
            EnemyClass::Boss => &self.bosses,
        }
    }

    pub fn of_mut(&mut self, class: EnemyClass) -> &mut [Enemy] {
        match class {
            EnemyClass::Enemy1 => &mut self.enemy1,
            EnemyClass::Enemy2 => &mut self.enemy2,
            EnemyClass::Boss => &mut self.bosses,
        }
    }

    /// Every enemy, enemy1 pool first, then enemy2, then bosses.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemy1.iter().chain(self.enemy2.iter()).chain(self.bosses.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemy1
            .iter_mut()
            .chain(self.enemy2.iter_mut())
            .chain(self.bosses.iter_mut())
    }

    pub fn alive(&self) -> usize {
        self.iter().filter(|e| e.is_alive()).count()
    }
}
