//! # Combat
//!
//! Linear box tests between bullets and their targets. A bullet hits at
//! most one target per frame: the scan stops at the first overlap, in pool
//! order enemy1 → enemy2 → boss.

use crate::config::SceneConfig;
use crate::entities::{Bullet, BulletOwner, Enemy, EnemyClass, Player};
use crate::oam::ObjectPool;

/// What a player bullet struck.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    pub class: EnemyClass,
    pub index: usize,
    pub killed: bool,
}

/// Test one Active player bullet against every Alive enemy. On the first
/// overlap the enemy takes damage, runs its death check, and the bullet is
/// deactivated.
pub fn resolve_bullet_collisions(
    bullet: &mut Bullet,
    enemy1s: &mut [Enemy],
    enemy2s: &mut [Enemy],
    bosses: &mut [Enemy],
    pool: &mut ObjectPool,
    config: &SceneConfig,
) -> Option<Hit> {
    if !bullet.is_active() || bullet.owner() != BulletOwner::Player {
        return None;
    }

    let (bx, by) = (bullet.x, bullet.y);
    let pools = [
        (EnemyClass::Enemy1, enemy1s),
        (EnemyClass::Enemy2, enemy2s),
        (EnemyClass::Boss, bosses),
    ];

    for (class, enemies) in pools {
        let Some((index, enemy)) = enemies.iter_mut().enumerate().find(|(_, e)| e.is_hit_by(bx, by)) else {
            continue;
        };
        let killed = enemy.take_damage(pool, config.bullet_damage);
        bullet.deactivate(pool);
        return Some(Hit { class, index, killed });
    }

    None
}

/// One frame for a player bullet: move it, then collide it.
pub fn advance_bullet(
    bullet: &mut Bullet,
    enemy1s: &mut [Enemy],
    enemy2s: &mut [Enemy],
    bosses: &mut [Enemy],
    pool: &mut ObjectPool,
    config: &SceneConfig,
) -> Option<Hit> {
    if bullet.advance(pool) {
        resolve_bullet_collisions(bullet, enemy1s, enemy2s, bosses, pool, config)
    } else {
        None
    }
}

/// Test an Active enemy bullet against the player. Returns true on a hit,
/// after the damage is applied and the bullet parked.
pub fn resolve_player_hit(bullet: &mut Bullet, player: &mut Player, pool: &mut ObjectPool, config: &SceneConfig) -> bool {
    if !bullet.is_active() || bullet.owner() != BulletOwner::Enemy || !player.is_hit_by(bullet.x, bullet.y) {
        return false;
    }
    player.take_damage(config.bullet_damage);
    bullet.deactivate(pool);
    true
}
