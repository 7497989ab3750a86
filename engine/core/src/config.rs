//! # Build Configuration
//!
//! Pool sizes, tile layout and tunables for one target build. The constants
//! size the static entity arrays and therefore cannot change at run time;
//! [`SceneConfig`] carries everything that can.

use crate::entities::EnemyClass;

/// Visible screen width in pixels.
pub const SCREEN_WIDTH: i32 = 240;
/// Visible screen height in pixels, also the first blanking scanline.
pub const SCREEN_HEIGHT: i32 = 160;

/// Number of hardware object records.
pub const MAX_OBJECTS: usize = 128;

pub const ENEMY1_COUNT: usize = 20;
pub const ENEMY2_COUNT: usize = 20;
pub const BOSS_COUNT: usize = 3;
pub const PLAYER_BULLET_COUNT: usize = 20;
pub const SCORE_DIGITS: usize = 5;

/// Total enemies across every class pool.
pub const ENEMY_TOTAL: usize = ENEMY1_COUNT + ENEMY2_COUNT + BOSS_COUNT;

/// First tile index of each sprite in object tile memory (1D mapping,
/// 256-colour, so one 8×8 tile spans two index units).
pub mod tiles {
    pub const PLAYER: u16 = 0;
    pub const BOSS: u16 = 8;
    pub const ENEMY1: u16 = 16;
    pub const ENEMY2: u16 = 24;
    pub const SCORE_LABEL: u16 = 32;
    pub const PLAYER_BULLET: u16 = 40;
    pub const ENEMY_BULLET: u16 = 42;
    pub const DIGIT_ZERO: u16 = 44;
    /// Index distance between consecutive numerals.
    pub const DIGIT_STRIDE: u16 = 2;
    /// Animation frames stored for the player ship, `PLAYER_FRAME_STRIDE` apart.
    pub const PLAYER_FRAMES: u8 = 1;
    pub const PLAYER_FRAME_STRIDE: u16 = 8;
}

/// Run-time tunables. [`Default`] is the reference build.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub bullet_damage: i32,
    pub enemy_health: [i32; 3],
    /// Frames between one-pixel descents, per class.
    pub enemy_descent_delay: [u16; 3],
    pub points_per_kill: [u32; 3],

    pub player_health: i32,
    pub player_start: (i32, i32),
    pub player_speed: i32,
    pub player_min_x: i32,
    pub player_max_x: i32,
    pub player_border: i32,
    pub player_animation_delay: u16,

    /// Frames between two player shots.
    pub fire_cooldown: u16,
    pub player_bullet_velocity: i32,
    pub enemy_bullet_velocity: i32,

    /// Frames between one-pixel background scroll steps.
    pub scroll_period: u16,
}

impl SceneConfig {
    #[inline]
    pub fn health_of(&self, class: EnemyClass) -> i32 {
        self.enemy_health[class.index()]
    }

    #[inline]
    pub fn descent_delay_of(&self, class: EnemyClass) -> u16 {
        self.enemy_descent_delay[class.index()]
    }

    #[inline]
    pub fn points_for(&self, class: EnemyClass) -> u32 {
        self.points_per_kill[class.index()]
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bullet_damage: 10,
            enemy_health: [10, 10, 10],
            enemy_descent_delay: [12, 12, 12],
            points_per_kill: [10, 20, 50],

            player_health: 30,
            player_start: (112, 144),
            player_speed: 1,
            player_min_x: 0,
            player_max_x: 224,
            player_border: 40,
            player_animation_delay: 8,

            fire_cooldown: 30,
            player_bullet_velocity: -1,
            enemy_bullet_velocity: 1,

            scroll_period: 3,
        }
    }
}
