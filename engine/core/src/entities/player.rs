use crate::config::{tiles, SceneConfig};
use crate::entities::enemy::BULLET_EXTENT;
use crate::error::PoolError;
use crate::input::{Button, ButtonState};
use crate::oam::{ObjectDescriptor, ObjectId, ObjectPool, ShapeClass};

/// Player hit box edge.
pub const PLAYER_EXTENT: i32 = 16;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MoveIntent {
    #[default]
    Idle,
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Player {
    object: ObjectId,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    move_intent: MoveIntent,
    frame: u8,
    counter: u16,
    animation_delay: u16,
    border: i32,
    speed: i32,
    min_x: i32,
    max_x: i32,
}

impl Player {
    pub fn new(pool: &mut ObjectPool, config: &SceneConfig) -> Result<Self, PoolError> {
        let (x, y) = config.player_start;
        let object = pool.try_allocate(&ObjectDescriptor::new(x, y, ShapeClass::Size16x16, tiles::PLAYER))?;
        Ok(Self {
            object,
            x,
            y,
            health: config.player_health,
            move_intent: MoveIntent::Idle,
            frame: 0,
            counter: 0,
            animation_delay: config.player_animation_delay.max(1),
            border: config.player_border,
            speed: config.player_speed,
            min_x: config.player_min_x,
            max_x: config.player_max_x,
        })
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    #[inline]
    pub fn move_intent(&self) -> MoveIntent {
        self.move_intent
    }

    #[inline]
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Margin kept clear around the ship by the outer game.
    #[inline]
    pub fn border(&self) -> i32 {
        self.border
    }

    /// Apply this frame's directional input. Right wins over Left.
    pub fn steer(&mut self, pool: &mut ObjectPool, buttons: &ButtonState) -> MoveIntent {
        self.move_intent = if buttons.is_pressed(Button::Right) && self.x < self.max_x {
            self.x = (self.x + self.speed).min(self.max_x);
            MoveIntent::Right
        } else if buttons.is_pressed(Button::Left) && self.x > self.min_x {
            self.x = (self.x - self.speed).max(self.min_x);
            MoveIntent::Left
        } else {
            MoveIntent::Idle
        };

        pool[self.object].set_position(self.x, self.y);
        self.move_intent
    }

    /// Advance the ship's animation while it is moving.
    pub fn animate(&mut self, pool: &mut ObjectPool) {
        if self.move_intent == MoveIntent::Idle {
            return;
        }

        self.counter += 1;
        if self.counter >= self.animation_delay {
            self.frame = (self.frame + 1) % tiles::PLAYER_FRAMES;
            pool[self.object]
                .set_tile_offset(tiles::PLAYER + self.frame as u16 * tiles::PLAYER_FRAME_STRIDE);
            self.counter = 0;
        }
    }

    pub fn wants_to_fire(buttons: &ButtonState) -> bool {
        buttons.is_pressed(Button::Select) || buttons.is_pressed(Button::A)
    }

    /// Where a new player bullet appears.
    pub fn muzzle(&self) -> (i32, i32) {
        (self.x + 4, self.y - 2)
    }

    /// Whether a bullet at `(bx, by)` overlaps the ship.
    pub fn is_hit_by(&self, bx: i32, by: i32) -> bool {
        bx + BULLET_EXTENT >= self.x
            && bx <= self.x + PLAYER_EXTENT
            && by + BULLET_EXTENT >= self.y
            && by <= self.y + PLAYER_EXTENT
    }

    /// Health never drops below zero.
    pub fn take_damage(&mut self, damage: i32) {
        self.health = self.health.saturating_sub(damage).max(0);
    }

    /// For the game-over logic outside the core; nothing here reacts to it.
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}
