use crate::config::{tiles, SCREEN_HEIGHT};
use crate::error::PoolError;
use crate::oam::{ObjectDescriptor, ObjectId, ObjectPool, ShapeClass};

/// Where an idle bullet waits: above and left of the playfield, so it
/// wraps to x = 496, y = 240 in hardware.
pub const REST_POSITION: (i32, i32) = (-16, -16);

/// Decides which collision set a bullet is tested against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

impl BulletOwner {
    const fn tile(self) -> u16 {
        match self {
            BulletOwner::Player => tiles::PLAYER_BULLET,
            BulletOwner::Enemy => tiles::ENEMY_BULLET,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BulletState {
    Inactive,
    Active,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    owner: BulletOwner,
    object: ObjectId,
    pub x: i32,
    pub y: i32,
    velocity: i32,
    state: BulletState,
}

impl Bullet {
    /// Allocate an Inactive bullet with its sprite at `(x, y)` until the
    /// first update parks it.
    pub fn new(pool: &mut ObjectPool, owner: BulletOwner, x: i32, y: i32) -> Result<Self, PoolError> {
        let object = pool.try_allocate(&ObjectDescriptor::new(x, y, ShapeClass::Size8x8, owner.tile()))?;
        Ok(Self {
            owner,
            object,
            x,
            y,
            velocity: 0,
            state: BulletState::Inactive,
        })
    }

    #[inline]
    pub fn owner(&self) -> BulletOwner {
        self.owner
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    #[inline]
    pub fn state(&self) -> BulletState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == BulletState::Active
    }

    #[inline]
    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Launch from `(x, y)`. Does nothing and returns false if the bullet is
    /// already in flight.
    pub fn fire(&mut self, pool: &mut ObjectPool, x: i32, y: i32, velocity: i32) -> bool {
        if self.is_active() {
            return false;
        }
        self.x = x;
        self.y = y;
        self.velocity = velocity;
        self.state = BulletState::Active;
        pool[self.object].set_position(x, y);
        true
    }

    /// Active → Inactive: stop and park off screen.
    pub fn deactivate(&mut self, pool: &mut ObjectPool) {
        self.state = BulletState::Inactive;
        self.enforce_rest(pool);
    }

    /// Re-apply the off-screen rest state. Idempotent.
    pub fn enforce_rest(&mut self, pool: &mut ObjectPool) {
        self.velocity = 0;
        (self.x, self.y) = REST_POSITION;
        pool[self.object].set_position(self.x, self.y);
    }

    /// True once an Active bullet has reached the edge it is travelling to.
    pub fn left_playfield(&self) -> bool {
        match self.velocity {
            v if v < 0 => self.y <= 0,
            v if v > 0 => self.y >= SCREEN_HEIGHT,
            _ => false,
        }
    }

    /// One frame of motion. Returns true if the bullet is still in flight
    /// and should be tested for hits this frame.
    pub fn advance(&mut self, pool: &mut ObjectPool) -> bool {
        match self.state {
            BulletState::Inactive => {
                self.enforce_rest(pool);
                false
            }
            BulletState::Active if self.left_playfield() => {
                self.deactivate(pool);
                false
            }
            BulletState::Active => {
                self.y += self.velocity;
                pool[self.object].set_position(self.x, self.y);
                true
            }
        }
    }
}
