//! # Entities
//!
//! Every entity is created once at scene setup and bound to one pool slot
//! for its whole life. "Destroying" an entity only parks its sprite off
//! screen and clears its state; nothing is ever freed.

pub mod bullet;
pub mod enemy;
pub mod hud;
pub mod player;

pub use bullet::{Bullet, BulletOwner, BulletState};
pub use enemy::{Enemies, Enemy, EnemyClass, EnemyState};
pub use hud::{Digit, Hud, Score};
pub use player::{MoveIntent, Player};

use crate::error::PoolError;

/// Build a fixed array from a fallible per-slot constructor, stopping at
/// the first error.
pub(crate) fn try_array<T, const N: usize>(
    mut make: impl FnMut(usize) -> Result<T, PoolError>,
) -> Result<[T; N], PoolError> {
    let mut slots: [Option<T>; N] = core::array::from_fn(|_| None);
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = Some(make(i)?);
    }
    Ok(slots.map(|slot| match slot {
        Some(item) => item,
        None => unreachable!("every slot was filled above"),
    }))
}
