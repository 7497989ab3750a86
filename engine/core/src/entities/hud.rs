//! Score label and digits along the top edge.

use crate::config::{tiles, SCORE_DIGITS};
use crate::entities::try_array;
use crate::error::PoolError;
use crate::oam::{ObjectDescriptor, ObjectId, ObjectPool, ShapeClass};

/// Largest value the digits can show.
pub const SCORE_MAX: u32 = 99_999;

const LABEL_POSITION: (i32, i32) = (0, 0);
const FIRST_DIGIT_X: i32 = 32;
const DIGIT_WIDTH: i32 = 8;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

/// One numeral sprite at a fixed position.
#[derive(Clone, Debug)]
pub struct Digit {
    object: ObjectId,
    pub x: i32,
    pub y: i32,
    value: u8,
}

impl Digit {
    pub fn new(pool: &mut ObjectPool, x: i32, y: i32) -> Result<Self, PoolError> {
        let object = pool.try_allocate(&ObjectDescriptor::new(x, y, ShapeClass::Size8x8, tiles::DIGIT_ZERO))?;
        Ok(Self { object, x, y, value: 0 })
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Show `value % 10`.
    pub fn set(&mut self, pool: &mut ObjectPool, value: u8) {
        self.value = value % 10;
        pool[self.object].set_tile_offset(tiles::DIGIT_ZERO + self.value as u16 * tiles::DIGIT_STRIDE);
    }
}

#[derive(Clone, Debug)]
pub struct Hud {
    label: ObjectId,
    digits: [Digit; SCORE_DIGITS],
}

impl Hud {
    pub fn new(pool: &mut ObjectPool) -> Result<Self, PoolError> {
        let (x, y) = LABEL_POSITION;
        let label = pool.try_allocate(&ObjectDescriptor::new(x, y, ShapeClass::Size32x8, tiles::SCORE_LABEL))?;
        let digits = try_array(|i| Digit::new(pool, FIRST_DIGIT_X + DIGIT_WIDTH * i as i32, y))?;
        Ok(Self { label, digits })
    }

    pub fn label(&self) -> ObjectId {
        self.label
    }

    /// Most significant first.
    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    /// Write `score` into the digits, clamped to [`SCORE_MAX`].
    pub fn show(&mut self, pool: &mut ObjectPool, score: Score) {
        let mut rest = score.value().min(SCORE_MAX);
        for digit in self.digits.iter_mut().rev() {
            digit.set(pool, (rest % 10) as u8);
            rest /= 10;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(hud: &Hud) -> [u8; SCORE_DIGITS] {
        core::array::from_fn(|i| hud.digits()[i].value())
    }

    #[test]
    fn layout() {
        let mut pool = ObjectPool::new();
        let hud = Hud::new(&mut pool).unwrap();
        assert_eq!(pool.allocated(), 1 + SCORE_DIGITS);
        assert_eq!(pool[hud.label()].shape_class(), Some(ShapeClass::Size32x8));
        let xs: Vec<_> = hud.digits().iter().map(|d| d.x).collect();
        assert_eq!(xs, [32, 40, 48, 56, 64]);
    }

    #[test]
    fn shows_decimal_digits() {
        let mut pool = ObjectPool::new();
        let mut hud = Hud::new(&mut pool).unwrap();
        let mut score = Score::new();
        score.add(1230);
        hud.show(&mut pool, score);

        assert_eq!(shown(&hud), [0, 1, 2, 3, 0]);
        let three = &hud.digits()[3];
        assert_eq!(pool[three.object()].tile_index(), tiles::DIGIT_ZERO + 6);
    }

    #[test]
    fn clamps_to_five_digits() {
        let mut pool = ObjectPool::new();
        let mut hud = Hud::new(&mut pool).unwrap();
        let mut score = Score::new();
        score.add(u32::MAX);
        score.add(10);
        assert_eq!(score.value(), u32::MAX);
        hud.show(&mut pool, score);
        assert_eq!(shown(&hud), [9; 5]);
    }
}
