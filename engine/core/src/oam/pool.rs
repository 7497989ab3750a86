//! # Object Pool
//!
//! The in-memory copy of attribute memory. Slots are handed out in order as
//! entities are created and are never returned one at a time; the whole
//! table is reset between scenes.

use core::ops::{Index, IndexMut};

use log::debug;

use crate::config::MAX_OBJECTS;
use crate::error::PoolError;
use crate::oam::attributes::{ObjectDescriptor, ObjectRecord, RECORD_HALFWORDS};

/// Stable handle to one record. An entity keeps the same id for its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u8);

impl ObjectId {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

pub struct ObjectPool {
    records: [ObjectRecord; MAX_OBJECTS],
    cursor: usize,
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectPool {
    pub const CAPACITY: usize = MAX_OBJECTS;

    /// A pool with every record already hidden.
    pub fn new() -> Self {
        Self {
            records: [ObjectRecord::hidden(); MAX_OBJECTS],
            cursor: 0,
        }
    }

    /// Park every record off screen and rewind the allocation cursor.
    ///
    /// Only call this at a scene boundary: every [`ObjectId`] handed out
    /// before becomes meaningless.
    pub fn reset_all(&mut self) {
        debug!("resetting object pool ({} records were allocated)", self.cursor);
        self.records.fill(ObjectRecord::hidden());
        self.cursor = 0;
    }

    /// Claim the next free record and encode `desc` into it.
    pub fn try_allocate(&mut self, desc: &ObjectDescriptor) -> Result<ObjectId, PoolError> {
        if self.cursor >= Self::CAPACITY {
            return Err(PoolError::Exhausted {
                capacity: Self::CAPACITY,
            });
        }

        let id = ObjectId(self.cursor as u8);
        self.cursor += 1;
        self.encode_into(id, desc);
        Ok(id)
    }

    /// Like [`try_allocate`](Self::try_allocate), for setup code whose
    /// object count is fixed at build time.
    ///
    /// # Panics
    ///
    /// Panics when the pool is exhausted.
    pub fn allocate(&mut self, desc: &ObjectDescriptor) -> ObjectId {
        match self.try_allocate(desc) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Re-encode a whole record in place.
    #[inline]
    pub fn encode_into(&mut self, id: ObjectId, desc: &ObjectDescriptor) {
        self.records[id.index()] = ObjectRecord::encode(desc);
    }

    #[inline]
    pub fn allocated(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        Self::CAPACITY - self.cursor
    }

    /// The full table, allocated or not.
    #[inline]
    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    /// Records that have been handed out, in allocation order.
    pub fn allocated_records(&self) -> impl Iterator<Item = (ObjectId, &ObjectRecord)> {
        self.records[..self.cursor]
            .iter()
            .enumerate()
            .map(|(i, record)| (ObjectId(i as u8), record))
    }

    /// The table as the halfword stream the block transfer copies.
    #[inline]
    pub fn as_halfwords(&self) -> &[u16] {
        bytemuck::cast_slice(&self.records)
    }

    /// Length of one commit in halfwords.
    pub const fn transfer_len() -> usize {
        MAX_OBJECTS * RECORD_HALFWORDS
    }
}

impl Index<ObjectId> for ObjectPool {
    type Output = ObjectRecord;

    #[inline(always)]
    fn index(&self, id: ObjectId) -> &ObjectRecord {
        &self.records[id.index()]
    }
}

impl IndexMut<ObjectId> for ObjectPool {
    #[inline(always)]
    fn index_mut(&mut self, id: ObjectId) -> &mut ObjectRecord {
        &mut self.records[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::oam::attributes::ShapeClass;

    fn bullet() -> ObjectDescriptor {
        ObjectDescriptor::new(120, 0, ShapeClass::Size8x8, 40)
    }

    #[test]
    fn slots_are_handed_out_in_order() {
        let mut pool = ObjectPool::new();
        let a = pool.allocate(&bullet());
        let b = pool.allocate(&bullet());
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(pool.allocated(), 2);
        assert_eq!(pool.remaining(), 126);
        assert_eq!(pool[b].tile_index(), 40);
    }

    #[test]
    fn fills_to_capacity_then_refuses() {
        let mut pool = ObjectPool::new();
        for _ in 0..ObjectPool::CAPACITY {
            pool.try_allocate(&bullet()).unwrap();
        }
        assert_eq!(
            pool.try_allocate(&bullet()),
            Err(PoolError::Exhausted { capacity: 128 })
        );
        // the refused allocation did not clobber the last record
        assert_eq!(pool.allocated(), 128);
    }

    #[test]
    #[should_panic(expected = "object pool exhausted")]
    fn allocating_the_129th_object_is_fatal() {
        let mut pool = ObjectPool::new();
        for _ in 0..=ObjectPool::CAPACITY {
            pool.allocate(&bullet());
        }
    }

    #[test]
    fn reset_hides_everything_and_rewinds() {
        let mut pool = ObjectPool::new();
        for _ in 0..10 {
            pool.allocate(&bullet());
        }
        pool.reset_all();

        assert_eq!(pool.allocated(), 0);
        for record in pool.records() {
            assert_eq!(
                record.position(),
                (SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16)
            );
        }
        assert_eq!(pool.allocate(&bullet()).index(), 0);
    }

    #[test]
    fn halfword_view_is_fixed_size() {
        let mut pool = ObjectPool::new();
        let id = pool.allocate(&ObjectDescriptor::new(7, 9, ShapeClass::Size8x8, 3));
        let words = pool.as_halfwords();
        assert_eq!(words.len(), ObjectPool::transfer_len());
        assert_eq!(words[id.index() * 4] & 0xFF, 9);
        assert_eq!(words[id.index() * 4 + 1] & 0x1FF, 7);
        assert_eq!(words[id.index() * 4 + 2] & 0x3FF, 3);
    }
}
