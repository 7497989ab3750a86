//! # Object Attribute Memory
//!
//! [`ObjectRecord`] packs one sprite into the four hardware attribute words;
//! [`ObjectPool`] is the fixed table of them that gets committed once per
//! frame by [`Console`](crate::console::Console).

pub mod attributes;
pub mod pool;

pub use attributes::{ObjectDescriptor, ObjectRecord, ShapeClass};
pub use pool::{ObjectId, ObjectPool};
