#![cfg_attr(not(test), no_std)]
//! Sprite attribute engine and shooter simulation for a 240×160 tiled
//! display with 128 hardware objects.
//!
//! The crate never touches the heap. Every entity is created once at scene
//! setup, bound to a fixed slot in the [`ObjectPool`](oam::ObjectPool), and
//! mutated in place from then on; the [`Console`](console::Console) pushes
//! the whole table to hardware once per frame.

pub mod combat;
pub mod config;
pub mod console;
pub mod entities;
pub mod error;
pub mod formations;
pub mod input;
pub mod oam;
pub mod scene;
pub mod tiles;
pub mod vblank;

#[cfg(feature = "hardware")]
pub mod hw;

pub use config::SceneConfig;
pub use console::{Committed, Console, FrameGuard, VideoHardware};
pub use error::{EncodeError, PoolError, TileMapError};
pub use formations::FormationId;
pub use input::{Button, ButtonState, InputSource};
pub use oam::{ObjectDescriptor, ObjectId, ObjectPool, ObjectRecord, ShapeClass};
pub use scene::Scene;
pub use tiles::{BackgroundLayer, BackgroundScroll, TileMap};
pub use vblank::{ScanlineCounter, ScanlineVBlank, VBlank};
