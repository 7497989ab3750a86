//! # Console Context
//!
//! [`Console`] owns the object pool together with the hardware it is
//! committed to, and hands out frames in a fixed order:
//!
//! ```ignore
//! loop {
//!     let mut frame = console.begin_frame();
//!     scene.update(frame.pool_mut(), &buttons);     // all mutation for frame N
//!     frame.commit(&scene.background)               // one block transfer
//!          .wait_for_vblank();                      // the only blocking point
//! }
//! ```
//!
//! [`FrameGuard::commit`] consumes the guard, so a frame cannot be committed
//! twice, and the pool cannot be touched between the commit and the vblank.

use log::{debug, warn};

use crate::oam::ObjectPool;
use crate::tiles::{BackgroundLayer, BackgroundScroll};
use crate::vblank::VBlank;

/// The display-facing side of the console.
pub trait VideoHardware {
    /// Copy the whole attribute table to object attribute memory in one
    /// block transfer. `table` is always `ObjectPool::transfer_len()` long.
    fn transfer_objects(&mut self, table: &[u16]);

    /// Write one background layer's scroll registers.
    fn set_scroll(&mut self, layer: BackgroundLayer, x: u16, y: u16);
}

pub struct Console<H: VideoHardware, V: VBlank> {
    pool: ObjectPool,
    video: H,
    vblank: V,
    frame: u64,
    transfers: u64,
}

impl<H: VideoHardware, V: VBlank> Console<H, V> {
    pub fn new(video: H, vblank: V) -> Self {
        Self {
            pool: ObjectPool::new(),
            video,
            vblank,
            frame: 0,
            transfers: 0,
        }
    }

    /// Hide every object and rewind the allocator for the next scene's
    /// setup. Returns the pool so the scene can allocate into it.
    pub fn reset_scene(&mut self) -> &mut ObjectPool {
        self.pool.reset_all();
        &mut self.pool
    }

    /// Start mutating frame `frame_count()`.
    pub fn begin_frame(&mut self) -> FrameGuard<'_, H, V> {
        FrameGuard {
            console: Some(self),
        }
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn video(&self) -> &H {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut H {
        &mut self.video
    }

    pub fn vblank(&self) -> &V {
        &self.vblank
    }

    /// Frames completed, i.e. vblanks waited for.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Attribute table transfers issued.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }
}

/// Exclusive access to the object pool for one frame.
pub struct FrameGuard<'a, H: VideoHardware, V: VBlank> {
    console: Option<&'a mut Console<H, V>>,
}

impl<'a, H: VideoHardware, V: VBlank> FrameGuard<'a, H, V> {
    pub fn pool_mut(&mut self) -> &mut ObjectPool {
        match self.console.as_mut() {
            Some(console) => &mut console.pool,
            None => unreachable!("frame guard used after commit"),
        }
    }

    /// Push the scroll registers and the whole attribute table to hardware.
    /// Call after every mutation for this frame is done.
    pub fn commit(mut self, scroll: &BackgroundScroll) -> Committed<'a, H, V> {
        let Some(console) = self.console.take() else {
            unreachable!("frame guard committed twice");
        };

        for (layer, x, y) in scroll.registers() {
            console.video.set_scroll(layer, x, y);
        }
        console.video.transfer_objects(console.pool.as_halfwords());
        console.transfers += 1;

        Committed { console }
    }
}

impl<H: VideoHardware, V: VBlank> Drop for FrameGuard<'_, H, V> {
    fn drop(&mut self) {
        if let Some(console) = &self.console {
            warn!("frame {} dropped without a commit, hardware keeps the previous table", console.frame);
        }
    }
}

/// A frame whose table has been handed to the hardware.
#[must_use = "the next frame may not start until the display reaches vblank"]
pub struct Committed<'a, H: VideoHardware, V: VBlank> {
    console: &'a mut Console<H, V>,
}

impl<H: VideoHardware, V: VBlank> Committed<'_, H, V> {
    /// Block until the display enters its blanking interval.
    pub fn wait_for_vblank(self) {
        self.console.vblank.wait_for_vblank();
        self.console.frame += 1;
        if self.console.frame % 600 == 0 {
            debug!("{} frames, {} transfers", self.console.frame, self.console.transfers);
        }
    }
}
