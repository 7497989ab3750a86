//! Memory-mapped I/O for the real console.
//!
//! | Register        | Address      |
//! |-----------------|--------------|
//! | `VCOUNT`        | `0x04000006` |
//! | `BGxHOFS/VOFS`  | `0x04000010` |
//! | DMA 3           | `0x040000D4` |
//! | `KEYINPUT`      | `0x04000130` |
//! | OAM             | `0x07000000` |
//!
//! Each handle is created once at boot with an `unsafe fn take()`; creating
//! two handles to the same block aliases hardware state.

use bitflags::bitflags;
use volatile_register::{RO, WO};

use crate::console::VideoHardware;
use crate::input::InputSource;
use crate::tiles::BackgroundLayer;
use crate::vblank::ScanlineCounter;

const OAM: usize = 0x0700_0000;

bitflags! {
    /// Upper half of the DMA count/control word. Transfers are 16-bit and
    /// increment both addresses unless a flag says otherwise.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DmaControl: u32 {
        const DEST_DECREMENT = 1 << 21;
        const DEST_FIXED = 1 << 22;
        const SRC_DECREMENT = 1 << 23;
        const SRC_FIXED = 1 << 24;
        const REPEAT = 1 << 25;
        const WORDS = 1 << 26;
        const START_VBLANK = 1 << 28;
        const START_HBLANK = 1 << 29;
        const IRQ = 1 << 30;
        const ENABLE = 1 << 31;
    }
}

#[repr(C)]
pub struct Dma3 {
    pub source: WO<u32>,
    pub destination: WO<u32>,
    /// Unit count in bits 0-15, [`DmaControl`] above.
    pub control: WO<u32>,
}

/// Horizontal and vertical offset for each of the four layers.
#[repr(C)]
pub struct ScrollRegisters {
    pub layers: [[WO<u16>; 2]; 4],
}

/// Display side: DMA for the attribute table, scroll registers for the
/// backgrounds.
pub struct Video {
    dma: &'static mut Dma3,
    scroll: &'static mut ScrollRegisters,
}

impl Video {
    /// # Safety
    ///
    /// Call once. Nothing else may drive DMA channel 3 or the scroll
    /// registers while the handle lives.
    pub unsafe fn take() -> Self {
        unsafe {
            Self {
                dma: &mut *(0x0400_00D4 as *mut Dma3),
                scroll: &mut *(0x0400_0010 as *mut ScrollRegisters),
            }
        }
    }
}

impl VideoHardware for Video {
    fn transfer_objects(&mut self, table: &[u16]) {
        let control = DmaControl::ENABLE.bits() | (table.len() as u32 & 0xFFFF);
        // immediate transfer: the cpu is halted until the copy completes,
        // so `table` outlives it
        unsafe {
            self.dma.source.write(table.as_ptr() as u32);
            self.dma.destination.write(OAM as u32);
            self.dma.control.write(control);
        }
    }

    fn set_scroll(&mut self, layer: BackgroundLayer, x: u16, y: u16) {
        let [h, v] = &self.scroll.layers[layer.index()];
        unsafe {
            h.write(x);
            v.write(y);
        }
    }
}

/// `VCOUNT`, the scanline being drawn.
pub struct Vcount(&'static RO<u16>);

impl Vcount {
    /// # Safety
    ///
    /// Must run on the console, where the address is mapped.
    pub unsafe fn take() -> Self {
        unsafe { Self(&*(0x0400_0006 as *const RO<u16>)) }
    }
}

impl ScanlineCounter for Vcount {
    #[inline(always)]
    fn current_scanline(&mut self) -> u16 {
        self.0.read() & 0xFF
    }
}

/// `KEYINPUT`, active low.
pub struct Keypad(&'static RO<u16>);

impl Keypad {
    /// # Safety
    ///
    /// Must run on the console, where the address is mapped.
    pub unsafe fn take() -> Self {
        unsafe { Self(&*(0x0400_0130 as *const RO<u16>)) }
    }
}

impl InputSource for Keypad {
    #[inline(always)]
    fn sample(&mut self) -> u16 {
        self.0.read()
    }
}
