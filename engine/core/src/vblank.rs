//! # Vertical Blank Synchronisation
//!
//! The frame loop blocks in exactly one place: [`VBlank::wait_for_vblank`].
//! On the console this busy-polls the scanline counter; a host build can
//! swap in a timer behind the same trait.

use crate::config::SCREEN_HEIGHT;

/// Blocks until the display has finished its visible scan for this frame.
pub trait VBlank {
    fn wait_for_vblank(&mut self);
}

/// Anything that reports which scanline the display is drawing.
/// Values at or above 160 mean the display is blanking.
pub trait ScanlineCounter {
    fn current_scanline(&mut self) -> u16;
}

/// Busy-poll vblank over a [`ScanlineCounter`].
#[derive(Debug)]
pub struct ScanlineVBlank<S: ScanlineCounter> {
    counter: S,
    polls: u64,
}

const FIRST_BLANK_LINE: u16 = SCREEN_HEIGHT as u16;

impl<S: ScanlineCounter> ScanlineVBlank<S> {
    pub const fn new(counter: S) -> Self {
        Self { counter, polls: 0 }
    }

    /// Total counter reads so far, for profiling slack in the frame budget.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn counter(&self) -> &S {
        &self.counter
    }

    #[inline(always)]
    fn line(&mut self) -> u16 {
        self.polls += 1;
        self.counter.current_scanline()
    }
}

impl<S: ScanlineCounter> VBlank for ScanlineVBlank<S> {
    fn wait_for_vblank(&mut self) {
        // still inside the previous blank: let the visible scan start again,
        // otherwise a fast frame would be committed twice in one blank
        while self.line() >= FIRST_BLANK_LINE {}
        while self.line() < FIRST_BLANK_LINE {}
    }
}
