//! Stand-ins for the console's display hardware.

use std::thread::sleep;
use std::time::{Duration, Instant};

use vanguard_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use vanguard_core::{BackgroundLayer, ObjectPool, ObjectRecord, VBlank, VideoHardware};

/// Refresh rate of the real display.
pub const REFRESH_HZ: f64 = 59.7275;

/// Attribute memory and scroll registers, in plain memory.
pub struct HostVideo {
    oam: Vec<u16>,
    scroll: [(u16, u16); 4],
}

impl Default for HostVideo {
    fn default() -> Self {
        Self::new()
    }
}

impl HostVideo {
    pub fn new() -> Self {
        Self {
            oam: bytemuck::cast_slice(ObjectPool::new().records()).to_vec(),
            scroll: [(0, 0); 4],
        }
    }

    pub fn records(&self) -> &[ObjectRecord] {
        bytemuck::cast_slice(&self.oam)
    }

    /// Records whose top-left corner is on screen.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &ObjectRecord)> {
        self.records().iter().enumerate().filter(|(_, record)| {
            let (x, y) = record.position();
            (x as i32) < SCREEN_WIDTH && (y as i32) < SCREEN_HEIGHT
        })
    }

    pub fn scroll(&self, layer: BackgroundLayer) -> (u16, u16) {
        self.scroll[layer.index()]
    }
}

impl VideoHardware for HostVideo {
    fn transfer_objects(&mut self, table: &[u16]) {
        self.oam.copy_from_slice(table);
    }

    fn set_scroll(&mut self, layer: BackgroundLayer, x: u16, y: u16) {
        self.scroll[layer.index()] = (x, y);
    }
}

/// Paces frames at the display's refresh rate.
pub struct TimerVBlank {
    period: Duration,
    next: Instant,
    late_frames: u64,
}

impl Default for TimerVBlank {
    fn default() -> Self {
        Self::new(REFRESH_HZ)
    }
}

impl TimerVBlank {
    pub fn new(hz: f64) -> Self {
        let period = Duration::from_secs_f64(1.0 / hz);
        Self {
            period,
            next: Instant::now() + period,
            late_frames: 0,
        }
    }

}

/// A vblank source the run summary can ask about missed frames.
pub trait Pacing: VBlank {
    /// Frames whose simulation overran the refresh period, for sources that
    /// keep a clock.
    fn late_frames(&self) -> Option<u64> {
        None
    }
}

impl Pacing for TimerVBlank {
    fn late_frames(&self) -> Option<u64> {
        Some(self.late_frames)
    }
}

impl VBlank for TimerVBlank {
    fn wait_for_vblank(&mut self) {
        let now = Instant::now();
        if now < self.next {
            sleep(self.next - now);
            self.next += self.period;
        } else {
            // overran: the real display would already be a frame ahead
            self.late_frames += 1;
            self.next = now + self.period;
        }
    }
}

/// Returns immediately; the run goes as fast as the simulation allows.
#[derive(Default)]
pub struct InstantVBlank;

impl VBlank for InstantVBlank {
    fn wait_for_vblank(&mut self) {}
}

impl Pacing for InstantVBlank {}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::{BackgroundScroll, Console, ObjectDescriptor, ShapeClass};

    #[test]
    fn starts_with_every_record_hidden() {
        let video = HostVideo::new();
        assert_eq!(video.records().len(), ObjectPool::CAPACITY);
        assert_eq!(video.visible().count(), 0);
    }

    #[test]
    fn transfer_replaces_the_whole_table() {
        let mut pool = ObjectPool::new();
        pool.allocate(&ObjectDescriptor::new(10, 20, ShapeClass::Size16x16, 0));
        pool.allocate(&ObjectDescriptor::new(300, 20, ShapeClass::Size8x8, 40));

        let mut video = HostVideo::new();
        video.transfer_objects(pool.as_halfwords());

        let visible: Vec<_> = video.visible().map(|(i, r)| (i, r.position())).collect();
        assert_eq!(visible, [(0, (10, 20))]);
        assert_eq!(video.records()[1].tile_index(), 40);
    }

    #[test]
    fn commit_writes_both_scroll_layers() {
        let mut console = Console::new(HostVideo::new(), InstantVBlank);
        console.reset_scene();
        let mut scroll = BackgroundScroll::new(1);
        for _ in 0..3 {
            scroll.tick();
            console.begin_frame().commit(&scroll).wait_for_vblank();
        }

        let video = console.video();
        assert_eq!(video.scroll(BackgroundLayer::Bg0), (0, 509));
        assert_eq!(video.scroll(BackgroundLayer::Bg1), (0, 506));
        assert_eq!(video.scroll(BackgroundLayer::Bg2), (0, 0));
    }

    #[test]
    fn timer_paces_frames() {
        let mut vblank = TimerVBlank::new(500.0);
        let start = Instant::now();
        for _ in 0..5 {
            vblank.wait_for_vblank();
        }
        assert!(start.elapsed() >= Duration::from_millis(8));
        assert_eq!(InstantVBlank.late_frames(), None);
    }

    #[test]
    fn overrunning_a_frame_counts_as_late() {
        let mut vblank = TimerVBlank::new(1000.0);
        sleep(Duration::from_millis(5));
        vblank.wait_for_vblank();
        assert_eq!(vblank.late_frames(), Some(1));
    }
}
