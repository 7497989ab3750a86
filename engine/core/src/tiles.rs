//! # Tile Maps & Scrolling
//!
//! Background maps are built from 32×32-tile screen blocks, each `0x400`
//! entries long. A 64-wide map puts its right half in the next block; a
//! 64-tall map puts its bottom half after the top row of blocks:
//!
//! ```text
//! 64×64:                 32×64:
//! ┌─────────┬─────────┐  ┌─────────┐
//! │ +0x000  │ +0x400  │  │ +0x000  │
//! ├─────────┼─────────┤  ├─────────┤
//! │ +0x800  │ +0xC00  │  │ +0x400  │
//! └─────────┴─────────┘  └─────────┘
//! ```

use crate::error::TileMapError;

/// Edge length of one tile in pixels.
pub const TILE_SIZE: i32 = 8;
/// Edge length of one screen block in tiles.
pub const BLOCK_TILES: i32 = 32;
/// Entries in one screen block.
pub const BLOCK_LEN: usize = 0x400;

/// A read-only tile map supplied by the asset layer.
#[derive(Debug, Clone, Copy)]
pub struct TileMap<'a> {
    tiles: &'a [u16],
    width: i32,
    height: i32,
}

impl<'a> TileMap<'a> {
    /// Wrap a tile slice. Each side must be 32 or 64 tiles and the slice
    /// must hold exactly `width * height` entries.
    pub fn new(tiles: &'a [u16], width: usize, height: usize) -> Result<Self, TileMapError> {
        if !matches!(width, 32 | 64) || !matches!(height, 32 | 64) {
            return Err(TileMapError::UnsupportedSize { width, height });
        }
        let expected = width * height;
        if tiles.len() != expected {
            return Err(TileMapError::LengthMismatch {
                width,
                height,
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            tiles,
            width: width as i32,
            height: height as i32,
        })
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Tile at a screen position, after scrolling and wraparound.
    pub fn lookup(&self, screen_x: i32, screen_y: i32, scroll_x: i32, scroll_y: i32) -> u16 {
        resolve_tile(screen_x, screen_y, scroll_x, scroll_y, self)
    }
}

/// Map a screen pixel plus scroll offset to the tile drawn there.
pub fn resolve_tile(
    screen_x: i32,
    screen_y: i32,
    scroll_x: i32,
    scroll_y: i32,
    map: &TileMap<'_>,
) -> u16 {
    // arithmetic shift floors, so pixels left of / above the origin land in
    // tile -1 rather than tile 0
    let mut x = screen_x.wrapping_add(scroll_x) >> 3;
    let mut y = screen_y.wrapping_add(scroll_y) >> 3;

    // scroll moves a pixel or two per frame, a loop beats a division here
    while x >= map.width {
        x -= map.width;
    }
    while y >= map.height {
        y -= map.height;
    }
    while x < 0 {
        x += map.width;
    }
    while y < 0 {
        y += map.height;
    }

    map.tiles[block_index(x, y, map.width, map.height)]
}

/// Linear index of tile `(x, y)` in a map made of stacked screen blocks.
/// `x` and `y` must already be wrapped into the map.
pub fn block_index(mut x: i32, mut y: i32, width: i32, height: i32) -> usize {
    let mut offset = 0;

    if width == 64 && x >= BLOCK_TILES {
        x -= BLOCK_TILES;
        offset += BLOCK_LEN;
    }

    if height == 64 && y >= BLOCK_TILES {
        y -= BLOCK_TILES;
        offset += if width == 64 { 2 * BLOCK_LEN } else { BLOCK_LEN };
    }

    (y * BLOCK_TILES + x) as usize + offset
}

/// Hardware background layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackgroundLayer {
    Bg0,
    Bg1,
    Bg2,
    Bg3,
}

impl BackgroundLayer {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Auto-scroll for the starfield (layer 0) with a double-speed parallax
/// layer (layer 1) on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundScroll {
    pub x: i32,
    pub y: i32,
    counter: u16,
    period: u16,
}

impl BackgroundScroll {
    pub fn new(period: u16) -> Self {
        Self {
            x: 0,
            y: 0,
            counter: 0,
            period: period.max(1),
        }
    }

    /// Advance one frame; scrolls up a pixel every `period` frames.
    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.period {
            self.y -= 1;
            self.counter = 0;
        }
    }

    /// `(layer, x, y)` values for the scroll registers. The registers are
    /// 9 bits wide, so values wrap at 512.
    pub fn registers(&self) -> [(BackgroundLayer, u16, u16); 2] {
        let reg = |v: i32| (v as u16) & 0x1FF;
        [
            (BackgroundLayer::Bg0, reg(self.x), reg(self.y)),
            (BackgroundLayer::Bg1, reg(self.x * 2), reg(self.y * 2)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every entry holds its own linear index.
    fn numbered(width: usize, height: usize) -> [u16; 64 * 64] {
        let mut tiles = [0u16; 64 * 64];
        for (i, tile) in tiles.iter_mut().enumerate().take(width * height) {
            *tile = i as u16;
        }
        tiles
    }

    /// Reference layout: which block a tile falls in, then row-major inside it.
    fn expected_index(x: i32, y: i32, width: i32) -> usize {
        let blocks_across = width / 32;
        let block = (y / 32) * blocks_across + (x / 32);
        block as usize * BLOCK_LEN + ((y % 32) * 32 + (x % 32)) as usize
    }

    #[test]
    fn block_offsets_for_every_map_size() {
        for (w, h) in [(32, 32), (64, 32), (32, 64), (64, 64)] {
            let tiles = numbered(w, h);
            let map = TileMap::new(&tiles[..w * h], w, h).unwrap();
            for ty in 0..h as i32 {
                for tx in 0..w as i32 {
                    assert_eq!(
                        map.lookup(tx * 8, ty * 8, 0, 0) as usize,
                        expected_index(tx, ty, w as i32),
                        "{w}x{h} map, tile ({tx}, {ty})"
                    );
                }
            }
        }
    }

    #[test]
    fn quadrants_of_a_64x64_map() {
        let tiles = numbered(64, 64);
        let map = TileMap::new(&tiles, 64, 64).unwrap();
        assert_eq!(block_index(31, 31, 64, 64), 31 * 32 + 31);
        assert_eq!(block_index(32, 0, 64, 64), 0x400);
        assert_eq!(block_index(0, 32, 64, 64), 0x800);
        assert_eq!(block_index(63, 63, 64, 64), 0xC00 + 31 * 32 + 31);
        assert_eq!(map.lookup(63 * 8, 63 * 8, 0, 0), 0xFFF);
    }

    #[test]
    fn tall_map_uses_single_block_offset() {
        assert_eq!(block_index(5, 32, 32, 64), 0x400 + 5);
        assert_eq!(block_index(31, 63, 32, 64), 0x7FF);
    }

    #[test]
    fn scroll_wraps_both_ways() {
        let tiles = numbered(32, 32);
        let map = TileMap::new(&tiles[..1024], 32, 32).unwrap();

        // one pixel left of the origin is the last column
        assert_eq!(map.lookup(0, 0, -1, 0), 31);
        // one pixel above is the last row
        assert_eq!(map.lookup(0, 0, 0, -1), 31 * 32);
        // a full map width of scroll is a no-op
        assert_eq!(map.lookup(16, 16, 256, -256), map.lookup(16, 16, 0, 0));
        // large scroll still wraps
        assert_eq!(map.lookup(0, 0, 256 * 40 + 8, 0), 1);
    }

    #[test]
    fn rejects_bad_maps() {
        let tiles = [0u16; 100];
        assert_eq!(
            TileMap::new(&tiles, 48, 32).unwrap_err(),
            TileMapError::UnsupportedSize { width: 48, height: 32 }
        );
        assert_eq!(
            TileMap::new(&tiles, 32, 32).unwrap_err(),
            TileMapError::LengthMismatch {
                width: 32,
                height: 32,
                expected: 1024,
                actual: 100
            }
        );
    }

    #[test]
    fn scroll_steps_every_period() {
        let mut scroll = BackgroundScroll::new(3);
        for _ in 0..2 {
            scroll.tick();
        }
        assert_eq!(scroll.y, 0);
        scroll.tick();
        assert_eq!(scroll.y, -1);
        for _ in 0..3 {
            scroll.tick();
        }
        assert_eq!(scroll.y, -2);

        let [bg0, bg1] = scroll.registers();
        assert_eq!(bg0, (BackgroundLayer::Bg0, 0, 510));
        assert_eq!(bg1, (BackgroundLayer::Bg1, 0, 508));
    }
}
