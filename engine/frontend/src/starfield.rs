use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vanguard_core::tiles::{block_index, BLOCK_TILES};

pub const MAP_TILES: usize = 64;

/// Empty space.
pub const SPACE: u16 = 0;
/// Star tiles, dimmest first.
pub const STARS: [u16; 3] = [1, 2, 3];

/// A 64×64 starfield laid out in four screen blocks. About one tile in
/// twelve holds a star; every block also gets one bright star at its
/// top-left corner so the seams are easy to spot.
pub fn generate(seed: u64) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = vec![SPACE; MAP_TILES * MAP_TILES];
    let size = MAP_TILES as i32;

    for y in 0..size {
        for x in 0..size {
            let tile = if x % BLOCK_TILES == 0 && y % BLOCK_TILES == 0 {
                STARS[2]
            } else if rng.gen_ratio(1, 12) {
                STARS[rng.gen_range(0..2)]
            } else {
                SPACE
            };
            map[block_index(x, y, size, size)] = tile;
        }
    }
    map
}
