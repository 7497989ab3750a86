//! A seeded stand-in for the joypad: steers under the nearest live enemy
//! and fires once lined up, with a little noise so runs differ by seed.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use vanguard_core::entities::EnemyClass;
use vanguard_core::{Button, InputSource, Scene};

/// Keypad bits that carry buttons.
const KEY_MASK: u16 = 0x03FF;
/// Muzzle offset that puts a bullet two pixels inside an enemy's left edge.
const AIM_OFFSET: i32 = 2;
/// Close enough to pull the trigger.
const AIM_TOLERANCE: i32 = 4;
/// One frame in this many the pilot fumbles the stick.
const FUMBLE_ODDS: u32 = 24;

pub struct Autopilot {
    rng: StdRng,
    pressed: u16,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pressed: 0,
        }
    }

    /// Decide this frame's buttons from the scene as it stands.
    pub fn observe(&mut self, scene: &Scene) {
        let player_x = scene.player.x;
        let target = scene
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .min_by_key(|e| ((e.x - AIM_OFFSET) - player_x).abs())
            .map(|e| e.x - AIM_OFFSET);

        let mut pressed = match target {
            Some(x) if x > player_x + AIM_TOLERANCE => Button::Right.mask(),
            Some(x) if x < player_x - AIM_TOLERANCE => Button::Left.mask(),
            Some(_) => Button::A.mask(),
            None => 0,
        };

        if self.rng.gen_ratio(1, FUMBLE_ODDS) {
            pressed = [0, Button::Left.mask(), Button::Right.mask(), Button::Select.mask()][self.rng.gen_range(0..4)];
        }
        self.pressed = pressed;
    }

    /// Active-high buttons chosen by the last [`observe`](Self::observe).
    pub fn pressed(&self) -> u16 {
        self.pressed
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self) -> u16 {
        !self.pressed & KEY_MASK
    }
}

/// Picks which enemy, if any, shoots back this frame.
pub struct EnemyGunner {
    rng: StdRng,
    odds: u32,
}

impl EnemyGunner {
    /// Roughly one shot every `odds` frames.
    pub fn new(seed: u64, odds: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            odds: odds.max(1),
        }
    }

    pub fn pick(&mut self, scene: &Scene) -> Option<(EnemyClass, usize)> {
        if !self.rng.gen_ratio(1, self.odds) {
            return None;
        }
        EnemyClass::ALL
            .into_iter()
            .flat_map(|class| {
                scene
                    .enemies
                    .of(class)
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.is_alive())
                    .map(move |(index, _)| (class, index))
            })
            .choose(&mut self.rng)
    }
}
