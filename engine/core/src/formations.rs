//! # Formations
//!
//! A formation is a short list of [`PlacementRule`]s. Each rule takes a run
//! of consecutive entries from one enemy pool and lines them up in a row:
//!
//! ```text
//! x = start_x + step_x * n        n = 0 .. count
//! y = row y, or odd_y for odd n when the row alternates
//! ```
//!
//! Spawning never creates enemies. It repositions pre-allocated ones and
//! raises them to Alive, overwriting whatever state they were in.

use core::fmt;

use heapless::Vec;
use log::{debug, error, warn};

use crate::config::{SceneConfig, ENEMY_TOTAL};
use crate::entities::{Enemy, EnemyClass};
use crate::oam::ObjectPool;

/// Identifies one of the fixed formations, `1..=7`. Any other value is
/// representable but spawns nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormationId(pub u8);

impl FormationId {
    pub const FIRST: FormationId = FormationId(1);
    pub const LAST: FormationId = FormationId(FORMATIONS.len() as u8);

    /// Every formation with a table.
    pub fn all() -> impl Iterator<Item = FormationId> {
        (Self::FIRST.0..=Self::LAST.0).map(FormationId)
    }

    /// The formation after this one, wrapping back to the first.
    pub fn next(self) -> FormationId {
        if self >= Self::LAST || self < Self::FIRST {
            Self::FIRST
        } else {
            FormationId(self.0 + 1)
        }
    }

    pub fn rules(self) -> Option<&'static [PlacementRule]> {
        let index = usize::from(self.0).checked_sub(1)?;
        FORMATIONS.get(index).copied()
    }
}

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "formation {}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacementRule {
    pub class: EnemyClass,
    /// First pool index this rule places.
    pub first: usize,
    pub count: usize,
    pub start_x: i32,
    pub step_x: i32,
    pub y: i32,
    /// Row for odd `n`, when the row zig-zags.
    pub odd_y: Option<i32>,
}

impl PlacementRule {
    const fn row(class: EnemyClass, first: usize, count: usize, start_x: i32, step_x: i32, y: i32) -> Self {
        Self {
            class,
            first,
            count,
            start_x,
            step_x,
            y,
            odd_y: None,
        }
    }

    const fn zigzag(self, odd_y: i32) -> Self {
        Self {
            odd_y: Some(odd_y),
            ..self
        }
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        (0..self.count).map(move |n| Placement {
            class: self.class,
            index: self.first + n,
            x: self.start_x + self.step_x * n as i32,
            y: match self.odd_y {
                Some(odd) if n % 2 == 1 => odd,
                _ => self.y,
            },
        })
    }
}

/// One enemy put at one position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub class: EnemyClass,
    pub index: usize,
    pub x: i32,
    pub y: i32,
}

use EnemyClass::{Boss, Enemy1, Enemy2};

const fn row(class: EnemyClass, first: usize, count: usize, start_x: i32, step_x: i32, y: i32) -> PlacementRule {
    PlacementRule::row(class, first, count, start_x, step_x, y)
}

const FORMATION_1: &[PlacementRule] = &[row(Enemy1, 0, 3, 52, 60, -16)];

const FORMATION_2: &[PlacementRule] = &[row(Enemy1, 0, 6, 32, 32, -16)];

const FORMATION_3: &[PlacementRule] = &[
    row(Enemy1, 0, 5, 40, 36, -28),
    row(Enemy1, 5, 4, 58, 36, -16),
];

const FORMATION_4: &[PlacementRule] = &[
    row(Enemy1, 0, 8, 14, 28, -28),
    row(Enemy2, 0, 5, 56, 28, -16),
];

const FORMATION_5: &[PlacementRule] = &[
    row(Enemy1, 0, 7, 52, 20, -32).zigzag(-16),
    row(Enemy2, 0, 9, 32, 20, -32).zigzag(-16),
];

const FORMATION_6: &[PlacementRule] = &[
    row(Enemy2, 0, 9, 16, 24, -36),
    row(Enemy1, 0, 8, 28, 24, -26),
    row(Enemy2, 9, 7, 40, 24, -16),
];

// three interleaved rows on an 18 px grid, boss in the middle of the top row
const STEP_7: i32 = 18;
const FORMATION_7: &[PlacementRule] = &[
    row(Enemy1, 0, 2, 4, STEP_7, -44),
    row(Enemy2, 0, 2, 40, STEP_7, -44),
    row(Enemy1, 2, 2, 76, STEP_7, -44),
    row(Boss, 0, 1, 112, STEP_7, -44),
    row(Enemy1, 4, 2, 130, STEP_7, -44),
    row(Enemy2, 2, 2, 166, STEP_7, -44),
    row(Enemy1, 6, 2, 202, STEP_7, -44),
    row(Enemy1, 8, 2, 40, STEP_7, -30),
    row(Enemy2, 4, 2, 76, STEP_7, -30),
    row(Enemy1, 10, 1, 112, STEP_7, -30),
    row(Enemy2, 6, 2, 130, STEP_7, -30),
    row(Enemy1, 11, 2, 166, STEP_7, -30),
    row(Enemy1, 13, 2, 76, STEP_7, -16),
    row(Enemy2, 8, 1, 112, STEP_7, -16),
    row(Enemy1, 15, 2, 130, STEP_7, -16),
];

const FORMATIONS: [&[PlacementRule]; 7] = [
    FORMATION_1,
    FORMATION_2,
    FORMATION_3,
    FORMATION_4,
    FORMATION_5,
    FORMATION_6,
    FORMATION_7,
];

/// Every placement of a formation, in rule order. Empty for unknown ids.
pub fn placements(id: FormationId) -> Vec<Placement, ENEMY_TOTAL> {
    let mut out = Vec::new();
    for placement in id.rules().unwrap_or_default().iter().flat_map(|rule| rule.placements()) {
        if out.push(placement).is_err() {
            error!("{id} places more than {ENEMY_TOTAL} enemies, rest dropped");
            break;
        }
    }
    out
}

/// Apply a formation to the three enemy pools. Returns the number of
/// enemies raised to Alive; unknown ids spawn nothing.
pub fn spawn(
    id: FormationId,
    enemy1s: &mut [Enemy],
    enemy2s: &mut [Enemy],
    bosses: &mut [Enemy],
    pool: &mut ObjectPool,
    config: &SceneConfig,
) -> usize {
    let Some(rules) = id.rules() else {
        warn!("{id} does not exist, nothing spawned");
        return 0;
    };

    let mut spawned = 0;
    for placement in rules.iter().flat_map(|rule| rule.placements()) {
        let enemies: &mut [Enemy] = match placement.class {
            EnemyClass::Enemy1 => &mut *enemy1s,
            EnemyClass::Enemy2 => &mut *enemy2s,
            EnemyClass::Boss => &mut *bosses,
        };
        let available = enemies.len();
        let Some(enemy) = enemies.get_mut(placement.index) else {
            error!(
                "{id} places {:?} #{} but that pool holds {available}, skipped",
                placement.class, placement.index
            );
            continue;
        };
        enemy.spawn(pool, placement.x, placement.y, config.health_of(placement.class));
        spawned += 1;
    }

    debug!("{id}: {spawned} enemies spawned");
    spawned
}

/// True when nothing in any of the three pools is Alive.
pub fn formation_cleared(enemy1s: &[Enemy], enemy2s: &[Enemy], bosses: &[Enemy]) -> bool {
    !enemy1s
        .iter()
        .chain(enemy2s)
        .chain(bosses)
        .any(Enemy::is_alive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EnemyState, Enemies};
    use pretty_assertions::assert_eq;

    fn setup() -> (ObjectPool, Enemies, SceneConfig) {
        let config = SceneConfig::default();
        let mut pool = ObjectPool::new();
        let enemies = Enemies::new(&mut pool, &config).unwrap();
        (pool, enemies, config)
    }

    fn spawn_into(id: FormationId, pool: &mut ObjectPool, enemies: &mut Enemies, config: &SceneConfig) -> usize {
        let Enemies { enemy1, enemy2, bosses } = enemies;
        spawn(id, enemy1, enemy2, bosses, pool, config)
    }

    fn per_class(id: FormationId) -> [usize; 3] {
        let mut counts = [0; 3];
        for p in placements(id) {
            counts[p.class.index()] += 1;
        }
        counts
    }

    #[test]
    fn every_formation_fits_its_pools() {
        for id in FormationId::all() {
            let mut seen = [[false; 20]; 3];
            for p in placements(id) {
                assert!(p.index < p.class.capacity(), "{id}: {p:?} is outside its pool");
                assert!(!seen[p.class.index()][p.index], "{id}: {p:?} placed twice");
                seen[p.class.index()][p.index] = true;
            }
            for class in EnemyClass::ALL {
                assert!(per_class(id)[class.index()] <= class.capacity());
            }
        }
    }

    #[test]
    fn class_counts() {
        let counts: std::vec::Vec<_> = FormationId::all().map(per_class).collect();
        assert_eq!(
            counts,
            [
                [3, 0, 0],
                [6, 0, 0],
                [9, 0, 0],
                [8, 5, 0],
                [7, 9, 0],
                [8, 16, 0],
                [17, 9, 1],
            ]
        );
    }

    #[test]
    fn zigzag_rows_alternate() {
        let ys: std::vec::Vec<_> = placements(FormationId(5))
            .iter()
            .filter(|p| p.class == Enemy1)
            .map(|p| (p.x, p.y))
            .collect();
        assert_eq!(
            ys,
            [(52, -32), (72, -16), (92, -32), (112, -16), (132, -32), (152, -16), (172, -32)]
        );
    }

    #[test]
    fn boss_leads_the_last_formation() {
        let boss: std::vec::Vec<_> = placements(FormationId(7))
            .into_iter()
            .filter(|p| p.class == Boss)
            .collect();
        assert_eq!(
            boss,
            [Placement {
                class: Boss,
                index: 0,
                x: 112,
                y: -44
            }]
        );
        // the top row is a full 13-wide line
        let mut top: std::vec::Vec<_> = placements(FormationId(7))
            .iter()
            .filter(|p| p.y == -44)
            .map(|p| p.x)
            .collect();
        top.sort_unstable();
        assert_eq!(top, (0..13).map(|i| 4 + 18 * i).collect::<std::vec::Vec<_>>());
    }

    #[test]
    fn spawning_raises_exactly_the_placed_enemies() {
        let (mut pool, mut enemies, config) = setup();
        assert_eq!(spawn_into(FormationId(4), &mut pool, &mut enemies, &config), 13);
        assert_eq!(enemies.alive(), 13);

        let first = &enemies.enemy2[0];
        assert_eq!((first.x, first.y), (56, -16));
        assert_eq!(pool[first.object()].position(), (56, 240));
        assert_eq!(enemies.enemy2[5].state(), EnemyState::Dormant);
        assert!(!formation_cleared(&enemies.enemy1, &enemies.enemy2, &enemies.bosses));
    }

    #[test]
    fn unknown_ids_are_a_no_op() {
        let (mut pool, mut enemies, config) = setup();
        for id in [FormationId(0), FormationId(8), FormationId(255)] {
            assert_eq!(spawn_into(id, &mut pool, &mut enemies, &config), 0);
            assert!(placements(id).is_empty());
        }
        assert_eq!(enemies.alive(), 0);
        assert!(formation_cleared(&enemies.enemy1, &enemies.enemy2, &enemies.bosses));
    }

    #[test]
    fn short_pools_skip_rather_than_panic() {
        let (mut pool, mut enemies, config) = setup();
        let Enemies { enemy1, enemy2, bosses } = &mut enemies;
        // formation 2 wants six enemy1s
        let spawned = spawn(FormationId(2), &mut enemy1[..4], enemy2, bosses, &mut pool, &config);
        assert_eq!(spawned, 4);
    }

    #[test]
    fn cleared_once_every_placed_enemy_is_dead() {
        let (mut pool, mut enemies, config) = setup();
        spawn_into(FormationId(1), &mut pool, &mut enemies, &config);
        for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
            enemy.take_damage(&mut pool, config.bullet_damage);
        }
        assert!(formation_cleared(&enemies.enemy1, &enemies.enemy2, &enemies.bosses));

        // and respawning reuses the same enemies
        spawn_into(FormationId(1), &mut pool, &mut enemies, &config);
        assert_eq!(enemies.alive(), 3);
        assert!(enemies.enemy1[..3].iter().all(|e| e.health == 10));
    }

    #[test]
    fn progression_wraps() {
        let order: std::vec::Vec<_> = core::iter::successors(Some(FormationId::FIRST), |id| Some(id.next()))
            .take(9)
            .map(|id| id.0)
            .collect();
        assert_eq!(order, [1, 2, 3, 4, 5, 6, 7, 1, 2]);
        assert_eq!(FormationId(42).next(), FormationId::FIRST);
    }
}
