mod autopilot;
mod host;
mod starfield;

use std::fmt;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::util::SubscriberInitExt;

use vanguard_core::{BackgroundLayer, ButtonState, Console, FormationId, Scene, SceneConfig, TileMap};

use crate::autopilot::{Autopilot, EnemyGunner};
use crate::host::{HostVideo, InstantVBlank, Pacing, TimerVBlank};

/// About one enemy shot every this many frames.
const ENEMY_FIRE_ODDS: u32 = 90;

#[derive(Parser, Debug)]
#[command(name = "vanguard")]
#[command(version, about = "Run the Vanguard shooter headless, with an autopilot at the controls", long_about = None)]
struct Cli {
    /// Frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// Seed for the autopilot, enemy fire and the starfield
    #[arg(short, long, default_value_t = 0x5EED)]
    seed: u64,

    /// First formation to spawn
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=7))]
    formation: u8,

    /// Pace frames at the console's refresh rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Most verbose level to log
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Print every on-screen object record and the scroll registers after the run
    #[arg(long)]
    dump_oam: bool,
}

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    OutOfFrames,
    Breached,
    Defeated,
}

struct Summary {
    outcome: Outcome,
    frames: u64,
    transfers: u64,
    score: u32,
    kills: u32,
    shots: u32,
    formations: u32,
    player_health: i32,
    frames_over_stars: u64,
    late_frames: Option<u64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== RUN SUMMARY ===")?;
        writeln!(f, "  Outcome:     {:?}", self.outcome)?;
        writeln!(f, "  Frames:      {}", self.frames)?;
        writeln!(f, "  Transfers:   {}", self.transfers)?;
        writeln!(f, "  Score:       {}", self.score)?;
        writeln!(f, "  Kills:       {} from {} shots", self.kills, self.shots)?;
        writeln!(f, "  Formations:  {}", self.formations)?;
        writeln!(f, "  Health:      {}", self.player_health)?;
        write!(f, "  Over stars:  {} frames", self.frames_over_stars)?;
        if let Some(late) = self.late_frames {
            write!(f, "\n  Late frames: {late}")?;
        }
        Ok(())
    }
}

fn run<V: Pacing>(cli: &Cli, vblank: V) -> Result<Summary> {
    let mut console = Console::new(HostVideo::new(), vblank);
    let mut scene = Scene::new(console.reset_scene(), SceneConfig::default()).context("allocating the scene")?;

    let tiles = starfield::generate(cli.seed);
    let map = TileMap::new(&tiles, starfield::MAP_TILES, starfield::MAP_TILES).context("building the starfield")?;

    let mut pilot = Autopilot::new(cli.seed);
    let mut gunner = EnemyGunner::new(cli.seed.rotate_left(32), ENEMY_FIRE_ODDS);
    let mut buttons = ButtonState::new();

    let first = FormationId(cli.formation);
    {
        let mut frame = console.begin_frame();
        let spawned = scene.spawn_formation(frame.pool_mut(), first);
        info!("{first}: {spawned} enemies");
        frame.commit(&scene.background).wait_for_vblank();
    }

    let mut outcome = Outcome::OutOfFrames;
    let mut shots = 0;
    let mut formations = 1;
    let mut frames_over_stars = 0;

    while console.frame_count() < cli.frames {
        pilot.observe(&scene);
        buttons.poll(&mut pilot);

        let mut frame = console.begin_frame();
        let pool = frame.pool_mut();

        if let Some((class, index)) = gunner.pick(&scene) {
            if scene.fire_enemy_bullet(pool, class, index) {
                debug!("{class:?} #{index} fires");
            }
        }

        let events = scene.update(pool, &buttons);
        shots += events.shots_fired;
        if events.player_hit {
            warn!("player hit, health {}", scene.player.health);
        }
        if let Some(next) = scene.advance_formation(pool) {
            formations += 1;
            info!("{next} incoming, score {}", scene.score().value());
        }

        frame.commit(&scene.background).wait_for_vblank();

        let (px, py) = (scene.player.x + 8, scene.player.y + 8);
        if scene.tile_under(px, py, &map) != starfield::SPACE {
            frames_over_stars += 1;
        }

        if scene.breached() {
            outcome = Outcome::Breached;
            warn!("{} broke through at frame {}", scene.formation(), console.frame_count());
            break;
        }
        if scene.player.is_defeated() {
            outcome = Outcome::Defeated;
            warn!("player destroyed at frame {}", console.frame_count());
            break;
        }
    }

    if cli.dump_oam {
        for (slot, record) in console.video().visible() {
            println!("{slot:3}: {record:?}");
        }
        for layer in [BackgroundLayer::Bg0, BackgroundLayer::Bg1] {
            let (x, y) = console.video().scroll(layer);
            println!("{layer:?}: scroll ({x}, {y})");
        }
    }

    Ok(Summary {
        outcome,
        frames: console.frame_count(),
        transfers: console.transfers(),
        score: scene.score().value(),
        kills: scene.kills(),
        shots,
        formations,
        player_health: scene.player.health,
        frames_over_stars,
        late_frames: console.vblank().late_frames(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);
    info!("seed {:#x}, {} frames", cli.seed, cli.frames);

    let started = Instant::now();
    let summary = if cli.realtime {
        run(&cli, TimerVBlank::default())?
    } else {
        run(&cli, InstantVBlank)?
    };

    println!("{summary}");
    println!("  Wall time:   {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("vanguard").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.frames, 3600);
        assert_eq!(cli.formation, 1);
        assert_eq!(cli.log_level, Level::INFO);
        assert!(!cli.realtime && !cli.dump_oam);
    }

    #[test]
    fn formation_must_exist() {
        assert!(Cli::try_parse_from(["vanguard", "--formation", "8"]).is_err());
        assert_eq!(cli(&["--formation", "7"]).formation, 7);
    }

    #[test]
    fn headless_run_commits_every_frame() {
        let summary = run(&cli(&["--frames", "600", "--seed", "11"]), InstantVBlank).unwrap();
        assert_eq!(summary.frames, summary.transfers);
        assert!(summary.frames > 1);
        assert!(summary.shots > 0);
        assert!(summary.score >= summary.kills * 10);
        assert_eq!(summary.late_frames, None);
    }

    #[test]
    fn runs_are_reproducible() {
        let a = run(&cli(&["--frames", "900", "--seed", "5", "--formation", "4"]), InstantVBlank).unwrap();
        let b = run(&cli(&["--frames", "900", "--seed", "5", "--formation", "4"]), InstantVBlank).unwrap();
        assert_eq!((a.frames, a.score, a.kills, a.player_health), (b.frames, b.score, b.kills, b.player_health));
    }
}
