/// Entry point: headless host.
///
/// Usage: `shiftmaze [PACK] [SCRIPT]`
///
/// Loads `config.toml`, the level pack (or the built-in levels), then replays
/// SCRIPT one character per tick:
///   `h`/`U` up   `b`/`D` down   `g`/`L` left   `d`/`R` right
///   `r` reset    `.` idle       whitespace is ignored
///
/// Every event and cue is logged (`RUST_LOG=debug` for more detail).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use log::{debug, info};

use shiftmaze::config::GameConfig;
use shiftmaze::domain::entity::{Direction, Input};
use shiftmaze::sim::event::{dispatch, Cue, EffectSink, GameEvent};
use shiftmaze::sim::level::{embedded_levels, load_pack};
use shiftmaze::sim::step;
use shiftmaze::sim::world::{Phase, WorldState};

/// Upper bound on idle ticks spent waiting out a level transition.
const MAX_TRANSITION_TICKS: usize = 10_000;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let mut args = std::env::args().skip(1);
    let pack = args.next().map(PathBuf::from).or_else(|| config.host.pack.clone());
    let script = args.next().unwrap_or_default();

    let (pack_info, levels) = match &pack {
        Some(path) => load_pack(path).with_context(|| format!("loading pack {}", path.display()))?,
        None => embedded_levels().context("loading built-in levels")?,
    };
    info!("pack {:?} by {:?}: {} levels", pack_info.name, pack_info.author, pack_info.level_count);

    let mut rules = config.rules.clone();
    rules.seed = config.host.seed.unwrap_or_else(clock_seed);
    debug!("rules: {rules:?}");

    let mut world = WorldState::new(Arc::new(levels), rules).context("starting first level")?;
    let inputs = parse_script(&script)?;

    let mut sink = LogSink::default();
    run_script(&mut world, &inputs, config.host.tick_rate_ms, &mut sink)?;

    println!("{}", world.motion.grid());
    println!("level   {} ({})", world.level_index + 1, world.level_name());
    println!("player  {:?}", world.player.pos());
    println!("score   {}", world.score);
    println!("ticks   {}", world.tick);
    println!("events  {} ({} cues)", sink.events, sink.cues);
    if world.is_won() {
        println!("*** labyrinth cleared ***");
    }
    Ok(())
}

/// One script step per tick; transitions are played out on idle ticks
/// before the next step is fed in.
fn run_script(
    world: &mut WorldState,
    inputs: &[Option<Input>],
    tick_rate_ms: u32,
    sink: &mut LogSink,
) -> Result<()> {
    for (i, &input) in inputs.iter().enumerate() {
        if world.is_won() {
            info!("game won; ignoring the remaining {} script steps", inputs.len() - i);
            break;
        }

        let events = step::tick(world, tick_rate_ms, input)
            .with_context(|| format!("tick {} (script step {i})", world.tick + 1))?;
        dispatch(sink, &events);

        let mut waited = 0;
        while world.phase == Phase::Transitioning {
            if waited >= MAX_TRANSITION_TICKS {
                bail!("level transition did not finish after {waited} ticks");
            }
            let events = step::tick(world, tick_rate_ms, None)?;
            dispatch(sink, &events);
            waited += 1;
        }
    }
    Ok(())
}

fn parse_script(script: &str) -> Result<Vec<Option<Input>>> {
    script.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            Ok(match c {
                'h' | 'U' => Some(Input::Move(Direction::Up)),
                'b' | 'D' => Some(Input::Move(Direction::Down)),
                'g' | 'L' => Some(Input::Move(Direction::Left)),
                'd' | 'R' => Some(Input::Move(Direction::Right)),
                'r' => Some(Input::Reset),
                '.' => None,
                other => bail!("unknown script command {other:?}"),
            })
        })
        .collect()
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// ── Effect sink ──

#[derive(Default)]
struct LogSink {
    events: usize,
    cues: usize,
}

impl EffectSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::ShuffleTick { .. } => {}
            GameEvent::Moved { .. } => debug!("{event:?}"),
            _ => info!("{event:?}"),
        }
    }

    fn on_cue(&mut self, cue: Cue) {
        self.cues += 1;
        debug!("cue {cue:?}");
    }
}
