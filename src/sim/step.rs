/// The step function: advances the world by one tick.
///
/// Processing order while playing:
///   1. Error marker decay
///   2. Reset (bypasses everything below)
///   3. Tile motion (every tick, or only on accepted moves; see `MotionClock`)
///   4. Crush check (a wall slid onto a player who stayed put)
///   5. Player movement against the post-motion grid
///   6. Landing: checkpoint / exit / hazard / loot / secret
///
/// Ticks are all-or-nothing: the world is advanced in a scratch copy and
/// swapped in only if every stage succeeded.

use log::{debug, info};

use crate::config::MotionClock;
use crate::domain::entity::{Direction, Input};
use crate::domain::motion;
use crate::domain::rules::{self, Landing, MoveOutcome};
use crate::domain::tile::CheckpointKind;
use crate::error::SimError;
use crate::sim::event::GameEvent;
use crate::sim::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut WorldState, elapsed_ms: u32, input: Option<Input>) -> Result<Vec<GameEvent>, SimError> {
    if world.phase == Phase::Won { return Ok(vec![]); }

    let mut next = world.clone();
    let events = run(&mut next, elapsed_ms, input)?;
    *world = next;
    Ok(events)
}

fn run(world: &mut WorldState, elapsed_ms: u32, input: Option<Input>) -> Result<Vec<GameEvent>, SimError> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.player.decay_error(elapsed_ms);

    match world.phase {
        Phase::Playing => resolve_playing(world, input, &mut events)?,
        Phase::Transitioning => resolve_transition(world, elapsed_ms, &mut events),
        Phase::Credits => resolve_credits(world, input, &mut events),
        Phase::Won => {}
    }

    Ok(events)
}

// ══════════════════════════════════════════════════════════════
// Playing
// ══════════════════════════════════════════════════════════════

fn resolve_playing(world: &mut WorldState, input: Option<Input>, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    if input == Some(Input::Reset) {
        world.restore_checkpoint();
        let (x, y) = world.player.pos();
        events.push(GameEvent::CheckpointRestored { x, y });
        return Ok(());
    }
    let dir = input.and_then(Input::direction);

    match world.rules.motion_clock {
        MotionClock::EveryTick => {
            world.motion = motion::advance(&world.motion)?;
            if rules::is_crushed(world.motion.grid(), world.player.pos()) {
                let (x, y) = world.player.pos();
                die(world, (x, y), events);
                return Ok(());
            }
            let Some(dir) = dir else { return Ok(()) };
            let outcome = rules::try_move(world.motion.grid(), world.player.pos(), dir);
            apply_outcome(world, outcome, events)
        }
        MotionClock::PlayerMoves => {
            let Some(dir) = dir else { return Ok(()) };
            resolve_turn(world, dir, events)
        }
    }
}

/// Turn-based motion: tiles only advance when the move they answer is
/// accepted. A blocked move leaves the grid exactly as it was.
fn resolve_turn(world: &mut WorldState, dir: Direction, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    if rules::target(world.motion.grid(), world.player.pos(), dir).is_none() {
        return apply_outcome(world, MoveOutcome::BlockedAtEdge, events);
    }

    let advanced = motion::advance(&world.motion)?;
    let outcome = rules::try_move(advanced.grid(), world.player.pos(), dir);
    if matches!(outcome, MoveOutcome::Moved { .. }) {
        world.motion = advanced;
    }
    apply_outcome(world, outcome, events)
}

fn apply_outcome(world: &mut WorldState, outcome: MoveOutcome, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    match outcome {
        MoveOutcome::BlockedAtEdge => {
            events.push(GameEvent::BlockedAtEdge);
        }
        MoveOutcome::Blocked { at } => {
            world.player.flag_error(at, world.rules.error_display_ms);
            events.push(GameEvent::Blocked { x: at.0, y: at.1 });
        }
        MoveOutcome::Moved { to, landing } => {
            world.player.place(to);
            world.player.clear_error();
            events.push(GameEvent::Moved { x: to.0, y: to.1 });
            resolve_landing(world, to, landing, events)?;
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Landing: the level/checkpoint state machine
// ══════════════════════════════════════════════════════════════

fn resolve_landing(
    world: &mut WorldState,
    at: (usize, usize),
    landing: Landing,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    match landing {
        Landing::Floor => {}
        Landing::Checkpoint(CheckpointKind::Blue) => {
            world.save_checkpoint(at);
            events.push(GameEvent::CheckpointSaved { x: at.0, y: at.1 });
        }
        Landing::Checkpoint(CheckpointKind::Red) => {
            match world.advance_level()? {
                Some(index) => events.push(GameEvent::LevelAdvanced { index }),
                None => events.push(GameEvent::Won),
            }
        }
        Landing::Hazard => die(world, at, events),
        Landing::Loot => {
            let amount = world.rules.loot_value;
            world.motion.clear_tile(at.0, at.1);
            world.score = world.score.saturating_add(amount);
            events.push(GameEvent::LootCollected { amount });
        }
        Landing::Secret => {
            world.phase = Phase::Credits;
            events.push(GameEvent::CreditsToggled { on: true });
        }
    }
    Ok(())
}

fn die(world: &mut WorldState, at: (usize, usize), events: &mut Vec<GameEvent>) {
    debug!("player died at {at:?}");
    events.push(GameEvent::Died { x: at.0, y: at.1 });
    world.restore_checkpoint();
    let (x, y) = world.player.pos();
    events.push(GameEvent::CheckpointRestored { x, y });
}

// ══════════════════════════════════════════════════════════════
// Transition and credits
// ══════════════════════════════════════════════════════════════

fn resolve_transition(world: &mut WorldState, elapsed_ms: u32, events: &mut Vec<GameEvent>) {
    let Some(shuffle) = world.shuffle.as_mut() else {
        world.phase = Phase::Playing;
        return;
    };
    if shuffle.advance(elapsed_ms, &world.rules, &mut world.rng, events) {
        info!("shuffle finished after {} swaps", shuffle.swap_count);
        world.shuffle = None;
        world.phase = Phase::Playing;
        events.push(GameEvent::ShuffleFinished);
    }
}

fn resolve_credits(world: &mut WorldState, input: Option<Input>, events: &mut Vec<GameEvent>) {
    if input != Some(Input::Reset) { return; }
    world.phase = Phase::Playing;
    events.push(GameEvent::CreditsToggled { on: false });
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
