/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
///   - `levels`:     immutable templates, shared (`Arc`) and never mutated.
///   - `motion`:     the live grid + pattern grid, replaced every tick.
///   - `checkpoint`: a deep copy of `motion` taken at the last checkpoint.
///     Live and saved state never alias: every save and restore clones.
///
/// The host owns one `WorldState` and hands it to `step::tick` by `&mut`.

use std::sync::Arc;

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SimRules;
use crate::domain::entity::Player;
use crate::domain::grid::{Grid, MotionState};
use crate::domain::tile::Cell;
use crate::error::SimError;
use crate::sim::level::LevelSet;
use crate::sim::shuffle::ShuffleState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// Shuffle effect between levels; input and motion are suspended.
    Transitioning,
    /// Credits screen; only Reset (to dismiss) is honoured.
    Credits,
    /// Terminal.
    Won,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Checkpoint {
    pub position: (usize, usize),
    pub motion: MotionState,
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    levels: Arc<LevelSet>,
    pub rules: SimRules,
    pub motion: MotionState,
    pub player: Player,
    pub checkpoint: Checkpoint,
    pub phase: Phase,
    pub level_index: usize,
    pub score: u32,
    pub tick: u64,
    pub shuffle: Option<ShuffleState>,
    pub(crate) rng: Pcg32,
}

impl WorldState {
    /// Start at the first level of `levels`.
    pub fn new(levels: Arc<LevelSet>, rules: SimRules) -> Result<Self, SimError> {
        let first = levels.get(0)?;
        let (motion, spawn) = (first.motion.clone(), first.spawn);
        let rng = Pcg32::seed_from_u64(rules.seed);
        let mut world = WorldState {
            checkpoint: Checkpoint { position: spawn, motion: motion.clone(), score: 0 },
            player: Player::new(spawn.0, spawn.1),
            motion,
            levels,
            rules,
            phase: Phase::Playing,
            level_index: 0,
            score: 0,
            tick: 0,
            shuffle: None,
            rng,
        };
        world.load_level(0)?;
        Ok(world)
    }

    /// Copy a template into the live state and a fresh checkpoint.
    pub fn load_level(&mut self, index: usize) -> Result<(), SimError> {
        let template = self.levels.get(index)?;
        debug!("loading level {index} {:?} (spawn {:?})", template.name, template.spawn);

        self.motion = template.motion.clone();
        self.player = Player::new(template.spawn.0, template.spawn.1);
        self.checkpoint = Checkpoint {
            position: template.spawn,
            motion: template.motion.clone(),
            score: self.score,
        };
        self.level_index = index;
        self.phase = Phase::Playing;
        self.shuffle = None;
        Ok(())
    }

    /// Red checkpoint reached: move to the next level behind a shuffle,
    /// or finish the game. Returns the new level index, `None` when won.
    pub fn advance_level(&mut self) -> Result<Option<usize>, SimError> {
        self.clear_checkpoint_marker();
        let next = self.level_index + 1;
        if next >= self.levels.len() {
            info!("level {} cleared; game won with score {}", self.level_index, self.score);
            self.phase = Phase::Won;
            return Ok(None);
        }

        let buffer = self.levels.get(next)?.motion.grid().clone();
        self.load_level(next)?;
        self.shuffle = Some(ShuffleState::new(buffer));
        self.phase = Phase::Transitioning;
        info!("advancing to level {next}");
        Ok(Some(next))
    }

    /// Blue checkpoint reached at `pos`: move the marker and snapshot.
    pub fn save_checkpoint(&mut self, pos: (usize, usize)) {
        self.clear_checkpoint_marker();
        self.motion.grid_mut().set(pos.0, pos.1, Cell::ActiveCheckpoint);
        self.checkpoint = Checkpoint { position: pos, motion: self.motion.clone(), score: self.score };
        debug!("checkpoint saved at {pos:?}");
    }

    /// Put grid, patterns, player and score back to the last checkpoint.
    pub fn restore_checkpoint(&mut self) {
        self.motion = self.checkpoint.motion.clone();
        self.player.place(self.checkpoint.position);
        self.player.clear_error();
        self.score = self.checkpoint.score;
    }

    /// The marker may have been carried off or overwritten by motion;
    /// only an `ActiveCheckpoint` still in place is cleared.
    fn clear_checkpoint_marker(&mut self) {
        let (x, y) = self.checkpoint.position;
        if self.motion.grid().cell_at(x, y) == Cell::ActiveCheckpoint {
            self.motion.grid_mut().set(x, y, Cell::Empty);
        }
    }

    // ── Queries ──

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn level_name(&self) -> &str {
        self.levels.get(self.level_index).map(|l| l.name.as_str()).unwrap_or("")
    }

    /// Grid a renderer should draw: the shuffle buffer mid-transition,
    /// the live grid otherwise.
    pub fn display_grid(&self) -> &Grid {
        match &self.shuffle {
            Some(shuffle) => &shuffle.buffer,
            None => self.motion.grid(),
        }
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }
}
