/// Events emitted during a simulation tick.
/// The presentation layer consumes these for redraws, cues and score display.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Move refused by a wall at (x, y).
    Blocked { x: usize, y: usize },
    /// Move refused by the edge of the grid.
    BlockedAtEdge,
    Moved { x: usize, y: usize },
    CheckpointSaved { x: usize, y: usize },
    /// Reset, death or crush put the player back at the checkpoint.
    CheckpointRestored { x: usize, y: usize },
    LevelAdvanced { index: usize },
    Won,
    Died { x: usize, y: usize },
    LootCollected { amount: u32 },
    CreditsToggled { on: bool },
    /// Cosmetic swap in the level-change shuffle buffer.
    ShuffleTick { a: usize, b: usize },
    ShuffleFinished,
}

/// The four sound cues of the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Error,
    Reset,
    Checkpoint,
    LevelChange,
}

impl GameEvent {
    pub fn cue(&self) -> Option<Cue> {
        match self {
            GameEvent::Blocked { .. } | GameEvent::BlockedAtEdge => Some(Cue::Error),
            GameEvent::CheckpointRestored { .. } => Some(Cue::Reset),
            GameEvent::CheckpointSaved { .. } => Some(Cue::Checkpoint),
            GameEvent::LevelAdvanced { .. } => Some(Cue::LevelChange),
            _ => None,
        }
    }
}

/// Receiver for tick outcomes. Implemented by the host (audio, drawing,
/// HUD); the core never performs the I/O itself.
pub trait EffectSink {
    fn on_event(&mut self, event: &GameEvent);

    fn on_cue(&mut self, _cue: Cue) {}
}

/// Deliver events in order, each followed by its cue (if any).
pub fn dispatch<S: EffectSink + ?Sized>(sink: &mut S, events: &[GameEvent]) {
    for event in events {
        sink.on_event(event);
        if let Some(cue) = event.cue() {
            sink.on_cue(cue);
        }
    }
}

impl EffectSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}
