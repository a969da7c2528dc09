/// Stateful simulation: world state, levels, the tick, events.

pub mod event;
pub mod level;
pub mod shuffle;
pub mod step;
pub mod world;
