/// Shifting labyrinth simulation.
///
/// `domain` holds the pure rules (cells, movement patterns, tile motion,
/// player moves); `sim` holds the stateful game (world, levels, shuffle,
/// the tick). Hosts drive `sim::step::tick` at a fixed timestep and react
/// to the returned `GameEvent`s.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
