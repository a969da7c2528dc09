/// Pure labyrinth rules: cells, patterns, grids, tile motion, player moves.

pub mod entity;
pub mod grid;
pub mod motion;
pub mod pattern;
pub mod rules;
pub mod tile;
