/// Tile-motion engine: advances every moving tile one step.
///
/// The next state is always built in fresh buffers from the previous one,
/// never in place, so a sweep cannot read a cell it already overwrote.
///
/// Sweep rules (row-major, deterministic):
///   - stationary, non-empty tile  → copied to its own cell
///   - stationary, empty tile      → contributes nothing
///   - moving tile                 → written at `i + offset(step)` together
///                                   with its rotated pattern
///
/// Two writers on the same destination: the later source index wins.
/// Stepping off the grid is an authoring error (`SimError::OutOfBounds`).

use log::trace;

use crate::domain::grid::{Grid, MotionState};
use crate::domain::pattern::MovementPattern;
use crate::domain::tile::Cell;
use crate::error::SimError;

pub fn advance(state: &MotionState) -> Result<MotionState, SimError> {
    let grid = state.grid();
    let (width, height) = (grid.width(), grid.height());

    let mut next = Grid::empty(width, height);
    let mut next_patterns = vec![MovementPattern::stationary(); grid.len()];
    let mut written = vec![false; grid.len()];

    for (i, (&cell, pattern)) in grid.cells().iter().zip(state.patterns()).enumerate() {
        let (step, rotated) = match pattern.next_step() {
            Some(s) => s,
            None => {
                if cell != Cell::Empty {
                    write_cell(&mut next, &mut written, i, cell);
                }
                continue;
            }
        };

        let (x, y) = grid.position(i);
        let (dx, dy) = step.delta();
        let (tx, ty) = (x as isize + dx, y as isize + dy);
        if !grid.in_bounds(tx, ty) {
            return Err(SimError::OutOfBounds { x, y, step, width, height });
        }

        let dest = grid.index(tx as usize, ty as usize);
        write_cell(&mut next, &mut written, dest, cell);
        next_patterns[dest] = rotated;
    }

    MotionState::new(next, next_patterns)
}

/// Advance `ticks` times in a row.
pub fn advance_n(state: &MotionState, ticks: usize) -> Result<MotionState, SimError> {
    let mut current = state.clone();
    for _ in 0..ticks {
        current = advance(&current)?;
    }
    Ok(current)
}

fn write_cell(grid: &mut Grid, written: &mut [bool], index: usize, cell: Cell) {
    if written[index] {
        trace!("motion overwrite at {:?}: {:?} replaces {:?}",
            grid.position(index), cell, grid.cells()[index]);
    }
    written[index] = true;
    grid.cells_mut()[index] = cell;
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    /// A 9x9 interior with a single mover whose closed loop stays inside.
    fn loop_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(vec!["dg", "gd", "hb", "bh", "-", "dbgh"]), 1..4)
            .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn still_grids_are_fixed_points(cells in prop::collection::vec(0u8..5, 16)) {
            let cells = cells.into_iter()
                .map(|c| Cell::from_legacy_code(c).unwrap())
                .collect();
            let s = MotionState::still(Grid::from_cells(4, 4, cells).unwrap());
            prop_assert_eq!(advance(&s).unwrap(), s);
        }

        #[test]
        fn pattern_length_is_preserved(code in loop_strategy(), ticks in 0usize..20) {
            let mut g = Grid::empty(9, 9);
            g.set(4, 4, Cell::Wall);
            let s = MotionState::still(g).with_pattern(4, 4, MovementPattern::parse(&code).unwrap());
            let total: usize = advance_n(&s, ticks).unwrap()
                .patterns().iter().map(MovementPattern::len).sum();
            prop_assert_eq!(total, code.len());
        }

        #[test]
        fn closed_loops_return_after_one_cycle(code in loop_strategy()) {
            let mut g = Grid::empty(9, 9);
            g.set(4, 4, Cell::Wall);
            let s = MotionState::still(g).with_pattern(4, 4, MovementPattern::parse(&code).unwrap());
            prop_assert_eq!(advance_n(&s, code.len()).unwrap(), s);
        }
    }
}
