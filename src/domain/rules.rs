/// Player movement rules.
///
/// Moves are checked against the grid *after* tile motion for the tick,
/// so a player can step into a cell a wall just vacated and is stopped
/// by a wall that just arrived.
///
/// Pure functions: no world state, no side effects. The caller applies
/// the outcome (position, error marker, checkpoint, level change).

use crate::domain::entity::Direction;
use crate::domain::grid::Grid;
use crate::domain::tile::{Cell, CheckpointKind};

/// What the player found on the cell they moved into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Landing {
    Floor,
    Checkpoint(CheckpointKind),
    Hazard,
    Loot,
    Secret,
}

impl Landing {
    pub fn of(cell: Cell) -> Landing {
        if let Some(kind) = cell.checkpoint_kind() {
            return Landing::Checkpoint(kind);
        }
        match cell {
            Cell::Hazard => Landing::Hazard,
            Cell::Loot => Landing::Loot,
            Cell::Secret => Landing::Secret,
            _ => Landing::Floor,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Target is outside the grid.
    BlockedAtEdge,
    /// Target is a wall.
    Blocked { at: (usize, usize) },
    Moved { to: (usize, usize), landing: Landing },
}

/// Target cell of a move, or `None` if it leaves the grid.
pub fn target(grid: &Grid, (x, y): (usize, usize), dir: Direction) -> Option<(usize, usize)> {
    let (dx, dy) = dir.delta();
    let (tx, ty) = (x as isize + dx, y as isize + dy);
    if grid.in_bounds(tx, ty) {
        Some((tx as usize, ty as usize))
    } else {
        None
    }
}

pub fn try_move(grid: &Grid, from: (usize, usize), dir: Direction) -> MoveOutcome {
    let (tx, ty) = match target(grid, from, dir) {
        Some(t) => t,
        None => return MoveOutcome::BlockedAtEdge,
    };
    let cell = grid.cell_at(tx, ty);
    if cell.is_blocking() {
        return MoveOutcome::Blocked { at: (tx, ty) };
    }
    MoveOutcome::Moved { to: (tx, ty), landing: Landing::of(cell) }
}

/// Is the player's cell occupied by a wall (a wall slid onto them)?
pub fn is_crushed(grid: &Grid, (x, y): (usize, usize)) -> bool {
    grid.cell_at(x, y).is_blocking()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_by_wall() {
        let g = Grid::from_rows(&[
            "####",
            "#P##",
            "####",
        ]);
        assert_eq!(try_move(&g, (1, 1), Direction::Right), MoveOutcome::Blocked { at: (2, 1) });
    }

    #[test]
    fn move_onto_floor() {
        let g = Grid::from_rows(&[
            "#####",
            "#P..#",
            "#####",
        ]);
        assert_eq!(
            try_move(&g, (1, 1), Direction::Right),
            MoveOutcome::Moved { to: (2, 1), landing: Landing::Floor },
        );
    }

    #[test]
    fn edge_of_grid() {
        let g = Grid::from_rows(&[
            "P.",
            "..",
        ]);
        assert_eq!(try_move(&g, (0, 0), Direction::Left), MoveOutcome::BlockedAtEdge);
        assert_eq!(try_move(&g, (0, 0), Direction::Up), MoveOutcome::BlockedAtEdge);
        assert_eq!(try_move(&g, (1, 1), Direction::Right), MoveOutcome::BlockedAtEdge);
        assert_eq!(try_move(&g, (1, 1), Direction::Down), MoveOutcome::BlockedAtEdge);
    }

    #[test]
    fn special_landings() {
        let g = Grid::from_rows(&[
            ".o.",
            "!P$",
            "?X.",
        ]);
        let from = (1, 1);
        assert_eq!(try_move(&g, from, Direction::Up),
            MoveOutcome::Moved { to: (1, 0), landing: Landing::Checkpoint(CheckpointKind::Blue) });
        assert_eq!(try_move(&g, from, Direction::Down),
            MoveOutcome::Moved { to: (1, 2), landing: Landing::Checkpoint(CheckpointKind::Red) });
        assert_eq!(try_move(&g, from, Direction::Left),
            MoveOutcome::Moved { to: (0, 1), landing: Landing::Hazard });
        assert_eq!(try_move(&g, from, Direction::Right),
            MoveOutcome::Moved { to: (2, 1), landing: Landing::Loot });
        assert_eq!(try_move(&g, (0, 1), Direction::Down),
            MoveOutcome::Moved { to: (0, 2), landing: Landing::Secret });
    }

    #[test]
    fn active_checkpoint_is_plain_floor() {
        let g = Grid::from_rows(&["P."]);
        assert_eq!(
            try_move(&g, (1, 0), Direction::Left),
            MoveOutcome::Moved { to: (0, 0), landing: Landing::Floor },
        );
    }

    #[test]
    fn crushed_when_wall_covers_player() {
        let g = Grid::from_rows(&["#."]);
        assert!(is_crushed(&g, (0, 0)));
        assert!(!is_crushed(&g, (1, 0)));
    }
}
