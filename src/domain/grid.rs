/// Grid storage.
///
/// A `Grid` is a flat row-major array of cells (`index = x + y * width`).
/// A `MotionState` pairs a grid with its pattern grid. The two are only
/// ever built and replaced together, so their lengths cannot drift apart.

use std::fmt;

use crate::domain::pattern::{MovementPattern, Step};
use crate::domain::tile::Cell;
use crate::error::SimError;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of `Empty` cells.
    pub fn empty(width: usize, height: usize) -> Self {
        Grid { width, height, cells: vec![Cell::Empty; width * height] }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, SimError> {
        if width * height != cells.len() {
            return Err(SimError::DimensionMismatch { width, height, cells: cells.len() });
        }
        Ok(Grid { width, height, cells })
    }

    /// Build from legend rows (see `Cell::from_char`). Unknown characters
    /// become `Empty`; short rows are padded with `Empty`.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Grid::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.cells[x + y * width] = Cell::from_char(ch).unwrap_or(Cell::Empty);
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize { self.width }

    #[inline]
    pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn len(&self) -> usize { self.cells.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize { x + y * self.width }

    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell at (x, y). Out of bounds reads as `Wall`.
    #[inline]
    pub fn cell_at(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[self.index(x, y)]
        } else {
            Cell::Wall
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] { &self.cells }

    /// Exchange two cells by flat index.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    /// Row-major positions holding `cell`.
    pub fn find_all(&self, cell: Cell) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate()
            .filter(move |(_, c)| **c == cell)
            .map(move |(i, _)| self.position(i))
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] { &mut self.cells }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MotionState {
    grid: Grid,
    patterns: Vec<MovementPattern>,
}

impl MotionState {
    pub fn new(grid: Grid, patterns: Vec<MovementPattern>) -> Result<Self, SimError> {
        if grid.len() != patterns.len() {
            return Err(SimError::LengthMismatch { cells: grid.len(), patterns: patterns.len() });
        }
        Ok(MotionState { grid, patterns })
    }

    /// A grid where nothing moves.
    pub fn still(grid: Grid) -> Self {
        let patterns = vec![MovementPattern::stationary(); grid.len()];
        MotionState { grid, patterns }
    }

    /// Assign a decoded pattern to the tile at (x, y).
    pub fn with_pattern(mut self, x: usize, y: usize, pattern: MovementPattern) -> Self {
        if x < self.grid.width() && y < self.grid.height() {
            let i = self.grid.index(x, y);
            self.patterns[i] = pattern;
        }
        self
    }

    /// Empty the cell at (x, y) and drop its pattern.
    pub fn clear_tile(&mut self, x: usize, y: usize) {
        if x < self.grid.width() && y < self.grid.height() {
            let i = self.grid.index(x, y);
            self.grid.cells[i] = Cell::Empty;
            self.patterns[i] = MovementPattern::stationary();
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }

    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid { &mut self.grid }

    #[inline]
    pub fn patterns(&self) -> &[MovementPattern] { &self.patterns }

    pub fn pattern_at(&self, x: usize, y: usize) -> Option<&MovementPattern> {
        if x < self.grid.width() && y < self.grid.height() {
            self.patterns.get(self.grid.index(x, y))
        } else {
            None
        }
    }

    /// Step the tile at (x, y) will take next tick, for arrow rendering.
    pub fn heading_at(&self, x: usize, y: usize) -> Option<Step> {
        self.pattern_at(x, y).and_then(MovementPattern::peek)
    }

    /// Does any tile have a pattern?
    pub fn has_motion(&self) -> bool {
        self.patterns.iter().any(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_row_major() {
        let g = Grid::from_rows(&[
            "#.o",
            "P!$",
        ]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.cells()[g.index(2, 0)], Cell::CheckpointBlue);
        assert_eq!(g.cell_at(0, 1), Cell::ActiveCheckpoint);
        assert_eq!(g.position(5), (2, 1));
        assert_eq!(g.to_string(), "#.o\nP!$\n");
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = Grid::empty(2, 2);
        assert_eq!(g.cell_at(2, 0), Cell::Wall);
        assert!(!g.in_bounds(-1, 0));
        assert!(g.in_bounds(1, 1));
    }

    #[test]
    fn dimension_checks() {
        assert!(Grid::from_cells(3, 2, vec![Cell::Empty; 6]).is_ok());
        assert_eq!(
            Grid::from_cells(3, 2, vec![Cell::Empty; 5]),
            Err(SimError::DimensionMismatch { width: 3, height: 2, cells: 5 }),
        );
    }

    #[test]
    fn motion_state_rejects_mismatched_lengths() {
        let g = Grid::empty(2, 2);
        let err = MotionState::new(g, vec![MovementPattern::stationary(); 3]).unwrap_err();
        assert_eq!(err, SimError::LengthMismatch { cells: 4, patterns: 3 });
    }

    #[test]
    fn clear_tile_drops_cell_and_pattern() {
        let mut g = Grid::empty(2, 1);
        g.set(1, 0, Cell::Loot);
        let mut m = MotionState::still(g).with_pattern(1, 0, MovementPattern::parse("g").unwrap());
        m.clear_tile(1, 0);
        assert_eq!(m.grid().cell_at(1, 0), Cell::Empty);
        assert!(!m.has_motion());
    }

    #[test]
    fn heading_reports_next_step() {
        let m = MotionState::still(Grid::empty(3, 3))
            .with_pattern(1, 1, MovementPattern::parse("gd").unwrap());
        assert_eq!(m.heading_at(1, 1), Some(Step::Left));
        assert_eq!(m.heading_at(0, 0), None);
        assert!(m.has_motion());
    }
}
