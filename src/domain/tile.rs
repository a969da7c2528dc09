/// Cell kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,             // Blocks the player
    CheckpointBlue,   // Saves progress when stepped on
    CheckpointRed,    // Level exit
    ActiveCheckpoint, // Spawn / current checkpoint marker
    Hazard,           // Kills the player
    Loot,             // Pickup, consumed on contact
    Secret,           // Opens the credits screen
}

/// Which kind of checkpoint the player stepped on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CheckpointKind {
    Blue,
    Red,
}

impl Cell {
    /// Does this cell stop the player?
    pub fn is_blocking(self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// Blue or red checkpoint (not the already-active marker).
    pub fn checkpoint_kind(self) -> Option<CheckpointKind> {
        match self {
            Cell::CheckpointBlue => Some(CheckpointKind::Blue),
            Cell::CheckpointRed => Some(CheckpointKind::Red),
            _ => None,
        }
    }

    /// Pack legend character.
    pub fn from_char(ch: char) -> Option<Cell> {
        Some(match ch {
            ' ' | '.' => Cell::Empty,
            '#' => Cell::Wall,
            'o' => Cell::CheckpointBlue,
            'X' => Cell::CheckpointRed,
            'P' => Cell::ActiveCheckpoint,
            '!' => Cell::Hazard,
            '$' => Cell::Loot,
            '?' => Cell::Secret,
            _ => return None,
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::CheckpointBlue => 'o',
            Cell::CheckpointRed => 'X',
            Cell::ActiveCheckpoint => 'P',
            Cell::Hazard => '!',
            Cell::Loot => '$',
            Cell::Secret => '?',
        }
    }

    /// Numeric codes used by old hand-written maps.
    /// 5..=9 were render-only arrow variants of a moving wall.
    pub fn from_legacy_code(code: u8) -> Option<Cell> {
        Some(match code {
            0 => Cell::Empty,
            1 | 5..=9 => Cell::Wall,
            2 => Cell::CheckpointBlue,
            3 => Cell::CheckpointRed,
            4 => Cell::ActiveCheckpoint,
            10 => Cell::Secret,
            33 => Cell::Hazard,
            44 => Cell::Loot,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_walls_block() {
        assert!(Cell::Wall.is_blocking());
        for c in [Cell::Empty, Cell::CheckpointBlue, Cell::CheckpointRed,
                  Cell::ActiveCheckpoint, Cell::Hazard, Cell::Loot, Cell::Secret] {
            assert!(!c.is_blocking(), "{c:?}");
        }
    }

    #[test]
    fn legend_round_trips() {
        for ch in "#.oXP!$?".chars() {
            assert_eq!(Cell::from_char(ch).map(Cell::to_char), Some(ch));
        }
        assert_eq!(Cell::from_char(' '), Some(Cell::Empty));
        assert_eq!(Cell::from_char('Z'), None);
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(Cell::from_legacy_code(1), Some(Cell::Wall));
        assert_eq!(Cell::from_legacy_code(7), Some(Cell::Wall));
        assert_eq!(Cell::from_legacy_code(3), Some(Cell::CheckpointRed));
        assert_eq!(Cell::from_legacy_code(10), Some(Cell::Secret));
        assert_eq!(Cell::from_legacy_code(11), None);
    }

    #[test]
    fn active_marker_is_not_a_checkpoint_target() {
        assert_eq!(Cell::ActiveCheckpoint.checkpoint_kind(), None);
        assert_eq!(Cell::CheckpointRed.checkpoint_kind(), Some(CheckpointKind::Red));
    }
}
