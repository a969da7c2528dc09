/// Movement patterns: cyclic step queues that drive moving tiles.
///
/// ## Encoding
///   'h' = Up    'b' = Down    'g' = Left    'd' = Right    '-' = Hold
///   ""  = stationary
///
/// Each tick the front step executes and is moved to the back of the
/// queue, so a pattern keeps its length forever.

use std::collections::VecDeque;
use std::fmt;

use crate::error::SimError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
    Hold,
}

impl Step {
    pub fn from_code(code: char) -> Option<Step> {
        Some(match code {
            'h' => Step::Up,
            'b' => Step::Down,
            'g' => Step::Left,
            'd' => Step::Right,
            '-' => Step::Hold,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            Step::Up => 'h',
            Step::Down => 'b',
            Step::Left => 'g',
            Step::Right => 'd',
            Step::Hold => '-',
        }
    }

    /// Grid displacement (dx, dy).
    pub fn delta(self) -> (isize, isize) {
        match self {
            Step::Up => (0, -1),
            Step::Down => (0, 1),
            Step::Left => (-1, 0),
            Step::Right => (1, 0),
            Step::Hold => (0, 0),
        }
    }

    /// Row-major index offset on a grid `width` cells wide.
    pub fn offset(self, width: usize) -> isize {
        let (dx, dy) = self.delta();
        dx + dy * width as isize
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MovementPattern {
    steps: VecDeque<Step>,
}

impl MovementPattern {
    pub fn stationary() -> Self {
        MovementPattern::default()
    }

    /// Decode a pattern string once, at load time.
    pub fn parse(code: &str) -> Result<Self, SimError> {
        let steps = code
            .chars()
            .enumerate()
            .map(|(offset, c)| Step::from_code(c).ok_or(SimError::InvalidStep { code: c, offset }))
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(MovementPattern { steps })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Step that executes on the next tick.
    pub fn peek(&self) -> Option<Step> {
        self.steps.front().copied()
    }

    /// Pop the front step and return it with the rotated pattern
    /// (remainder + executed step). `None` for a stationary tile.
    pub fn next_step(&self) -> Option<(Step, MovementPattern)> {
        let mut steps = self.steps.clone();
        let step = steps.pop_front()?;
        steps.push_back(step);
        Some((step, MovementPattern { steps }))
    }

    /// Net displacement of one full cycle. (0, 0) means the tile
    /// returns to its starting cell every `len()` ticks.
    pub fn net_delta(&self) -> (isize, isize) {
        self.steps.iter().fold((0, 0), |(x, y), s| {
            let (dx, dy) = s.delta();
            (x + dx, y + dy)
        })
    }
}

impl fmt::Display for MovementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step.code())?;
        }
        Ok(())
    }
}

/// String-level decoder: first step plus next tick's pattern.
pub fn decode(code: &str) -> Result<Option<(Step, MovementPattern)>, SimError> {
    Ok(MovementPattern::parse(code)?.next_step())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_stationary() {
        assert_eq!(decode("").unwrap(), None);
        assert!(MovementPattern::parse("").unwrap().is_empty());
    }

    #[test]
    fn first_step_moves_to_the_back() {
        let (step, rest) = decode("bbhd").unwrap().unwrap();
        assert_eq!(step, Step::Down);
        assert_eq!(rest.to_string(), "bhdb");
    }

    #[test]
    fn single_step_cycles_through_itself() {
        let (step, rest) = decode("d").unwrap().unwrap();
        assert_eq!(step, Step::Right);
        assert_eq!(rest.to_string(), "d");
    }

    #[test]
    fn hold_is_a_step() {
        let (step, rest) = decode("-h").unwrap().unwrap();
        assert_eq!(step, Step::Hold);
        assert_eq!(rest.to_string(), "h-");
        assert_eq!(Step::Hold.offset(32), 0);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(decode("hbx"), Err(SimError::InvalidStep { code: 'x', offset: 2 }));
        assert!(MovementPattern::parse("H").is_err());
    }

    #[test]
    fn offsets_follow_row_major_layout() {
        assert_eq!(Step::Up.offset(32), -32);
        assert_eq!(Step::Down.offset(32), 32);
        assert_eq!(Step::Left.offset(32), -1);
        assert_eq!(Step::Right.offset(32), 1);
    }

    #[test]
    fn full_cycle_restores_the_pattern() {
        let start = MovementPattern::parse("ddbbgghh").unwrap();
        let mut p = start.clone();
        for _ in 0..start.len() {
            p = p.next_step().unwrap().1;
        }
        assert_eq!(p, start);
        assert_eq!(start.net_delta(), (0, 0));
        assert_eq!(MovementPattern::parse("dd-").unwrap().net_delta(), (2, 0));
    }
}
