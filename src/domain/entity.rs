/// Player, directions and per-tick input.

/// Player movement direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// One edge-triggered command per tick. The host debounces keys and
/// resolves simultaneous presses (Reset first) before calling `tick`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Move(Direction),
    Reset,
}

impl Input {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Input::Move(dir) => Some(dir),
            Input::Reset => None,
        }
    }

    /// Pick the one input to honour from everything pressed this tick.
    /// Reset beats movement; among directions the first pressed wins.
    pub fn resolve(pressed: &[Input]) -> Option<Input> {
        if pressed.contains(&Input::Reset) {
            return Some(Input::Reset);
        }
        pressed.first().copied()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    /// Cell of the last blocked move, shown as feedback.
    pub error_cell: Option<(usize, usize)>,
    /// Remaining display time for `error_cell`.
    pub error_ms: u32,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player { x, y, error_cell: None, error_ms: 0 }
    }

    #[inline]
    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn place(&mut self, (x, y): (usize, usize)) {
        self.x = x;
        self.y = y;
    }

    pub fn flag_error(&mut self, at: (usize, usize), duration_ms: u32) {
        self.error_cell = Some(at);
        self.error_ms = duration_ms;
    }

    pub fn clear_error(&mut self) {
        self.error_cell = None;
        self.error_ms = 0;
    }

    /// Count down the error marker; clears it when the window ends.
    pub fn decay_error(&mut self, elapsed_ms: u32) {
        if self.error_cell.is_none() { return; }
        self.error_ms = self.error_ms.saturating_sub(elapsed_ms);
        if self.error_ms == 0 { self.error_cell = None; }
    }
}
