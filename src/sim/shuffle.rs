/// Level-change shuffle: a cosmetic "static resolving" effect.
///
/// The buffer is a private copy of the next level's template grid. Every
/// quantum of accumulated time swaps one random cell with a neighbour
/// (±1 or ±width, wrapping modulo the grid size). The live grid is never
/// touched; hosts draw the buffer while `Phase::Transitioning` is active.

use log::trace;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::SimRules;
use crate::domain::grid::Grid;
use crate::sim::event::GameEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleState {
    pub elapsed_ms: u32,
    pub swap_count: u32,
    pub buffer: Grid,
}

impl ShuffleState {
    pub fn new(buffer: Grid) -> Self {
        ShuffleState { elapsed_ms: 0, swap_count: 0, buffer }
    }

    /// Spend `elapsed_ms` on swaps. Returns `true` once the swap total has
    /// been exceeded; leftover time is discarded at that point.
    pub fn advance(
        &mut self,
        elapsed_ms: u32,
        rules: &SimRules,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let quantum = rules.shuffle_quantum_ms.max(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);

        while self.elapsed_ms > quantum {
            self.elapsed_ms -= quantum;
            if let Some((a, b)) = self.swap_once(rng) {
                events.push(GameEvent::ShuffleTick { a, b });
            }
            self.swap_count += 1;
            if self.swap_count > rules.shuffle_swaps {
                self.elapsed_ms = 0;
                return true;
            }
        }
        false
    }

    fn swap_once(&mut self, rng: &mut Pcg32) -> Option<(usize, usize)> {
        let len = self.buffer.len();
        if len == 0 { return None; }

        let a = rng.random_range(0..len);
        let step = if rng.random_bool(0.5) { 1 } else { self.buffer.width() as isize };
        let offset = if rng.random_bool(0.5) { step } else { -step };
        let b = (a as isize + offset).rem_euclid(len as isize) as usize;

        trace!("shuffle swap {a} <-> {b}");
        self.buffer.swap(a, b);
        Some((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::domain::tile::Cell;

    fn sample_grid() -> Grid {
        Grid::from_rows(&[
            "######",
            "#P..X#",
            "#.o$.#",
            "######",
        ])
    }

    fn run(seed: u64, ms: u32, rules: &SimRules) -> (ShuffleState, Vec<GameEvent>, bool) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut shuffle = ShuffleState::new(sample_grid());
        let mut events = vec![];
        let done = shuffle.advance(ms, rules, &mut rng, &mut events);
        (shuffle, events, done)
    }

    #[test]
    fn one_swap_per_quantum() {
        let rules = SimRules::default();
        let (shuffle, events, done) = run(1, 33, &rules);
        assert!(!done);
        assert_eq!(shuffle.swap_count, 6);
        assert_eq!(shuffle.elapsed_ms, 3);
        assert_eq!(events.len(), 6);
    }

    #[test]
    fn same_seed_same_swaps() {
        let rules = SimRules::default();
        let (a, ea, _) = run(7, 500, &rules);
        let (b, eb, _) = run(7, 500, &rules);
        assert_eq!(ea, eb);
        assert_eq!(a.buffer, b.buffer);
    }

    #[test]
    fn buffer_stays_a_permutation() {
        let rules = SimRules::default();
        let (shuffle, _, _) = run(3, 2_000, &rules);
        let count = |g: &Grid, c: Cell| g.cells().iter().filter(|&&x| x == c).count();
        let original = sample_grid();
        for cell in [Cell::Wall, Cell::Empty, Cell::ActiveCheckpoint, Cell::CheckpointRed, Cell::CheckpointBlue, Cell::Loot] {
            assert_eq!(count(&shuffle.buffer, cell), count(&original, cell), "{cell:?}");
        }
    }

    #[test]
    fn swaps_are_neighbours_modulo_len() {
        let rules = SimRules::default();
        let (shuffle, events, _) = run(11, 1_000, &rules);
        let (len, w) = (shuffle.buffer.len(), shuffle.buffer.width());
        for e in events {
            let GameEvent::ShuffleTick { a, b } = e else { panic!("unexpected {e:?}") };
            let fwd = (b + len - a) % len;
            assert!([1, len - 1, w, len - w].contains(&fwd), "{a} -> {b}");
        }
    }

    #[test]
    fn finishes_after_exceeding_total() {
        let rules = SimRules { shuffle_swaps: 10, ..SimRules::default() };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut shuffle = ShuffleState::new(sample_grid());
        let mut events = vec![];
        assert!(!shuffle.advance(50, &rules, &mut rng, &mut events));
        assert_eq!(shuffle.swap_count, 9);
        assert!(shuffle.advance(50, &rules, &mut rng, &mut events));
        assert_eq!(shuffle.swap_count, 11);
        assert_eq!(events.len(), 11);
    }
}
