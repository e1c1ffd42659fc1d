// Injected randomness for the note engine.
//
// Every random decision the engine makes is "pick one of N": a chord tone,
// a scale degree, or a coin flip between two registers. `RandomSource`
// captures exactly that, so the engine can run on the seeded `SeqRng` in
// production and on a `ScriptedSource` in tests that need to assert exact
// substitution outcomes.

use dancepro_prng::SeqRng;

/// A source of uniform choices.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is always at least 1.
    fn index(&mut self, len: usize) -> usize;

    /// Fair coin.
    fn coin_flip(&mut self) -> bool {
        self.index(2) == 0
    }

    /// Uniform element of a non-empty slice.
    fn choose<T: Copy>(&mut self, items: &[T]) -> T
    where
        Self: Sized,
    {
        items[self.index(items.len())]
    }

    /// Uniform element of `items` other than `excluded`. If `excluded` is
    /// not present, every element is a candidate. `items` must hold at least
    /// one element besides `excluded`.
    fn choose_excluding<T: Copy + PartialEq>(&mut self, items: &[T], excluded: T) -> T
    where
        Self: Sized,
    {
        let skip = items.iter().filter(|&&x| x == excluded).count();
        let pick = self.index(items.len() - skip);
        items
            .iter()
            .copied()
            .filter(|&x| x != excluded)
            .nth(pick)
            .unwrap_or(items[0])
    }
}

impl RandomSource for SeqRng {
    fn index(&mut self, len: usize) -> usize {
        SeqRng::index(self, len)
    }
}

/// Replays a fixed list of picks, cycling when exhausted. Each pick is
/// reduced modulo the requested length, so any script is valid for any call.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, cursor: 0 }
    }

    /// A source that always picks the first candidate.
    pub fn first() -> Self {
        Self::new(vec![0])
    }

    /// Number of picks served so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn index(&mut self, len: usize) -> usize {
        let pick = if self.picks.is_empty() {
            0
        } else {
            self.picks[self.cursor % self.picks.len()]
        };
        self.cursor += 1;
        pick % len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_cycles() {
        let mut src = ScriptedSource::new(vec![1, 5]);
        assert_eq!(src.index(7), 1);
        assert_eq!(src.index(7), 5);
        assert_eq!(src.index(3), 1);
        assert_eq!(src.index(3), 2); // 5 % 3
        assert_eq!(src.draws(), 4);
    }

    #[test]
    fn choose_excluding_never_returns_excluded() {
        let mut rng = SeqRng::new(3);
        let items = [1, 2, 3, 4, 5, 6, 7];
        for _ in 0..1_000 {
            assert_ne!(rng.choose_excluding(&items, 4), 4);
        }
    }

    #[test]
    fn choose_excluding_skips_over_excluded_slot() {
        let items = [10, 20, 30];
        let mut src = ScriptedSource::new(vec![0, 1]);
        assert_eq!(src.choose_excluding(&items, 10), 20);
        assert_eq!(src.choose_excluding(&items, 10), 30);
    }

    #[test]
    fn choose_excluding_absent_value_uses_all() {
        let items = [10, 20, 30];
        let mut src = ScriptedSource::new(vec![2]);
        assert_eq!(src.choose_excluding(&items, 99), 30);
    }

    #[test]
    fn coin_flip_follows_script() {
        let mut src = ScriptedSource::new(vec![0, 1]);
        assert!(src.coin_flip());
        assert!(!src.coin_flip());
    }
}
