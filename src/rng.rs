//! Random source for mine placement and the agent's fallback moves.
//!
//! `SmallRng` (xoshiro256++) from `rand`; on wasm32 entropy comes from
//! `getrandom` with the `wasm_js` backend. Seeded instances replay exactly.

use rand::rngs::SmallRng;
use rand::seq::{index, IndexedRandom};
use rand::SeedableRng;

/// Seedable RNG used by `Board::random` and `Agent::random_move`.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Seed from OS entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// One candidate, uniformly; `None` when there is nothing to pick.
    pub fn choose<T: Copy>(&mut self, candidates: &[T]) -> Option<T> {
        candidates.choose(&mut self.inner).copied()
    }

    /// `amount` distinct candidates, uniformly, or all of them when there
    /// are fewer.
    pub fn sample<T: Copy>(&mut self, candidates: &[T], amount: usize) -> Vec<T> {
        let amount = amount.min(candidates.len());
        index::sample(&mut self.inner, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i])
            .collect()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_choose_from_nothing() {
        let mut rng = GameRng::from_seed(7);
        let none: [u8; 0] = [];
        assert_eq!(rng.choose(&none), None);
        assert_eq!(rng.choose(&['x']), Some('x'));
    }

    #[test]
    fn test_choose_replays_with_same_seed() {
        let candidates: Vec<usize> = (0..36).collect();
        let mut a = GameRng::from_seed(2024);
        let mut b = GameRng::from_seed(2024);
        let picks_a: Vec<_> = (0..50).map(|_| a.choose(&candidates)).collect();
        let picks_b: Vec<_> = (0..50).map(|_| b.choose(&candidates)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_choose_reaches_every_candidate() {
        let candidates = ['a', 'b', 'c', 'd'];
        let mut rng = GameRng::from_seed(5);
        let mut hits = [0usize; 4];
        for _ in 0..1000 {
            let pick = rng.choose(&candidates).unwrap();
            hits[candidates.iter().position(|&c| c == pick).unwrap()] += 1;
        }
        // Expected 250 each
        for h in hits {
            assert!((150..350).contains(&h), "skewed pick count {h}");
        }
    }

    #[test]
    fn test_sample_distinct() {
        let candidates: Vec<u32> = (0..10).collect();
        let mut rng = GameRng::from_seed(11);

        let picked = rng.sample(&candidates, 5);
        let unique: BTreeSet<_> = picked.iter().copied().collect();
        assert_eq!(picked.len(), 5);
        assert_eq!(unique.len(), 5);

        let all: BTreeSet<_> = rng.sample(&candidates, 20).into_iter().collect();
        assert_eq!(all.len(), 10);
    }
}
