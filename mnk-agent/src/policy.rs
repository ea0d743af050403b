use crate::agents::linear_q::ActionInfo;
use mnk_core::state::GameState;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::trace;

/// Picks one of the scored candidates of a turn.
pub trait Policy {
    /// Index of the chosen candidate, `None` only when `candidates` is empty.
    fn get_action(&mut self, state: &GameState, candidates: &[ActionInfo]) -> Option<usize>;
}

/// Explores uniformly with probability `epsilon`, otherwise picks uniformly
/// among the candidates sharing the highest value.
///
/// With a seed, exploration draws come from a saved stream of their own
/// (starting from the same seed) that only exploration advances, and
/// tie-breaks from another stream that only exploitation advances. The
/// exploration sequence and the tie-break sequence are each reproducible,
/// and neither shifts when the other branch is taken.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyPolicy {
    epsilon: f64,
    rng: StdRng,
    exploration_state: Option<StdRng>,
    tie_break: StdRng,
}

const TIE_BREAK_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

impl EpsilonGreedyPolicy {
    pub fn new(epsilon: f64, seed: Option<u64>) -> Self {
        let (rng, exploration_state, tie_break) = match seed {
            Some(seed) => {
                let rng = StdRng::seed_from_u64(seed);
                let exploration_state = rng.clone();
                let tie_break = StdRng::seed_from_u64(seed ^ TIE_BREAK_STREAM);
                (rng, Some(exploration_state), tie_break)
            }
            None => (StdRng::from_entropy(), None, StdRng::from_entropy()),
        };

        Self {
            epsilon,
            rng,
            exploration_state,
            tie_break,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn explore(&mut self, len: usize) -> usize {
        match &mut self.exploration_state {
            Some(exploration) => exploration.gen_range(0..len),
            None => self.rng.gen_range(0..len),
        }
    }
}

impl Policy for EpsilonGreedyPolicy {
    fn get_action(&mut self, _state: &GameState, candidates: &[ActionInfo]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }

        if self.epsilon > self.rng.gen::<f64>() {
            let index = self.explore(candidates.len());
            trace!(index, "exploration");
            return Some(index);
        }

        let max_value = candidates
            .iter()
            .map(ActionInfo::value)
            .fold(f64::NEG_INFINITY, f64::max);
        let best = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.value() == max_value)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        trace!(max_value, total = candidates.len(), tied = best.len(), "exploitation");

        // every value is NaN: fall back to the first candidate
        Some(best.choose(&mut self.tie_break).copied().unwrap_or(0))
    }
}
