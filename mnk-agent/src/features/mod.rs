//! Board features for the linear value model.
//!
//! Every extractor returns a fixed-length vector whose layout depends only on
//! the win length: counts of same-mark runs bucketed by owner (relative to the
//! player to move), run length and whether the run is blocked, followed by an
//! isolation indicator.

mod cartesian;
mod num_rows;

pub use cartesian::CartesianFeatures;
pub use num_rows::NumRowsFeatures;

use mnk_core::{
    board::{Board, Mark},
    state::GameState,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub trait FeatureExtractor {
    fn win_length(&self) -> usize;

    /// Length of every vector returned by [`FeatureExtractor::features`].
    fn features_count(&self) -> usize;

    fn feature_names(&self) -> Vec<String>;

    fn features(&self, board: &Board, mover: Mark) -> Vec<u32>;

    fn get_features(&self, state: &GameState) -> Vec<u32> {
        self.features(state.board(), state.mover())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    #[default]
    NumRows,
    Cartesian,
}

impl FeatureKind {
    pub fn build(self, win_length: usize) -> Box<dyn FeatureExtractor> {
        match self {
            FeatureKind::NumRows => Box::new(NumRowsFeatures::new(win_length)),
            FeatureKind::Cartesian => Box::new(CartesianFeatures::new(win_length)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Mine,
    Theirs,
}

impl Owner {
    pub fn of(mark: Mark, mover: Mark) -> Self {
        if mark == mover {
            Owner::Mine
        } else {
            Owner::Theirs
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Owner::Mine => "mine",
            Owner::Theirs => "theirs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunKey {
    pub owner: Owner,
    pub length: usize,
    pub enemy_behind: bool,
}

impl Display for RunKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.owner.name(),
            self.length,
            if self.enemy_behind { "blocked" } else { "open" }
        )
    }
}

/// Index table of the run buckets for one win length.
///
/// Order: owner (mine, theirs), then `enemy_behind` (false, true), then run
/// length 2..=k; the blocked run of length k does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    win_length: usize,
    keys: Vec<RunKey>,
}

impl RunLayout {
    pub fn new(win_length: usize) -> Self {
        let mut keys = Vec::with_capacity(4 * win_length);

        for owner in [Owner::Mine, Owner::Theirs] {
            for enemy_behind in [false, true] {
                for length in 2..=win_length {
                    if length == win_length && enemy_behind {
                        continue;
                    }
                    keys.push(RunKey {
                        owner,
                        length,
                        enemy_behind,
                    });
                }
            }
        }

        Self { win_length, keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[RunKey] {
        &self.keys
    }

    pub fn index(&self, key: RunKey) -> Option<usize> {
        let k = self.win_length;

        if key.length < 2 || key.length > k || (key.enemy_behind && key.length == k) {
            return None;
        }

        let per_owner = 2 * k - 3;
        let owner_offset = match key.owner {
            Owner::Mine => 0,
            Owner::Theirs => per_owner,
        };
        let behind_offset = if key.enemy_behind { k - 1 } else { 0 };

        Some(owner_offset + behind_offset + key.length - 2)
    }
}

pub const ISOLATION_NAME: &str = "isolated";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_index_matches_enumeration() {
        for k in 2..=7 {
            let layout = RunLayout::new(k);
            for (position, key) in layout.keys().iter().enumerate() {
                assert_eq!(layout.index(*key), Some(position), "k={k} key={key}");
            }
        }
    }

    #[test]
    fn test_layout_rejects_missing_buckets() {
        let layout = RunLayout::new(4);
        let key = |length, enemy_behind| RunKey {
            owner: Owner::Theirs,
            length,
            enemy_behind,
        };

        assert_eq!(layout.index(key(1, false)), None);
        assert_eq!(layout.index(key(5, false)), None);
        assert_eq!(layout.index(key(4, true)), None);
        assert_eq!(layout.index(key(4, false)), Some(layout.len() / 2 + 2));
    }

    #[test]
    fn test_key_names() {
        let key = RunKey {
            owner: Owner::Mine,
            length: 3,
            enemy_behind: true,
        };
        assert_eq!(key.to_string(), "mine/3/blocked");
    }
}
