use super::{num_rows::NumRowsFeatures, FeatureExtractor};
use mnk_core::board::{Board, Mark};

/// Run counts followed by the pairwise products of every two run buckets.
///
/// The isolation slot stays in the base part but takes no part in products.
#[derive(Debug, Clone)]
pub struct CartesianFeatures {
    base: NumRowsFeatures,
}

impl CartesianFeatures {
    pub fn new(win_length: usize) -> Self {
        Self {
            base: NumRowsFeatures::new(win_length),
        }
    }

    fn buckets(&self) -> usize {
        self.base.layout().len()
    }
}

impl FeatureExtractor for CartesianFeatures {
    fn win_length(&self) -> usize {
        self.base.win_length()
    }

    fn features_count(&self) -> usize {
        let buckets = self.buckets();
        self.base.features_count() + buckets * buckets
    }

    fn feature_names(&self) -> Vec<String> {
        let mut names = self.base.feature_names();
        let products = names[..self.buckets()]
            .iter()
            .flat_map(|lhs| names[..self.buckets()].iter().map(move |rhs| format!("{lhs}*{rhs}")))
            .collect::<Vec<_>>();

        names.extend(products);
        names
    }

    fn features(&self, board: &Board, mover: Mark) -> Vec<u32> {
        let mut features = self.base.features(board, mover);
        let buckets = features[..self.buckets()].to_vec();

        features.reserve(buckets.len() * buckets.len());
        for lhs in &buckets {
            features.extend(buckets.iter().map(|rhs| lhs * rhs));
        }

        features
    }
}
