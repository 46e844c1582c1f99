//! Bidirectional label <-> class-index mapping.
//!
//! The engine only ever sees contiguous zero-based class indices; this
//! encoder is the sole interpreter of those indices back into the caller's
//! label space. The mapping is fixed at fit time: index = position of the
//! label in the ascending sort of distinct fit labels.

use std::fmt::Debug;

use crate::error::TsetlinError;

/// Mapping between raw labels and zero-based class indices.
#[derive(Debug, Clone)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}

impl<L> LabelEncoder<L>
where
    L: Ord + Clone + Debug,
{
    /// Build the mapping from a label sequence.
    ///
    /// Fails unless at least two distinct labels are present; a classifier
    /// cannot be trained on a single class.
    pub fn fit(labels: &[L]) -> Result<Self, TsetlinError> {
        let mut classes: Vec<L> = labels.to_vec();
        classes.sort();
        classes.dedup();

        if classes.len() < 2 {
            let class = match classes.first() {
                Some(only) => format!("{:?}", only),
                None => "(no labels)".to_string(),
            };
            return Err(TsetlinError::InsufficientClasses { class });
        }

        Ok(Self { classes })
    }

    /// The distinct labels seen at fit, in ascending order.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Map labels to their class indices. Labels unseen at fit are an error.
    pub fn transform(&self, labels: &[L]) -> Result<Vec<usize>, TsetlinError> {
        labels
            .iter()
            .map(|label| {
                self.classes
                    .binary_search(label)
                    .map_err(|_| TsetlinError::UnknownLabel {
                        label: format!("{:?}", label),
                    })
            })
            .collect()
    }

    /// Map class indices back to the original labels.
    pub fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<L>, TsetlinError> {
        indices
            .iter()
            .map(|&index| {
                self.classes
                    .get(index)
                    .cloned()
                    .ok_or(TsetlinError::ClassIndexOutOfRange {
                        index,
                        num_classes: self.classes.len(),
                    })
            })
            .collect()
    }
}
