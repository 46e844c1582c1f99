//! The boundary to the external training/inference engine.
//!
//! The engine is a correctness oracle: this crate never prescribes or
//! inspects its algorithm. Everything crossing the boundary is either plain
//! data ([`FeatureBlock`], label indices, the hyperparameter JSON object) or
//! the opaque [`ModelStateHandle`] the engine hands back. [`EngineAdapter`]
//! is a stateless marshaling layer; all semantic validation stays in the
//! classifier.

use serde::{Deserialize, Serialize};

use crate::math::Array2;
use crate::params::Hyperparameters;

/// A failure signaled by the engine, carried verbatim.
#[derive(Debug, thiserror::Error)]
#[error("engine error: {0}")]
pub struct EngineError(pub String);

/// Handle format version; bumped if the token envelope ever changes.
const HANDLE_VERSION: u32 = 1;

/// Opaque, serializable model-state token.
///
/// Produced and consumed only by engine implementations. The front-end
/// stores it, passes it back on update/infer, and replaces it wholesale
/// after every successful fit or partial_fit; it never parses the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStateHandle {
    version: u32,
    payload: String,
}

impl ModelStateHandle {
    /// Wrap an engine-owned payload in the current envelope version.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            version: HANDLE_VERSION,
            payload: payload.into(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The engine-owned payload. Only engine implementations should read
    /// this; its structure is not part of the front-end contract.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Whether a feature matrix should be treated as dense or sparse by the
/// engine. The front-end passes this flag through without acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureLayout {
    Dense,
    Sparse,
}

/// A borrowed feature matrix in engine wire form: row-major values plus
/// shape and the dense/sparse flag.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBlock<'a> {
    pub values: &'a [f64],
    pub rows: usize,
    pub cols: usize,
    pub layout: FeatureLayout,
}

impl<'a> FeatureBlock<'a> {
    fn from_matrix(x: &'a Array2<f64>, layout: FeatureLayout) -> Self {
        Self {
            values: x.as_slice(),
            rows: x.nrows(),
            cols: x.ncols(),
            layout,
        }
    }
}

/// The four blocking operations an engine must provide.
///
/// Each call fully completes before returning; cancellation and internal
/// parallelism are the engine's concern (steered by the `n_jobs`
/// hyperparameter in the JSON object).
pub trait TsetlinEngine {
    /// Train a fresh model. `labels` are contiguous class indices in
    /// `[0, num_classes)`; `params_json` is the canonical hyperparameter
    /// object.
    fn train(
        &self,
        features: FeatureBlock<'_>,
        labels: &[usize],
        params_json: &str,
        num_classes: usize,
        n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError>;

    /// Continue training from an existing model state.
    fn update(
        &self,
        features: FeatureBlock<'_>,
        labels: &[usize],
        state: &ModelStateHandle,
        n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError>;

    /// Predict one class index per input row.
    fn infer(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<usize>, EngineError>;

    /// Per-class scores, one row per input row, one column per class.
    fn infer_probabilities(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<Vec<f64>>, EngineError>;
}

/// Stateless wrapper that marshals crate types into engine wire form.
#[derive(Debug)]
pub struct EngineAdapter<E> {
    engine: E,
    layout: FeatureLayout,
}

impl<E: TsetlinEngine> EngineAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            layout: FeatureLayout::Dense,
        }
    }

    /// Override the layout flag passed through to the engine.
    pub fn with_layout(engine: E, layout: FeatureLayout) -> Self {
        Self { engine, layout }
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn train(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        params: &Hyperparameters,
        num_classes: usize,
        n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        log::trace!(
            "engine train: {} rows x {} cols, {} classes, {} iterations",
            x.nrows(),
            x.ncols(),
            num_classes,
            n_iter
        );
        self.engine.train(
            FeatureBlock::from_matrix(x, self.layout),
            labels,
            &params.to_json(),
            num_classes,
            n_iter,
        )
    }

    pub fn update(
        &self,
        x: &Array2<f64>,
        labels: &[usize],
        state: &ModelStateHandle,
        n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        log::trace!(
            "engine update: {} rows x {} cols, {} iterations",
            x.nrows(),
            x.ncols(),
            n_iter
        );
        self.engine
            .update(FeatureBlock::from_matrix(x, self.layout), labels, state, n_iter)
    }

    pub fn infer(
        &self,
        x: &Array2<f64>,
        state: &ModelStateHandle,
    ) -> Result<Vec<usize>, EngineError> {
        self.engine
            .infer(FeatureBlock::from_matrix(x, self.layout), state)
    }

    pub fn infer_probabilities(
        &self,
        x: &Array2<f64>,
        state: &ModelStateHandle,
    ) -> Result<Vec<Vec<f64>>, EngineError> {
        self.engine
            .infer_probabilities(FeatureBlock::from_matrix(x, self.layout), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trips_through_json() {
        let handle = ModelStateHandle::new("{\"clauses\":[]}");
        let json = serde_json::to_string(&handle).unwrap();
        let back: ModelStateHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, handle);
        assert_eq!(back.version(), 1);
    }

    #[test]
    fn feature_block_preserves_shape_and_layout() {
        let x = Array2::from_shape_vec((2, 3), vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0]).unwrap();
        let block = FeatureBlock::from_matrix(&x, FeatureLayout::Sparse);
        assert_eq!(block.rows, 2);
        assert_eq!(block.cols, 3);
        assert_eq!(block.layout, FeatureLayout::Sparse);
        assert_eq!(block.values.len(), 6);
    }
}
