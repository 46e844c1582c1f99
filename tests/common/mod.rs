//! Shared test doubles for the engine boundary.
//!
//! `CentroidEngine` is a deterministic stand-in for the native engine: it
//! learns one centroid per class and predicts by nearest centroid. Its model
//! state lives in the handle payload as JSON, exactly the way a real engine
//! owns its opaque blob, so it exercises the full store/pass/replace cycle.

use serde::{Deserialize, Serialize};

use tsetlin_estimators::engine::{EngineError, FeatureBlock, ModelStateHandle, TsetlinEngine};

#[derive(Debug, Serialize, Deserialize)]
struct CentroidState {
    sums: Vec<Vec<f64>>,
    counts: Vec<usize>,
}

impl CentroidState {
    fn from_handle(state: &ModelStateHandle) -> Result<Self, EngineError> {
        serde_json::from_str(state.payload())
            .map_err(|e| EngineError(format!("malformed model state: {}", e)))
    }

    fn to_handle(&self) -> ModelStateHandle {
        ModelStateHandle::new(serde_json::to_string(self).expect("state serializes"))
    }

    fn accumulate(&mut self, features: &FeatureBlock<'_>, labels: &[usize]) {
        for (row, &label) in feature_rows(features).zip(labels) {
            for (sum, value) in self.sums[label].iter_mut().zip(row) {
                *sum += value;
            }
            self.counts[label] += 1;
        }
    }

    /// Squared distance from `row` to each class centroid; untrained classes
    /// are infinitely far.
    fn distances(&self, row: &[f64]) -> Vec<f64> {
        self.sums
            .iter()
            .zip(&self.counts)
            .map(|(sum, &count)| {
                if count == 0 {
                    return f64::INFINITY;
                }
                sum.iter()
                    .zip(row)
                    .map(|(s, v)| {
                        let d = s / count as f64 - v;
                        d * d
                    })
                    .sum()
            })
            .collect()
    }
}

fn feature_rows<'a>(features: &FeatureBlock<'a>) -> impl Iterator<Item = &'a [f64]> {
    features.values.chunks_exact(features.cols.max(1))
}

/// Nearest-centroid engine. Ignores `n_iter`; a single pass is enough for a
/// deterministic double.
pub struct CentroidEngine;

impl TsetlinEngine for CentroidEngine {
    fn train(
        &self,
        features: FeatureBlock<'_>,
        labels: &[usize],
        params_json: &str,
        num_classes: usize,
        _n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        // The boundary contract: params arrive as a JSON object.
        let params: serde_json::Value = serde_json::from_str(params_json)
            .map_err(|e| EngineError(format!("malformed params json: {}", e)))?;
        if !params.is_object() {
            return Err(EngineError("params json is not an object".to_string()));
        }

        let mut state = CentroidState {
            sums: vec![vec![0.0; features.cols]; num_classes],
            counts: vec![0; num_classes],
        };
        state.accumulate(&features, labels);
        Ok(state.to_handle())
    }

    fn update(
        &self,
        features: FeatureBlock<'_>,
        labels: &[usize],
        state: &ModelStateHandle,
        _n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        let mut state = CentroidState::from_handle(state)?;
        state.accumulate(&features, labels);
        Ok(state.to_handle())
    }

    fn infer(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<usize>, EngineError> {
        let state = CentroidState::from_handle(state)?;
        Ok(feature_rows(&features)
            .map(|row| {
                let distances = state.distances(row);
                // Ties resolve to the lowest class index.
                distances
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0)
            })
            .collect())
    }

    fn infer_probabilities(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<Vec<f64>>, EngineError> {
        let state = CentroidState::from_handle(state)?;
        Ok(feature_rows(&features)
            .map(|row| {
                let scores: Vec<f64> = state
                    .distances(row)
                    .into_iter()
                    .map(|d| if d.is_finite() { 1.0 / (1.0 + d) } else { 0.0 })
                    .collect();
                let total: f64 = scores.iter().sum();
                if total > 0.0 {
                    scores.into_iter().map(|s| s / total).collect()
                } else {
                    scores
                }
            })
            .collect())
    }
}

/// Delegates everything to `CentroidEngine` except `update`, which always
/// fails. Used to verify that a failed incremental call leaves the
/// classifier untouched.
pub struct FailingUpdateEngine;

impl TsetlinEngine for FailingUpdateEngine {
    fn train(
        &self,
        features: FeatureBlock<'_>,
        labels: &[usize],
        params_json: &str,
        num_classes: usize,
        n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        CentroidEngine.train(features, labels, params_json, num_classes, n_iter)
    }

    fn update(
        &self,
        _features: FeatureBlock<'_>,
        _labels: &[usize],
        _state: &ModelStateHandle,
        _n_iter: usize,
    ) -> Result<ModelStateHandle, EngineError> {
        Err(EngineError("simulated engine failure".to_string()))
    }

    fn infer(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<usize>, EngineError> {
        CentroidEngine.infer(features, state)
    }

    fn infer_probabilities(
        &self,
        features: FeatureBlock<'_>,
        state: &ModelStateHandle,
    ) -> Result<Vec<Vec<f64>>, EngineError> {
        CentroidEngine.infer_probabilities(features, state)
    }
}

/// Initialize test logging once; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
