//! The classifier lifecycle state machine.
//!
//! [`TsetlinMachineClassifier`] composes the hyperparameter validator, the
//! label encoder and the engine adapter behind the standard estimator
//! contract: construct with parameters, fit on data, predict on new data.
//! The instance is either unfitted or fitted; every invariant between calls
//! (feature count, label mapping, iteration count) is enforced here, and a
//! failed fit or partial_fit leaves the prior state untouched.

use std::fmt::Debug;

use crate::engine::{EngineAdapter, ModelStateHandle, TsetlinEngine};
use crate::error::TsetlinError;
use crate::labels::LabelEncoder;
use crate::math::Array2;
use crate::params::Hyperparameters;

pub use crate::params::DEFAULT_N_ITER;

/// Everything that exists only after a successful fit.
///
/// Replaced wholesale on fit and never mutated piecemeal, which is what
/// makes failed calls side-effect free.
#[derive(Debug, Clone)]
struct FittedState<L> {
    encoder: LabelEncoder<L>,
    n_features: usize,
    model: ModelStateHandle,
}

/// Multiclass Tsetlin Machine classifier front-end.
///
/// Generic over the label type `L` (anything orderable) and the engine
/// implementation `E`. Mutating calls take `&mut self` and predict calls
/// take `&self`; the type system carries the concurrency contract, there is
/// no internal locking.
pub struct TsetlinMachineClassifier<L, E> {
    params: Hyperparameters,
    adapter: EngineAdapter<E>,
    fitted: Option<FittedState<L>>,
}

impl<L, E> TsetlinMachineClassifier<L, E>
where
    L: Ord + Clone + Debug,
    E: TsetlinEngine,
{
    /// An unfitted classifier with default hyperparameters.
    pub fn new(engine: E) -> Self {
        Self::with_params(engine, Hyperparameters::default())
    }

    /// An unfitted classifier with explicit hyperparameters.
    ///
    /// Build the set with [`Hyperparameters::from_pairs`] to get
    /// construction-time rejection of unrecognized keys.
    pub fn with_params(engine: E, params: Hyperparameters) -> Self {
        Self {
            params,
            adapter: EngineAdapter::new(engine),
            fitted: None,
        }
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Replace the hyperparameter set. Takes effect at the next fit; the
    /// set is validated there, not here.
    pub fn set_params(&mut self, params: Hyperparameters) {
        self.params = params;
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The classes seen at fit, in index order.
    pub fn classes(&self) -> Option<&[L]> {
        self.fitted.as_ref().map(|state| state.encoder.classes())
    }

    /// The feature count recorded at fit.
    pub fn n_features(&self) -> Option<usize> {
        self.fitted.as_ref().map(|state| state.n_features)
    }

    /// The opaque engine model state, present once fitted.
    pub fn model_state(&self) -> Option<&ModelStateHandle> {
        self.fitted.as_ref().map(|state| &state.model)
    }

    /// Train a fresh model, discarding any prior state.
    ///
    /// Valid from any state. On error the instance keeps whatever state it
    /// had before the call.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[L], n_iter: usize) -> Result<(), TsetlinError> {
        check_n_iter(n_iter)?;
        check_xy(x, y)?;
        self.params.validate()?;

        let encoder = LabelEncoder::fit(y)?;
        let encoded = encoder.transform(y)?;
        let n_features = x.ncols();

        log::info!(
            "fit: {} samples x {} features, {} classes, {} iterations",
            x.nrows(),
            n_features,
            encoder.num_classes(),
            n_iter
        );

        let model = self
            .adapter
            .train(x, &encoded, &self.params, encoder.num_classes(), n_iter)?;

        self.fitted = Some(FittedState {
            encoder,
            n_features,
            model,
        });
        Ok(())
    }

    /// Advance the existing model incrementally.
    ///
    /// On an unfitted instance this behaves exactly as [`fit`](Self::fit).
    /// Once fitted, the feature count must match the original fit and `y`
    /// must not contain labels unseen there; this is a stricter contract
    /// than `fit`, because the label mapping is immutable.
    pub fn partial_fit(
        &mut self,
        x: &Array2<f64>,
        y: &[L],
        n_iter: usize,
    ) -> Result<(), TsetlinError> {
        let model = match self.fitted.as_ref() {
            None => return self.fit(x, y, n_iter),
            Some(state) => {
                check_n_iter(n_iter)?;
                check_xy(x, y)?;
                check_feature_count(state.n_features, x.ncols())?;

                let encoded = state.encoder.transform(y)?;

                log::info!("partial_fit: {} samples, {} iterations", x.nrows(), n_iter);

                self.adapter.update(x, &encoded, &state.model, n_iter)?
            }
        };

        // Only the handle changes; encoder and feature count are preserved.
        if let Some(state) = self.fitted.as_mut() {
            state.model = model;
        }
        Ok(())
    }

    /// Predict one label per input row, in row order, in the original label
    /// space.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<L>, TsetlinError> {
        let state = self.fitted_state("predict")?;
        check_feature_count(state.n_features, x.ncols())?;

        let indices = self.adapter.infer(x, &state.model)?;
        state.encoder.inverse_transform(&indices)
    }

    /// Per-class scores, one row per input row; column `k` corresponds to
    /// `classes()[k]`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>, TsetlinError> {
        let state = self.fitted_state("predict_proba")?;
        check_feature_count(state.n_features, x.ncols())?;

        let rows = self.adapter.infer_probabilities(x, &state.model)?;
        let num_classes = state.encoder.num_classes();
        if rows.len() != x.nrows() || rows.iter().any(|row| row.len() != num_classes) {
            return Err(crate::engine::EngineError(format!(
                "engine returned a malformed probability matrix, expected {} x {}",
                x.nrows(),
                num_classes
            ))
            .into());
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((x.nrows(), num_classes), flat)
            .expect("probability matrix shape checked above"))
    }

    fn fitted_state(&self, operation: &'static str) -> Result<&FittedState<L>, TsetlinError> {
        self.fitted
            .as_ref()
            .ok_or(TsetlinError::NotFitted { operation })
    }
}

fn check_n_iter(n_iter: usize) -> Result<(), TsetlinError> {
    if n_iter == 0 {
        return Err(TsetlinError::InvalidIterations);
    }
    Ok(())
}

fn check_xy<L>(x: &Array2<f64>, y: &[L]) -> Result<(), TsetlinError> {
    if x.nrows() != y.len() {
        return Err(TsetlinError::SampleCountMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    Ok(())
}

fn check_feature_count(expected: usize, got: usize) -> Result<(), TsetlinError> {
    if expected != got {
        return Err(TsetlinError::FeatureCountMismatch { expected, got });
    }
    Ok(())
}
