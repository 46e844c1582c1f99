//! Crate error taxonomy.
//!
//! Every fallible operation in the front-end reports one of the variants
//! below to its immediate caller. There are no retries anywhere: a
//! hyperparameter or shape problem is a caller error, and an engine failure
//! is propagated unchanged rather than interpreted.

use crate::engine::EngineError;

/// Errors raised by the classifier front-end.
#[derive(Debug, thiserror::Error)]
pub enum TsetlinError {
    /// A hyperparameter key outside the recognized set was supplied.
    #[error("unrecognized hyperparameter '{key}'")]
    UnknownParameter {
        /// The offending key.
        key: String,
    },

    /// A recognized hyperparameter failed coercion or its domain check.
    #[error("invalid value for hyperparameter '{key}': {reason}")]
    InvalidParameter {
        /// The offending key.
        key: String,
        /// What the domain check expected.
        reason: String,
    },

    /// Returned when an iteration count of zero is requested.
    #[error("number of iterations must be a positive integer")]
    InvalidIterations,

    /// Returned when fit data contains fewer than two distinct classes.
    #[error("need samples of at least 2 classes, data contains only: {class}")]
    InsufficientClasses {
        /// The single class present, or a description of the empty set.
        class: String,
    },

    /// Returned when a label was not seen during the original fit.
    #[error("label {label} was not present in the fit data")]
    UnknownLabel {
        /// Debug rendering of the unseen label.
        label: String,
    },

    /// Returned when a class index falls outside the fitted mapping.
    #[error("class index {index} out of range for {num_classes} classes")]
    ClassIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of classes in the mapping.
        num_classes: usize,
    },

    /// Returned when an input matrix has a different column count than the
    /// one recorded at fit time.
    #[error("input has {got} feature columns, expected {expected}")]
    FeatureCountMismatch {
        /// The fit-time column count.
        expected: usize,
        /// The column count of the offending input.
        got: usize,
    },

    /// Returned when a feature matrix and label sequence disagree on sample
    /// count.
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    SampleCountMismatch {
        /// Rows in the feature matrix.
        rows: usize,
        /// Length of the label sequence.
        labels: usize,
    },

    /// Returned when predict or transform is called before a successful fit.
    #[error("this instance is not fitted yet; call fit before {operation}")]
    NotFitted {
        /// The operation that required a fitted instance.
        operation: &'static str,
    },

    /// Any failure signaled by the engine, propagated unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
