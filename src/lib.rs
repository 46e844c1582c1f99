//! tsetlin-estimators: estimator front-end for a Tsetlin Machine engine.
//!
//! This crate provides the classifier-facing half of a Tsetlin Machine
//! system: threshold binarization of numeric features under a per-feature
//! bit budget, hyperparameter validation, label encoding, and the
//! fit / partial_fit / predict / predict_proba lifecycle. The learning
//! engine itself is external and reached only through the
//! [`engine::TsetlinEngine`] trait; its model state crosses the boundary as
//! an opaque handle that this crate stores but never inspects.
pub mod binarizer;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod io;
pub mod labels;
pub mod math;
pub mod params;
