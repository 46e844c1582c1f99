//! Hyperparameter set and validation.
//!
//! The engine recognizes a fixed, closed set of hyperparameters. They are
//! held as typed fields on [`Hyperparameters`]; keyed construction and
//! mutation go through [`Hyperparameters::set`], which coerces raw values
//! and rejects unknown keys before any data is seen. [`Hyperparameters::validate`]
//! re-checks every domain and is pure and idempotent, so the classifier can
//! run it on every fit without observable effect on an already-valid set.

use serde::{Deserialize, Serialize};

use crate::error::TsetlinError;

/// Default iteration count for fit and partial_fit.
pub const DEFAULT_N_ITER: usize = 500;

/// Raw, uncoerced value for a single hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Absent value; only meaningful for `random_state`.
    Null,
}

impl ParamValue {
    /// Coerce to a real number. Integers widen; booleans do not.
    fn as_float(self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Coerce to an integer. Booleans map to 0/1; floats do not narrow.
    fn as_int(self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(v),
            ParamValue::Bool(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Coerce to a flag. Integers are truthy when non-zero.
    fn as_bool(self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(v),
            ParamValue::Int(v) => Some(v != 0),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// The engine's recognized hyperparameters, all canonically typed.
///
/// Serializes to the exact JSON object the engine expects for `train`:
/// numbers as numbers, booleans as booleans, an absent seed as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Positive/negative clauses per class; the model ends up with
    /// `2 * number_of_pos_neg_clauses_per_label * n_classes` clauses.
    pub number_of_pos_neg_clauses_per_label: u32,
    /// Integral states per Tsetlin automaton.
    pub number_of_states: u32,
    /// Specificity of clause feedback.
    pub s: f64,
    /// Decision threshold for clause vote clamping.
    pub threshold: u32,
    /// 0 or 1; whether true-positive feedback is boosted.
    pub boost_true_positive_feedback: u8,
    /// Execution units for the engine; -1 means all available.
    pub n_jobs: i32,
    /// Verbose engine output.
    pub verbose: bool,
    /// Seed for the engine's RNG; `None` leaves seeding to the engine.
    pub random_state: Option<i64>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            number_of_pos_neg_clauses_per_label: 5,
            number_of_states: 100,
            s: 2.0,
            threshold: 15,
            boost_true_positive_feedback: 0,
            n_jobs: -1,
            verbose: false,
            random_state: None,
        }
    }
}

/// The closed key set, in serialization order.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "number_of_pos_neg_clauses_per_label",
    "number_of_states",
    "s",
    "threshold",
    "boost_true_positive_feedback",
    "n_jobs",
    "verbose",
    "random_state",
];

impl Hyperparameters {
    /// Build a set from `(key, value)` pairs on top of the defaults.
    ///
    /// An unrecognized key or an out-of-domain value is an error here, at
    /// construction time, never a runtime surprise later.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TsetlinError>
    where
        I: IntoIterator<Item = (&'a str, ParamValue)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.set(key, value)?;
        }
        Ok(params)
    }

    /// Coerce and assign one hyperparameter by key.
    pub fn set(&mut self, key: &str, value: ParamValue) -> Result<(), TsetlinError> {
        match key {
            "s" => {
                let v = coerce(key, value.as_float(), "a real number")?;
                require(key, v > 0.0, "must be > 0")?;
                self.s = v;
            }
            "boost_true_positive_feedback" => {
                let v = coerce(key, value.as_int(), "an integer")?;
                require(key, v == 0 || v == 1, "must be 0 or 1")?;
                self.boost_true_positive_feedback = v as u8;
            }
            "n_jobs" => {
                let v = coerce(key, value.as_int(), "an integer")?;
                require(key, v == -1 || v > 0, "must be -1 or > 0")?;
                self.n_jobs = narrow(key, v)?;
            }
            "number_of_pos_neg_clauses_per_label" => {
                let v = coerce(key, value.as_int(), "an integer")?;
                require(key, v > 0, "must be > 0")?;
                self.number_of_pos_neg_clauses_per_label = narrow(key, v)?;
            }
            "number_of_states" => {
                let v = coerce(key, value.as_int(), "an integer")?;
                require(key, v > 0, "must be > 0")?;
                self.number_of_states = narrow(key, v)?;
            }
            "threshold" => {
                let v = coerce(key, value.as_int(), "an integer")?;
                require(key, v > 0, "must be > 0")?;
                self.threshold = narrow(key, v)?;
            }
            "random_state" => {
                self.random_state = match value {
                    ParamValue::Null => None,
                    other => Some(coerce(key, other.as_int(), "an integer or null")?),
                };
            }
            "verbose" => {
                self.verbose = coerce(key, value.as_bool(), "a boolean")?;
            }
            other => {
                return Err(TsetlinError::UnknownParameter {
                    key: other.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Read one hyperparameter back as a raw value.
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        match key {
            "s" => Some(ParamValue::Float(self.s)),
            "boost_true_positive_feedback" => {
                Some(ParamValue::Int(self.boost_true_positive_feedback as i64))
            }
            "n_jobs" => Some(ParamValue::Int(self.n_jobs as i64)),
            "number_of_pos_neg_clauses_per_label" => Some(ParamValue::Int(
                self.number_of_pos_neg_clauses_per_label as i64,
            )),
            "number_of_states" => Some(ParamValue::Int(self.number_of_states as i64)),
            "threshold" => Some(ParamValue::Int(self.threshold as i64)),
            "random_state" => Some(match self.random_state {
                Some(v) => ParamValue::Int(v),
                None => ParamValue::Null,
            }),
            "verbose" => Some(ParamValue::Bool(self.verbose)),
            _ => None,
        }
    }

    /// Range-check every field.
    ///
    /// Typed fields are publicly assignable, so the classifier re-runs this
    /// at the start of every fit. Validating an already-valid set changes
    /// nothing.
    pub fn validate(&self) -> Result<(), TsetlinError> {
        require("s", self.s > 0.0, "must be > 0")?;
        require(
            "boost_true_positive_feedback",
            self.boost_true_positive_feedback <= 1,
            "must be 0 or 1",
        )?;
        require(
            "n_jobs",
            self.n_jobs == -1 || self.n_jobs > 0,
            "must be -1 or > 0",
        )?;
        require(
            "number_of_pos_neg_clauses_per_label",
            self.number_of_pos_neg_clauses_per_label > 0,
            "must be > 0",
        )?;
        require("number_of_states", self.number_of_states > 0, "must be > 0")?;
        require("threshold", self.threshold > 0, "must be > 0")?;
        Ok(())
    }

    /// Canonical JSON object for the engine boundary.
    pub fn to_json(&self) -> String {
        // A closed struct of numbers, booleans and an optional integer
        // cannot fail to serialize.
        serde_json::to_string(self).expect("hyperparameters serialize to JSON")
    }
}

fn coerce<T>(key: &str, value: Option<T>, expected: &str) -> Result<T, TsetlinError> {
    value.ok_or_else(|| TsetlinError::InvalidParameter {
        key: key.to_string(),
        reason: format!("expected {expected}"),
    })
}

fn narrow<T: TryFrom<i64>>(key: &str, value: i64) -> Result<T, TsetlinError> {
    T::try_from(value).map_err(|_| TsetlinError::InvalidParameter {
        key: key.to_string(),
        reason: "out of range".to_string(),
    })
}

fn require(key: &str, ok: bool, reason: &str) -> Result<(), TsetlinError> {
    if ok {
        Ok(())
    } else {
        Err(TsetlinError::InvalidParameter {
            key: key.to_string(),
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let params = Hyperparameters::default();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn unknown_key_rejected_at_construction() {
        let result = Hyperparameters::from_pairs(vec![("learning_rate", ParamValue::Float(0.1))]);
        match result {
            Err(TsetlinError::UnknownParameter { key }) => assert_eq!(key, "learning_rate"),
            other => panic!("expected UnknownParameter, got {:?}", other),
        }
    }

    #[test]
    fn int_widens_to_float_for_s() {
        let params = Hyperparameters::from_pairs(vec![("s", ParamValue::Int(4))]).unwrap();
        assert!((params.s - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn s_must_be_positive() {
        let result = Hyperparameters::from_pairs(vec![("s", ParamValue::Float(0.0))]);
        assert!(matches!(
            result,
            Err(TsetlinError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn n_jobs_accepts_minus_one_only_below_one() {
        assert!(Hyperparameters::from_pairs(vec![("n_jobs", ParamValue::Int(-1))]).is_ok());
        assert!(Hyperparameters::from_pairs(vec![("n_jobs", ParamValue::Int(0))]).is_err());
        assert!(Hyperparameters::from_pairs(vec![("n_jobs", ParamValue::Int(-2))]).is_err());
    }

    #[test]
    fn random_state_accepts_null() {
        let params =
            Hyperparameters::from_pairs(vec![("random_state", ParamValue::Null)]).unwrap();
        assert_eq!(params.random_state, None);

        let params =
            Hyperparameters::from_pairs(vec![("random_state", ParamValue::Int(42))]).unwrap();
        assert_eq!(params.random_state, Some(42));
    }

    #[test]
    fn verbose_coerces_from_int() {
        let params = Hyperparameters::from_pairs(vec![("verbose", ParamValue::Int(1))]).unwrap();
        assert!(params.verbose);
    }

    #[test]
    fn validation_is_idempotent() {
        let params = Hyperparameters::from_pairs(vec![
            ("s", ParamValue::Float(3.9)),
            ("threshold", ParamValue::Int(15)),
        ])
        .unwrap();
        let before = params.clone();
        params.validate().unwrap();
        params.validate().unwrap();
        assert_eq!(params, before);
    }

    #[test]
    fn json_uses_canonical_types() {
        let params = Hyperparameters::default();
        let value: serde_json::Value = serde_json::from_str(&params.to_json()).unwrap();
        assert!(value["s"].is_f64());
        assert!(value["threshold"].is_u64());
        assert!(value["verbose"].is_boolean());
        assert!(value["random_state"].is_null());
        for key in RECOGNIZED_KEYS {
            assert!(
                value.get(*key).is_some(),
                "key '{}' missing from engine JSON",
                key
            );
        }
    }

    #[test]
    fn get_round_trips_set() {
        let mut params = Hyperparameters::default();
        params.set("threshold", ParamValue::Int(40)).unwrap();
        assert_eq!(params.get("threshold"), Some(ParamValue::Int(40)));
        assert_eq!(params.get("nonexistent"), None);
    }
}
