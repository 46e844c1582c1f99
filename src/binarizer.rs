//! Threshold binarization of numeric feature matrices.
//!
//! Turns each continuous/ordinal column into up to `max_bits_per_feature`
//! binary indicator columns. Bit `(i, j)` of the output is 1 iff the input
//! value at the originating column is >= the j-th threshold fitted for that
//! column. The threshold table is fitted once and reused unchanged by every
//! subsequent transform, both inside training pipelines and standalone in
//! data preparation.

use crate::error::TsetlinError;
use crate::math::Array2;

/// How per-column thresholds are chosen when a column has more distinct
/// values than the bit budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarizationPolicy {
    /// Subsample the sorted distinct values at a uniform fractional stride.
    /// This is the production policy and the default.
    UniqueStride,
    /// Place thresholds at evenly spaced quantiles of the raw column
    /// distribution, deduplicated.
    Quantile,
}

/// Per-column threshold binarizer.
///
/// `fit` derives the threshold table from training data; `transform` applies
/// it to any matrix with the same column count. Transform is pure: it never
/// mutates the table and repeated calls on the same input are bit-identical.
#[derive(Debug, Clone)]
pub struct Binarizer {
    max_bits_per_feature: usize,
    policy: BinarizationPolicy,
    /// One strictly increasing threshold list per input column, present
    /// after fit.
    thresholds: Option<Vec<Vec<f64>>>,
}

impl Binarizer {
    /// A binarizer with the given bit budget and the stride policy.
    pub fn new(max_bits_per_feature: usize) -> Self {
        Self::with_policy(max_bits_per_feature, BinarizationPolicy::UniqueStride)
    }

    /// A binarizer with an explicit threshold-selection policy.
    pub fn with_policy(max_bits_per_feature: usize, policy: BinarizationPolicy) -> Self {
        Self {
            max_bits_per_feature,
            policy,
            thresholds: None,
        }
    }

    pub fn max_bits_per_feature(&self) -> usize {
        self.max_bits_per_feature
    }

    pub fn policy(&self) -> BinarizationPolicy {
        self.policy
    }

    /// Fitted thresholds, one list per input column.
    pub fn thresholds(&self) -> Option<&[Vec<f64>]> {
        self.thresholds.as_deref()
    }

    /// Total output bit width across all columns, once fitted.
    pub fn output_width(&self) -> Option<usize> {
        self.thresholds
            .as_ref()
            .map(|table| table.iter().map(Vec::len).sum())
    }

    /// Derive the threshold table from `x`, one column at a time.
    ///
    /// A column with zero or one distinct value contributes no output bits.
    /// Calling fit again discards the previous table.
    pub fn fit(&mut self, x: &Array2<f64>) {
        let mut table = Vec::with_capacity(x.ncols());
        for col in 0..x.ncols() {
            let column = x.column(col);
            let thresholds = match self.policy {
                BinarizationPolicy::UniqueStride => {
                    stride_thresholds(&column, self.max_bits_per_feature)
                }
                BinarizationPolicy::Quantile => {
                    quantile_thresholds(&column, self.max_bits_per_feature)
                }
            };
            table.push(thresholds);
        }

        let width: usize = table.iter().map(Vec::len).sum();
        log::debug!(
            "binarizer fit: {} input columns -> {} output bits (budget {} per column)",
            x.ncols(),
            width,
            self.max_bits_per_feature
        );

        self.thresholds = Some(table);
    }

    /// Apply the fitted table to `x`, producing the 0/1 output matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<u8>, TsetlinError> {
        let table = self.thresholds.as_ref().ok_or(TsetlinError::NotFitted {
            operation: "transform",
        })?;

        if x.ncols() != table.len() {
            return Err(TsetlinError::FeatureCountMismatch {
                expected: table.len(),
                got: x.ncols(),
            });
        }

        let width: usize = table.iter().map(Vec::len).sum();
        let mut out = Array2::from_elem(x.nrows(), width, 0u8);

        for row in 0..x.nrows() {
            let mut pos = 0;
            for (col, thresholds) in table.iter().enumerate() {
                let value = x[(row, col)];
                for &threshold in thresholds {
                    if value >= threshold {
                        out[(row, pos)] = 1;
                    }
                    pos += 1;
                }
            }
        }

        Ok(out)
    }

    /// Fit on `x` and transform it in one call.
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<u8>, TsetlinError> {
        self.fit(x);
        self.transform(x)
    }
}

/// Sorted distinct values of a column with the minimum dropped.
///
/// The minimum never discriminates: every value compares >= to it.
fn distinct_above_min(column: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = column.to_vec();
    values.sort_by(f64::total_cmp);
    values.dedup();
    if values.is_empty() {
        values
    } else {
        values.split_off(1)
    }
}

/// Production policy: walk the distinct values at stride `len / budget`,
/// truncating the fractional position to an index each step.
fn stride_thresholds(column: &[f64], max_bits: usize) -> Vec<f64> {
    let uv = distinct_above_min(column);
    if uv.len() <= max_bits {
        return uv;
    }

    let step = uv.len() as f64 / max_bits as f64;
    let mut thresholds = Vec::with_capacity(max_bits);
    let mut pos = 0.0f64;
    while (pos as usize) < uv.len() && thresholds.len() < max_bits {
        thresholds.push(uv[pos as usize]);
        pos += step;
    }
    thresholds
}

/// Alternative policy: thresholds at quantiles k/(budget+1) of the raw
/// column values, deduplicated, with the column minimum excluded.
fn quantile_thresholds(column: &[f64], max_bits: usize) -> Vec<f64> {
    let uv = distinct_above_min(column);
    if uv.len() <= max_bits {
        return uv;
    }
    if max_bits == 0 {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = column.to_vec();
    sorted.sort_by(f64::total_cmp);
    let min = sorted[0];

    let mut thresholds: Vec<f64> = Vec::with_capacity(max_bits);
    for k in 1..=max_bits {
        let q = k as f64 / (max_bits + 1) as f64;
        let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
        let value = sorted[idx];
        if value > min && thresholds.last() != Some(&value) {
            thresholds.push(value);
        }
    }
    thresholds
}
