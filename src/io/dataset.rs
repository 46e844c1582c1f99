//! Whitespace-delimited binarized dataset files.
//!
//! The interchange format used by data-preparation pipelines around the
//! engine: one row per sample, values separated by single spaces.
//! Classification datasets carry the integer label in column 0 followed by
//! the 0/1 feature columns. Regression-style exports split features and
//! targets into separate files: features as 0/1 integers, targets as reals
//! printed with three decimals.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::math::Array2;

/// Write a classification dataset: label first, then the feature bits.
pub fn write_classification_file<P: AsRef<Path>>(
    path: P,
    x: &Array2<u8>,
    y: &[i64],
) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(anyhow!(
            "feature matrix has {} rows but {} labels were given",
            x.nrows(),
            y.len()
        ));
    }

    let file = File::create(&path)
        .with_context(|| format!("Failed to create dataset file: {}", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);

    for (row, &label) in x.rows().zip(y) {
        write!(writer, "{}", label)?;
        for &bit in row {
            write!(writer, " {}", bit)?;
        }
        writeln!(writer)?;
    }
    writer.flush().context("Failed to flush dataset file")?;
    Ok(())
}

/// Read a classification dataset written by [`write_classification_file`].
pub fn read_classification_file<P: AsRef<Path>>(path: P) -> Result<(Array2<u8>, Vec<i64>)> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open dataset file: {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    let mut rows = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let label = fields
            .next()
            .ok_or_else(|| anyhow!("Missing label at line {}", line_idx + 1))?
            .parse::<i64>()
            .with_context(|| format!("Invalid label at line {}", line_idx + 1))?;

        let bits = fields
            .map(|field| parse_bit(field, line_idx))
            .collect::<Result<Vec<u8>>>()?;

        labels.push(label);
        rows.push(bits);
    }

    let x = Array2::from_rows(rows).context("Rows have inconsistent feature counts")?;
    Ok((x, labels))
}

/// Write a features-only file of 0/1 integers.
pub fn write_feature_file<P: AsRef<Path>>(path: P, x: &Array2<u8>) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create feature file: {}", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);

    for row in x.rows() {
        let mut first = true;
        for &bit in row {
            if first {
                write!(writer, "{}", bit)?;
                first = false;
            } else {
                write!(writer, " {}", bit)?;
            }
        }
        writeln!(writer)?;
    }
    writer.flush().context("Failed to flush feature file")?;
    Ok(())
}

/// Read a features-only file written by [`write_feature_file`].
pub fn read_feature_file<P: AsRef<Path>>(path: P) -> Result<Array2<u8>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open feature file: {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let bits = line
            .split_whitespace()
            .map(|field| parse_bit(field, line_idx))
            .collect::<Result<Vec<u8>>>()?;
        rows.push(bits);
    }

    Array2::from_rows(rows).context("Rows have inconsistent feature counts")
}

/// Write a targets file, one real per line with three decimals.
pub fn write_target_file<P: AsRef<Path>>(path: P, y: &[f64]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create target file: {}", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);

    for value in y {
        writeln!(writer, "{:.3}", value)?;
    }
    writer.flush().context("Failed to flush target file")?;
    Ok(())
}

/// Read a targets file written by [`write_target_file`].
pub fn read_target_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open target file: {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);

    let mut targets = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let value = line
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid target at line {}", line_idx + 1))?;
        targets.push(value);
    }
    Ok(targets)
}

fn parse_bit(field: &str, line_idx: usize) -> Result<u8> {
    match field {
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(anyhow!(
            "Invalid feature bit '{}' at line {}",
            other,
            line_idx + 1
        )),
    }
}
