//! CSV dataset loading.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: the first row is a header if any
//!   non-empty cell is not a number)
//! - Double-quoted fields with embedded commas and `""` escapes
//!
//! Label modes:
//! - `ClassIndex` — the last column is a 0-based class index, one-hot encoded
//!   into a target of length `n_classes`.
//! - `Columns`    — the last `n_label_cols` columns are the target as-is.

use std::path::Path;

use crate::data::sample::Sample;
use crate::error::{NnError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    ClassIndex { n_classes: usize },
    Columns { n_label_cols: usize },
}

pub fn load_csv(path: impl AsRef<Path>, label_mode: LabelMode) -> Result<Vec<Sample>> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_csv(&bytes, label_mode)
}

/// Parses CSV bytes into samples. Every row must have the feature width of the
/// first data row.
pub fn parse_csv(data: &[u8], label_mode: LabelMode) -> Result<Vec<Sample>> {
    let text = std::str::from_utf8(data)
        .map_err(|_| invalid("CSV file is not valid UTF-8".into()))?;

    let mut lines = text.lines().peekable();

    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut samples: Vec<Sample> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        let row_num = row_idx + 1;

        let sample = match label_mode {
            LabelMode::ClassIndex { n_classes } => {
                let Some((label_cell, feature_cells)) = cells.split_last().filter(|(_, f)| !f.is_empty()) else {
                    return Err(invalid(format!(
                        "Row {row_num}: expected at least 2 columns (features + class index), got {}",
                        cells.len()
                    )));
                };

                let class_idx: usize = label_cell.trim().parse().map_err(|_| {
                    invalid(format!("Row {row_num}: class index '{label_cell}' is not a non-negative integer"))
                })?;
                if class_idx >= n_classes {
                    return Err(invalid(format!(
                        "Row {row_num}: class index {class_idx} >= n_classes {n_classes}"
                    )));
                }
                let mut one_hot = vec![0.0f64; n_classes];
                one_hot[class_idx] = 1.0;

                Sample::new(parse_floats(feature_cells, row_num)?, one_hot)
            }
            LabelMode::Columns { n_label_cols } => {
                if n_label_cols == 0 || cells.len() < n_label_cols + 1 {
                    return Err(invalid(format!(
                        "Row {row_num}: expected at least {} columns, got {}",
                        n_label_cols + 1,
                        cells.len()
                    )));
                }
                let split = cells.len() - n_label_cols;
                Sample::new(
                    parse_floats(&cells[..split], row_num)?,
                    parse_floats(&cells[split..], row_num)?,
                )
            }
        };
        samples.push(sample);
    }

    let Some(first) = samples.first() else {
        return Err(invalid("CSV contains no data rows after parsing".into()));
    };

    let n_feats = first.input.len();
    if let Some((i, row)) = samples.iter().enumerate().find(|(_, s)| s.input.len() != n_feats) {
        return Err(invalid(format!(
            "Row {}: feature count {} does not match first row's {}",
            i + 1,
            row.input.len(),
            n_feats
        )));
    }

    Ok(samples)
}

fn invalid(reason: String) -> NnError {
    NnError::InvalidDataset(reason)
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells
        .iter()
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("Row {row_num}: '{c}' is not a valid number")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_index_with_header() {
        let csv = b"x1,x2,label\n0.1,0.2,1\n0.3,0.4,0\n";
        let samples = parse_csv(csv, LabelMode::ClassIndex { n_classes: 3 }).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].input, vec![0.1, 0.2]);
        assert_eq!(samples[0].target, vec![0.0, 1.0, 0.0]);
        assert_eq!(samples[1].target, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn label_columns_without_header() {
        let csv = b"0,0,0\n0,1,1\n\n1,0,1\n1,1,0\n";
        let samples = parse_csv(csv, LabelMode::Columns { n_label_cols: 1 }).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3], Sample::new(vec![1.0, 1.0], vec![0.0]));
    }

    #[test]
    fn quoted_fields() {
        assert_eq!(parse_csv_row(r#""a,b",c,"say ""hi""""#), vec!["a,b", "c", r#"say "hi""#]);
    }

    #[test]
    fn rejects_out_of_range_class() {
        let err = parse_csv(b"0.5,4\n", LabelMode::ClassIndex { n_classes: 3 }).unwrap_err();
        assert!(matches!(err, NnError::InvalidDataset(_)));
    }

    #[test]
    fn rejects_ragged_features() {
        let err = parse_csv(b"1,2,0\n1,2,3,0\n", LabelMode::Columns { n_label_cols: 1 }).unwrap_err();
        assert!(err.to_string().contains("Row 2"), "{err}");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_csv(b"a,b\n", LabelMode::Columns { n_label_cols: 1 }).is_err());
    }
}
