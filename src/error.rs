use std::path::PathBuf;

/// Errors produced by the matrix algebra, the network and its persistence.
#[derive(thiserror::Error, Debug)]
pub enum NnError {
    /// Operand shapes are incompatible for the named operation.
    #[error("dimension mismatch in {op}: left is {}x{}, right is {}x{}", left.0, left.1, right.0, right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A row of nested data does not have the width of the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// No model record exists at the given location.
    #[error("no model record at {}", path.display())]
    PersistenceMissing { path: PathBuf },

    /// A model record exists but cannot be parsed or fails validation.
    #[error("corrupt model record at {}: {reason}", path.display())]
    PersistenceCorrupt { path: PathBuf, reason: String },

    #[error("invalid network config: {0}")]
    InvalidConfig(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;
