//! Ошибки загрузчика

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Колонки ID / Date / Label отсутствуют в таблице
    #[error("{columns:?} not found in {}", path.display())]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("{}: row {row}, column '{column}': could not convert '{value}' to float", path.display())]
    NonNumeric {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Empty table: {0}")]
    EmptyTable(String),

    #[error("No feature columns left in {}", path.display())]
    NoFeatures { path: PathBuf },

    #[error("Zero variance in feature column {column}")]
    ZeroVariance { column: usize },

    #[error("Scaler not fitted")]
    NotFitted,

    #[error("Shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl LoaderError {
    /// Переводит `NotFound` в `FileNotFound` с путём, остальное как есть
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}
