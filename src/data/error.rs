use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for dataset loading. Filtering and aggregation never fail.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data source '{}' not found", path.display())]
    DataSourceNotFound { path: PathBuf },
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },
    #[error("row {row}, column '{column}': {reason}")]
    DataFormat {
        row: usize,
        column: String,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
    #[error(transparent)]
    Excel(#[from] calamine::Error),
}

impl DataError {
    pub(crate) fn format(row: usize, column: &str, reason: impl Into<String>) -> Self {
        DataError::DataFormat {
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this is the "file is not there" failure that halts the dashboard.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::DataSourceNotFound { .. })
    }
}
