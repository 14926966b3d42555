use thiserror::Error;

/// Errors raised while loading a catalog or resolving its columns.
///
/// Cells that fail to parse as numbers are not errors; they are dropped from
/// numeric results by the mask engine.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source held nothing usable (no header line, no data file in an archive).
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// A column name is not present in the header.
    #[error("unknown column `{name}`")]
    UnknownColumn { name: String },

    /// A data line does not have as many fields as the header.
    #[error("line {line} has {actual} fields, header has {expected}")]
    RowShapeMismatch {
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }
}
