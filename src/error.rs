use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while introspecting, flattening, or rebuilding values.
///
/// Every variant is terminal for the call that raised it; no partial output
/// is returned alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// An entry point received a shape it cannot process.
    #[error("unsupported shape: expected {expected}, got {found}")]
    UnsupportedShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A sequence had no elements to infer field names from.
    #[error("cannot generate field names from an empty sequence at '{path}'")]
    EmptySequence { path: String },

    /// A table row does not have as many cells as the header row.
    #[error("row {row} has {found} cells, header row has {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Table reconstruction was given no rows at all.
    #[error("table is empty")]
    InputEmpty,

    /// Two fields resolved to the same output key.
    #[error("duplicate key '{path}'")]
    DuplicateKey { path: String },

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
