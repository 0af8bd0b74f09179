//! Errors for the fallible surfaces around layout.
//!
//! Layout itself never fails. These cover turning text into style values and
//! loading table descriptions.

use std::path::PathBuf;

use thiserror::Error;

/// A length that is not `auto`, `<n>px`, `<n>`, `<n>%` or `<n>*`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid table length `{0}`")]
pub struct LengthParseError(pub String);

/// A color that is neither a hex color nor a known color keyword.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`")]
pub struct ColorParseError(pub String);

/// A `border` shorthand token that is not a width, style or color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized border component `{0}`")]
pub struct BorderParseError(pub String);

/// Failure to load a table description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// The file could not be read.
    #[error("failed to read table description {path}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The JSON was malformed or a value failed to parse.
    #[error("invalid table description: {0}")]
    Json(#[from] serde_json::Error),
    /// A table may have at most one row list: either `rows` or `sections`.
    #[error("table description has both `rows` and `sections`")]
    RowsAndSections,
}
