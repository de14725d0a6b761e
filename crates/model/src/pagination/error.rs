use crate::core::type_tag::TypeTag;
use thiserror::Error;

/// Errors raised while building a page request or translating cursors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaginationError {
    /// The token could not be decoded: bad base64, a segment without a
    /// delimiter, or a value that does not parse under its column's tag.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// A key column declares a type the cursor codec cannot represent.
    #[error("Unsupported type `{tag}` for pagination key column `{column}`")]
    UnsupportedType { column: String, tag: TypeTag },

    #[error("At least one pagination key column is required")]
    MissingKeyColumns,

    #[error("Invalid pagination key column name: {0:?}")]
    InvalidKeyColumn(String),

    #[error("Page limit must be positive, got {0}")]
    InvalidLimit(usize),

    /// A row value cannot be represented under the column's declared tag.
    #[error("Value {value} of column `{column}` cannot be encoded as `{tag}`")]
    ValueMismatch {
        column: String,
        tag: TypeTag,
        value: String,
    },
}
