use connectors::error::DbError;
use model::pagination::error::PaginationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaginateError {
    /// The request or its cursor was rejected before any query ran.
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// The executor failed; passed through unchanged, never retried.
    #[error("Query failed: {0}")]
    Query(#[from] DbError),
}
