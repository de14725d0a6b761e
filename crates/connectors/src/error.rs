use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any Postgres driver error.
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// An error occurred while building or evaluating a SQL query.
    #[error("Query build error: {0}")]
    QueryBuildError(String),

    /// A bound value does not fit the parameter type the server expects.
    #[error("Cannot bind {value} as parameter of type {expected}")]
    ParamType { value: String, expected: String },

    /// A result row could not be read back into a value.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),
}
