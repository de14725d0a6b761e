use connectors::error::ConnectorError;
use engine::error::PaginateError;
use model::pagination::error::PaginationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the settings file: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No database URL: pass --conn-str or set {0}")]
    MissingDatabaseUrl(&'static str),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Pagination failed: {0}")]
    Paginate(#[from] PaginateError),

    #[error("Connection failed: {0}")]
    Connector(#[from] ConnectorError),
}
