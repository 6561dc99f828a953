use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no data file found for table '{0}'")]
    MissingTable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
}

pub type Result<T> = std::result::Result<T, Error>;
