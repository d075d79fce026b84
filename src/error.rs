use thiserror::Error;

pub type SignalflowResult<T> = Result<T, SignalflowError>;

#[derive(Debug, Error)]
pub enum SignalflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to configuration of the destination table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for environment variable '{var}': {msg}")]
    InvalidEnvVar { var: String, msg: String },
}

/// Errors related to parsing raw exports and shaping the signal table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Failed to parse Day/Hour into a datetime: {0}")]
    DatetimeParse(String),

    #[error("Data frame error: {0}")]
    DataFrame(String),

    #[error("Failed to parse enum: {0}")]
    ParseEnum(#[from] strum::ParseError),
}

/// Errors related to decoding and file I/O.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Failed to read CSV payload: {0}")]
    CsvRead(String),
}

/// Errors surfaced by the persistence sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to append to sink: {0}")]
    Append(String),
}

/// Errors related to internal runtime plumbing.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Blocking task failed: {0}")]
    BlockingTask(String),
}
