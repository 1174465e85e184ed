use thiserror::Error;

/// All errors that can occur in querypad-core.
#[derive(Debug, Error)]
pub enum QuerypadError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Payload not found: {0}")]
    PayloadNotFound(String),

    #[error("Malformed payload in #{id}: {reason}")]
    MalformedPayload { id: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Process exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArgs = 3,
    ConfigError = 4,
    NetworkError = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

pub type Result<T> = std::result::Result<T, QuerypadError>;
