use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is wrong: bad query text, unknown metric,
    /// unparseable time or step, inverted window.
    #[error("{0}")]
    BadData(String),

    /// The document store failed: connection, query or cursor error.
    #[error("store error: {0}")]
    Store(String),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn bad_data<S: Into<String>>(message: S) -> Self {
        Error::BadData(message.into())
    }

    /// The Prometheus API `errorType` this error is reported with.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::BadData(_) => "bad_data",
            Error::Store(_) | Error::Timeout(_) | Error::Config(_) | Error::Io(_) => "internal",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::BadData(_))
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::BadData(message.into())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::BadData(message)
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
