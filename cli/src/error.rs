use std::fmt;

use crm::{ConfigError, FormError, ViewError};
use store::StoreError;

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Store(StoreError),
    View(ViewError),
    Form(FormError),
    InvalidArgument(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "{}", err),
            Error::Store(err) => write!(f, "{}", err),
            Error::View(err) => write!(f, "{}", err),
            Error::Form(err) => write!(f, "{}", err),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::View(err) => Some(err),
            Error::Form(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<ViewError> for Error {
    fn from(err: ViewError) -> Self {
        Error::View(err)
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Error::Form(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
