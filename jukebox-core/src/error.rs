use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    MalformedRecord { row: Option<i64>, reason: String },
    UnknownView(String),
    InvalidTheme(String),
    InvalidPeriod(String),
    InvalidSubmission(&'static str),
    MissingElement(&'static str),
    LoadFailed(String),
    ConfigError(String),
    JsonError(Box<dyn error::Error + Send + Sync>),
    IoError(io::Error),
}

impl Error {
    pub fn malformed(row: Option<i64>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord {
                row: Some(row),
                reason,
            } => write!(f, "Malformed record at row {row}: {reason}"),
            Self::MalformedRecord { row: None, reason } => {
                write!(f, "Malformed record: {reason}")
            }
            Self::UnknownView(name) => write!(f, "Unknown view: {name:?}"),
            Self::InvalidTheme(name) => write!(f, "Invalid theme: {name:?}"),
            Self::InvalidPeriod(input) => write!(f, "Invalid period: {input:?}"),
            Self::InvalidSubmission(field) => write!(f, "Missing required field: {field}"),
            Self::MissingElement(id) => write!(f, "Element not found: #{id}"),
            Self::LoadFailed(err) => write!(f, "Failed to load requests: {err}"),
            Self::ConfigError(err) => write!(f, "Configuration error: {err}"),
            Self::JsonError(err) => fmt::Display::fmt(err, f),
            Self::IoError(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}
