use std::fmt;

use coursedir_client::ErrorKind;

/// Broad reason an operation didn't happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Our token was missing, expired, or refused
    Auth,
    /// The backend failed or rejected the request
    Remote,
    /// Something had to be true before we could even try
    Precondition,
    /// An input file couldn't be understood
    Parse,
    /// Local files couldn't be read or written
    Io,
}

/// Why an operation failed. `message` is for the log, not for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Precondition, message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl From<(ErrorKind, String)> for Failure {
    fn from((kind, message): (ErrorKind, String)) -> Self {
        match kind {
            ErrorKind::Unauthorized => Self::new(FailureKind::Auth, message),
            _ => Self::new(FailureKind::Remote, message),
        }
    }
}

impl From<coursedir_client::Error> for Failure {
    fn from(e: coursedir_client::Error) -> Self {
        (e.kind(), e.to_string()).into()
    }
}

impl From<sheet::Error> for Failure {
    fn from(e: sheet::Error) -> Self {
        match e {
            sheet::Error::IOError(_) => Self::new(FailureKind::Io, e.to_string()),
            sheet::Error::CsvError(ref c) if c.is_io_error() => {
                Self::new(FailureKind::Io, e.to_string())
            }
            _ => Self::new(FailureKind::Parse, e.to_string()),
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Self::new(FailureKind::Io, e.to_string())
    }
}
