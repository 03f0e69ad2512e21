//! Error types shared by every accessor backend.
//!
//! Backend crates keep their own transport errors (FTP replies, HTTP
//! failures) and convert them into [`Error`] at the accessor boundary.

use std::io;

use crate::mount::MountError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No candidate filesystem type could be mounted.
    #[error("could not mount {device} as any of [{}]", attempts_summary(.attempts))]
    MountFailure {
        device: String,
        attempts: Vec<(String, MountError)>,
    },

    #[error("not found: {name}")]
    NotFound { name: String },

    /// Transport, login, or reply-level failure in a network backend.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    #[error("unsupported scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// The caller broke the accessor's usage contract, e.g. writing to a
    /// read-only accessor or reading before `start()`.
    #[error("precondition violated: {message}")]
    PreconditionViolation { message: String },

    #[error("invalid address {address}: {message}")]
    InvalidAddress { address: String, message: String },

    /// An accessor description that could not be read or written.
    #[error("invalid accessor config: {message}")]
    Config { message: String },

    #[error("mount error: {0}")]
    Mount(#[from] MountError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::PreconditionViolation {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol {
            message: message.into(),
        }
    }

    /// Map an error from opening `name` so a missing file becomes `NotFound`.
    pub fn from_open(name: &str, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            Error::NotFound {
                name: name.to_string(),
            }
        } else {
            Error::Io(error)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

fn attempts_summary(attempts: &[(String, MountError)]) -> String {
    attempts
        .iter()
        .map(|(fstype, error)| format!("{}: {}", fstype, error))
        .collect::<Vec<_>>()
        .join(", ")
}
