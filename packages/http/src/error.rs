use mediafs_core::Error as AccessorError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned {status}")]
    Status { url: String, status: http::StatusCode },
}

impl Error {
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
        }
    }

    /// Convert, reporting a 404 as a missing `name`.
    pub fn for_name(self, name: &str) -> AccessorError {
        if self.status() == Some(http::StatusCode::NOT_FOUND) {
            AccessorError::NotFound {
                name: name.to_string(),
            }
        } else {
            self.into()
        }
    }
}

impl From<Error> for AccessorError {
    fn from(error: Error) -> Self {
        AccessorError::Protocol {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_becomes_not_found() {
        let err = Error::Status {
            url: "http://mirror/xs/Packages".to_string(),
            status: http::StatusCode::NOT_FOUND,
        };
        assert!(err.for_name("Packages").is_not_found());
    }

    #[test]
    fn server_errors_become_protocol_errors() {
        let err = Error::Status {
            url: "http://mirror/xs/Packages".to_string(),
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        match err.for_name("Packages") {
            AccessorError::Protocol { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("http://mirror/xs/Packages"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
