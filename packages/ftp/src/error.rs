use mediafs_core::Error as AccessorError;

/// FTP reply code for "file unavailable".
pub const FILE_UNAVAILABLE: u16 = 550;

#[derive(thiserror::Error, Debug)]
pub enum FtpError {
    #[error("FTP I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected reply to {command}: {code} {text}")]
    UnexpectedReply {
        command: String,
        code: u16,
        text: String,
    },

    #[error("malformed reply: {line}")]
    MalformedReply { line: String },

    #[error("cannot send {command}: a transfer reply is still pending")]
    ReplyPending { command: String },

    #[error("connection closed by server")]
    Closed,
}

impl FtpError {
    pub fn reply_code(&self) -> Option<u16> {
        match self {
            FtpError::UnexpectedReply { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Convert, reporting a "file unavailable" reply as a missing `name`.
    pub fn for_name(self, name: &str) -> AccessorError {
        if self.reply_code() == Some(FILE_UNAVAILABLE) {
            AccessorError::NotFound {
                name: name.to_string(),
            }
        } else {
            self.into()
        }
    }
}

impl From<FtpError> for AccessorError {
    fn from(error: FtpError) -> Self {
        AccessorError::Protocol {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_file_becomes_not_found() {
        let err = FtpError::UnexpectedReply {
            command: "RETR".to_string(),
            code: 550,
            text: "No such file".to_string(),
        };
        assert!(err.for_name("Packages").is_not_found());
    }

    #[test]
    fn other_failures_become_protocol_errors() {
        let err = FtpError::UnexpectedReply {
            command: "PASS".to_string(),
            code: 530,
            text: "Login incorrect".to_string(),
        };
        match err.for_name("ignored") {
            AccessorError::Protocol { message } => assert!(message.contains("530")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
