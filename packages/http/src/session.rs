//! The HTTP client and credentials owned by one accessor.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use url::Url;

use crate::error::Error;

/// Basic-auth credentials, already percent-decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Issues requests on behalf of a single accessor, attaching its
/// credentials (if any) to every request.
pub struct HttpSession {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpSession {
    /// Create a session. `None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// `GET url`, failing on any non-success status.
    pub fn get(&self, url: &Url) -> Result<Response, Error> {
        let mut request = self.client.get(url.clone());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}
