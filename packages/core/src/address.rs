//! Splitting accessor addresses into their components.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::{Host, Url};

use crate::Error;

/// The parts of a `scheme://[user[:password]@]host[:port]/path` address.
///
/// Username, password and path are kept percent-encoded exactly as they
/// appeared in the address; use the `decoded_*` accessors at point of use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressComponents {
    scheme: String,
    username: Option<String>,
    password: Option<String>,
    hostname: Option<String>,
    port: Option<u16>,
    path: String,
}

impl AddressComponents {
    pub fn parse(address: &str) -> Result<Self, Error> {
        let url = Url::parse(address).map_err(|e| Error::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Self {
            scheme: url.scheme().to_string(),
            username,
            password: url.password().map(str::to_string),
            hostname: url.host().map(|host| match host {
                // Unbracketed, so it can be handed straight to a socket.
                Host::Ipv6(addr) => addr.to_string(),
                other => other.to_string().to_ascii_lowercase(),
            }),
            port: url.port(),
            path: url.path().to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn decoded_username(&self) -> Result<Option<String>, Error> {
        self.username.as_deref().map(percent_decode).transpose()
    }

    pub fn decoded_password(&self) -> Result<Option<String>, Error> {
        self.password.as_deref().map(percent_decode).transpose()
    }

    /// The path without its leading `/`, percent-decoded.
    pub fn decoded_directory(&self) -> Result<String, Error> {
        percent_decode(self.path.strip_prefix('/').unwrap_or(&self.path))
    }
}

/// Percent-decode `encoded` as UTF-8.
pub fn percent_decode(encoded: &str) -> Result<String, Error> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| Error::InvalidAddress {
            address: encoded.to_string(),
            message: e.to_string(),
        })
}

/// The scheme of `address`, lowercased, if it has the `scheme://` form.
pub fn scheme_of(address: &str) -> Option<String> {
    let (scheme, _) = address.split_once("://")?;
    let valid = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then(|| scheme.to_ascii_lowercase())
}

/// Remove a `scheme://` prefix if present.
pub fn strip_scheme<'a>(address: &'a str, scheme: &str) -> &'a str {
    address
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix("://"))
        .unwrap_or(address)
}
