use std::fmt;
use std::str::FromStr;

use mediafs_core::address::scheme_of;
use mediafs_core::Error;

/// The address schemes [`create_accessor`](crate::create_accessor) knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Nfs,
    Http,
    Https,
    Ftp,
    File,
    Dev,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Nfs,
        Scheme::Http,
        Scheme::Https,
        Scheme::Ftp,
        Scheme::File,
        Scheme::Dev,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Nfs => "nfs",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ftp => "ftp",
            Scheme::File => "file",
            Scheme::Dev => "dev",
        }
    }

    /// The scheme of a `scheme://...` address.
    pub fn of_address(address: &str) -> Result<Self, Error> {
        match scheme_of(address) {
            Some(scheme) => scheme.parse(),
            None => Err(Error::UnsupportedScheme {
                scheme: address.to_string(),
            }),
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedScheme {
                scheme: s.to_string(),
            })
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
