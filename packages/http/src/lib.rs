//! # mediafs-http
//!
//! A read-only [`Accessor`](mediafs_core::Accessor) for installation
//! sources served over HTTP or HTTPS.
//!
//! ```no_run
//! use std::io::Read;
//! use mediafs_core::Accessor;
//! use mediafs_http::HttpAccessor;
//!
//! let mut http = HttpAccessor::new("http://mirror.example.com/xs/", true)?;
//! let mut treeinfo = String::new();
//! http.open_address(".treeinfo")?.read_to_string(&mut treeinfo)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod accessor;
pub mod error;
pub mod session;

pub use accessor::HttpAccessor;
pub use error::Error;
pub use session::{Credentials, HttpSession};
