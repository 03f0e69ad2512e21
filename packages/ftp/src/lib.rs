//! # mediafs-ftp
//!
//! Installation sources on FTP servers.
//!
//! ```no_run
//! use std::io::Read;
//! use mediafs_core::Accessor;
//! use mediafs_ftp::FtpAccessor;
//!
//! let mut ftp = FtpAccessor::new("ftp://mirror.example.com/pub/xs/", true)?;
//! ftp.start()?;
//! let mut treeinfo = String::new();
//! ftp.open_address(".treeinfo")?.read_to_string(&mut treeinfo)?;
//! // The pending transfer reply is drained before this listing.
//! let has_repo = ftp.access("repodata/repomd.xml");
//! ftp.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod accessor;
pub mod client;
pub mod error;

pub use accessor::FtpAccessor;
pub use client::{ControlConnection, Reply, ReplyState};
pub use error::FtpError;
