//! mediafs: uniform read/write access to installation sources.
//!
//! An installer finds its packages on a CD, a USB stick, an NFS export, an
//! FTP or HTTP mirror, or a local directory. This crate turns the address of
//! any of those into an [`Accessor`]:
//!
//! ```no_run
//! use std::io::Read;
//! use mediafs::{create_accessor, Accessor, AccessorOptions};
//!
//! let mut source = create_accessor("nfs://server:/export/xs/", &AccessorOptions::read_only())?;
//! source.start()?;
//! let mut treeinfo = String::new();
//! source.open_address(".treeinfo")?.read_to_string(&mut treeinfo)?;
//! source.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//!
//! - `mediafs-core`: the [`Accessor`] trait, errors, local and mounting backends
//! - `mediafs-ftp`: the FTP backend
//! - `mediafs-http`: the read-only HTTP backend

pub mod config;
mod factory;
mod scheme;

pub use config::AccessorConfig;
pub use factory::{create_accessor, AccessorOptions, AnyAccessor};
pub use scheme::Scheme;

pub use mediafs_core::{
    copy_stream, Accessor, DeviceAccessor, Error, FileAccessor, FilesystemAccessor, Mounter,
    NfsAccessor, ReadStream, SystemMounter,
};
pub use mediafs_ftp::FtpAccessor;
pub use mediafs_http::HttpAccessor;
