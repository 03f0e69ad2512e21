//! mediafs-core: the accessor contract and its local backends.
//!
//! An installer reads packages and answer files from wherever its install
//! source lives. Every source is reached through an [`Accessor`]:
//!
//! - [`FilesystemAccessor`] / [`FileAccessor`]: a local directory
//! - [`DeviceAccessor`]: a block device or ISO image, mounted on demand
//! - [`NfsAccessor`]: an NFS export, mounted on demand
//!
//! Network backends live in `mediafs-ftp` and `mediafs-http`.
//!
//! # Example
//!
//! ```no_run
//! use mediafs_core::{Accessor, DeviceAccessor};
//!
//! let mut media = DeviceAccessor::new("dev:///dev/sr0", true, None);
//! media.start()?;
//! let found = media.access("repodata/repomd.xml");
//! media.finish()?;
//! # Ok::<(), mediafs_core::Error>(())
//! ```

mod accessor;
pub mod address;
mod counted;
mod device;
mod error;
mod filesystem;
pub mod mount;
mod mounting;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use accessor::{copy_stream, ensure_writable, Accessor, ReadStream, COPY_CHUNK_SIZE};
pub use address::AddressComponents;
pub use counted::Counted;
pub use device::{DeviceAccessor, NfsAccessor, DEFAULT_DEVICE_FSTYPES};
pub use error::Error;
pub use filesystem::{FileAccessor, FilesystemAccessor};
pub use mount::{MountCandidate, MountError, Mounter, SystemMounter};
pub use mounting::MountingAccessor;
