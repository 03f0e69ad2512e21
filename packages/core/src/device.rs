//! Mounting accessors for block devices, ISO images and NFS exports.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::accessor::{Accessor, ReadStream};
use crate::address::strip_scheme;
use crate::mount::{MountCandidate, Mounter};
use crate::mounting::MountingAccessor;
use crate::Error;

/// Filesystem types probed on a device when none are given.
pub const DEFAULT_DEVICE_FSTYPES: [&str; 3] = ["iso9660", "vfat", "ext3"];

macro_rules! delegate_mounting {
    ($ty:ty) => {
        impl $ty {
            pub fn with_mounter(mut self, mounter: Arc<dyn Mounter>) -> Self {
                self.inner = self.inner.with_mounter(mounter);
                self
            }

            pub fn with_mount_root(mut self, mount_root: impl Into<PathBuf>) -> Self {
                self.inner = self.inner.with_mount_root(mount_root);
                self
            }

            pub fn location(&self) -> Option<&Path> {
                self.inner.location()
            }

            pub fn start_count(&self) -> usize {
                self.inner.start_count()
            }

            pub fn candidates(&self) -> &[MountCandidate] {
                self.inner.candidates()
            }
        }

        impl Accessor for $ty {
            fn read_only(&self) -> bool {
                self.inner.read_only()
            }

            fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
                self.inner.open_address(name)
            }

            fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
                self.inner.write_file(source, out_name)
            }

            fn start(&mut self) -> Result<(), Error> {
                self.inner.start()
            }

            fn finish(&mut self) -> Result<(), Error> {
                self.inner.finish()
            }
        }
    };
}

/// A device node or image file, e.g. `dev:///dev/sr0`.
pub struct DeviceAccessor {
    device: String,
    inner: MountingAccessor,
}

impl DeviceAccessor {
    /// `fstypes` overrides [`DEFAULT_DEVICE_FSTYPES`].
    pub fn new(device: &str, read_only: bool, fstypes: Option<Vec<String>>) -> Self {
        let device = strip_scheme(device, "dev").to_string();
        let fstypes = fstypes.unwrap_or_else(|| {
            DEFAULT_DEVICE_FSTYPES
                .iter()
                .map(|fs| fs.to_string())
                .collect()
        });
        let options: &[&str] = if read_only { &["ro"] } else { &[] };
        let candidates = fstypes
            .into_iter()
            .map(|fstype| MountCandidate::new(fstype, options.iter().copied()))
            .collect();

        Self {
            inner: MountingAccessor::new(device.clone(), candidates, read_only),
            device,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

delegate_mounting!(DeviceAccessor);

impl fmt::Display for DeviceAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<DeviceAccessor: {}>", self.device)
    }
}

/// An NFS export, e.g. `nfs://server:/export/xs`.
pub struct NfsAccessor {
    nfspath: String,
    inner: MountingAccessor,
}

impl NfsAccessor {
    pub fn new(nfspath: &str, read_only: bool) -> Self {
        let nfspath = strip_scheme(nfspath, "nfs").to_string();
        let mut options = vec!["tcp"];
        if read_only {
            options.push("ro");
        }

        Self {
            inner: MountingAccessor::new(
                nfspath.clone(),
                vec![MountCandidate::new("nfs", options)],
                read_only,
            ),
            nfspath,
        }
    }

    pub fn nfspath(&self) -> &str {
        &self.nfspath
    }
}

delegate_mounting!(NfsAccessor);

impl fmt::Display for NfsAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<NFSAccessor: {}>", self.nfspath)
    }
}
