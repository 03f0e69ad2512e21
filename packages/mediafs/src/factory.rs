//! Building an accessor from an address.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mediafs_core::{
    Accessor, DeviceAccessor, Error, FileAccessor, Mounter, NfsAccessor, ReadStream,
};
use mediafs_ftp::FtpAccessor;
use mediafs_http::HttpAccessor;

use crate::scheme::Scheme;

/// How [`create_accessor`] should configure the accessor it builds.
#[derive(Clone, Default)]
pub struct AccessorOptions {
    pub read_only: bool,
    /// Filesystem types to try, in order, when mounting a device.
    pub fs_types: Option<Vec<String>>,
    /// Where temporary mount points are created. Defaults to the system
    /// temporary directory.
    pub mount_root: Option<PathBuf>,
    /// `None` means HTTP requests never time out.
    pub http_timeout: Option<Duration>,
    /// Replaces [`SystemMounter`](mediafs_core::SystemMounter).
    pub mounter: Option<Arc<dyn Mounter>>,
}

impl AccessorOptions {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    pub fn with_fs_types<I, S>(mut self, fs_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fs_types = Some(fs_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mount_root(mut self, mount_root: impl Into<PathBuf>) -> Self {
        self.mount_root = Some(mount_root.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn with_mounter(mut self, mounter: Arc<dyn Mounter>) -> Self {
        self.mounter = Some(mounter);
        self
    }
}

impl fmt::Debug for AccessorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorOptions")
            .field("read_only", &self.read_only)
            .field("fs_types", &self.fs_types)
            .field("mount_root", &self.mount_root)
            .field("http_timeout", &self.http_timeout)
            .field("custom_mounter", &self.mounter.is_some())
            .finish()
    }
}

/// Any accessor [`create_accessor`] can build.
pub enum AnyAccessor {
    Nfs(NfsAccessor),
    Http(HttpAccessor),
    Ftp(FtpAccessor),
    File(FileAccessor),
    Device(DeviceAccessor),
}

macro_rules! dispatch {
    ($self:expr, $accessor:ident => $body:expr) => {
        match $self {
            AnyAccessor::Nfs($accessor) => $body,
            AnyAccessor::Http($accessor) => $body,
            AnyAccessor::Ftp($accessor) => $body,
            AnyAccessor::File($accessor) => $body,
            AnyAccessor::Device($accessor) => $body,
        }
    };
}

macro_rules! configure_mounting {
    ($accessor:expr, $options:expr) => {{
        let mut accessor = $accessor;
        if let Some(mounter) = &$options.mounter {
            accessor = accessor.with_mounter(Arc::clone(mounter));
        }
        if let Some(mount_root) = &$options.mount_root {
            accessor = accessor.with_mount_root(mount_root.clone());
        }
        accessor
    }};
}

/// Build the accessor for `address`, chosen by its scheme.
///
/// | scheme          | accessor           |
/// |-----------------|--------------------|
/// | `nfs`           | [`NfsAccessor`]    |
/// | `http`, `https` | [`HttpAccessor`]   |
/// | `ftp`           | [`FtpAccessor`]    |
/// | `file`          | [`FileAccessor`]   |
/// | `dev`           | [`DeviceAccessor`] |
pub fn create_accessor(address: &str, options: &AccessorOptions) -> Result<AnyAccessor, Error> {
    let scheme = Scheme::of_address(address)?;
    log::debug!("Creating {} accessor for {}", scheme, address);

    let read_only = options.read_only;
    let accessor = match scheme {
        Scheme::Nfs => AnyAccessor::Nfs(configure_mounting!(
            NfsAccessor::new(address, read_only),
            options
        )),
        Scheme::Dev => AnyAccessor::Device(configure_mounting!(
            DeviceAccessor::new(address, read_only, options.fs_types.clone()),
            options
        )),
        Scheme::Http | Scheme::Https => AnyAccessor::Http(HttpAccessor::with_timeout(
            address,
            read_only,
            options.http_timeout,
        )?),
        Scheme::Ftp => AnyAccessor::Ftp(FtpAccessor::new(address, read_only)?),
        Scheme::File => AnyAccessor::File(FileAccessor::new(address, read_only)?),
    };
    Ok(accessor)
}

impl Accessor for AnyAccessor {
    fn read_only(&self) -> bool {
        dispatch!(self, accessor => accessor.read_only())
    }

    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
        dispatch!(self, accessor => accessor.open_address(name))
    }

    fn access(&mut self, name: &str) -> bool {
        dispatch!(self, accessor => accessor.access(name))
    }

    fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        dispatch!(self, accessor => accessor.write_file(source, out_name))
    }

    fn start(&mut self) -> Result<(), Error> {
        dispatch!(self, accessor => accessor.start())
    }

    fn finish(&mut self) -> Result<(), Error> {
        dispatch!(self, accessor => accessor.finish())
    }

    fn can_eject(&self) -> bool {
        dispatch!(self, accessor => accessor.can_eject())
    }
}

impl fmt::Display for AnyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, accessor => fmt::Display::fmt(accessor, f))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyAccessor {
                fn from(accessor: $ty) -> Self {
                    AnyAccessor::$variant(accessor)
                }
            }
        )*
    };
}

impl_from!(
    Nfs(NfsAccessor),
    Http(HttpAccessor),
    Ftp(FtpAccessor),
    File(FileAccessor),
    Device(DeviceAccessor),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ftp_address_components() {
        let accessor =
            create_accessor("ftp://user:pw@host/path/", &AccessorOptions::default()).unwrap();
        let AnyAccessor::Ftp(ftp) = accessor else {
            panic!("expected an FTP accessor");
        };
        let parts = ftp.components();
        assert_eq!(parts.username(), Some("user"));
        assert_eq!(parts.password(), Some("pw"));
        assert_eq!(parts.hostname(), Some("host"));
        assert!(!ftp.read_only());
    }

    #[test]
    fn unsupported_scheme() {
        let err = create_accessor("smb://server/share/", &AccessorOptions::read_only())
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnsupportedScheme { .. }));
    }

    #[test]
    fn device_gets_fs_type_override() {
        let options = AccessorOptions::read_only().with_fs_types(["udf", "iso9660"]);
        let accessor = create_accessor("dev:///dev/sr0", &options).unwrap();
        let AnyAccessor::Device(device) = &accessor else {
            panic!("expected a device accessor");
        };
        let fstypes: Vec<&str> = device
            .candidates()
            .iter()
            .map(|c| c.fstype.as_str())
            .collect();
        assert_eq!(fstypes, ["udf", "iso9660"]);
        assert_eq!(accessor.to_string(), "<DeviceAccessor: /dev/sr0>");
    }

    #[test]
    fn http_requires_read_only() {
        let result = create_accessor("https://mirror/xs/", &AccessorOptions::default());
        assert!(matches!(result, Err(Error::PreconditionViolation { .. })));
        let accessor =
            create_accessor("https://mirror/xs/", &AccessorOptions::read_only()).unwrap();
        assert!(accessor.read_only());
    }

    #[test]
    fn options_debug_hides_mounter() {
        let options = AccessorOptions::read_only().with_http_timeout(Duration::from_secs(5));
        let shown = format!("{:?}", options);
        assert!(shown.contains("read_only: true"));
        assert!(shown.contains("custom_mounter: false"));
    }
}
