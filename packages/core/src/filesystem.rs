//! Backends that read and write a directory on the local filesystem.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::accessor::{copy_stream, ensure_writable, Accessor, ReadStream};
use crate::address::strip_scheme;
use crate::Error;

pub(crate) fn open_in(base: &Path, name: &str) -> Result<ReadStream, Error> {
    let path = base.join(name);
    log::debug!("Opening {}", path.display());
    let file = File::open(&path).map_err(|e| Error::from_open(name, e))?;
    Ok(Box::new(file))
}

pub(crate) fn write_in(base: &Path, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
    let path = base.join(out_name);
    log::info!("Copying to {}", path.display());
    let file = File::create(&path).map_err(|e| Error::from_open(out_name, e))?;
    copy_stream(source, file)?;
    Ok(())
}

/// Files relative to a fixed directory.
#[derive(Debug, Clone)]
pub struct FilesystemAccessor {
    location: PathBuf,
    read_only: bool,
}

impl FilesystemAccessor {
    pub fn new(location: impl Into<PathBuf>, read_only: bool) -> Self {
        Self {
            location: location.into(),
            read_only,
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl Accessor for FilesystemAccessor {
    fn read_only(&self) -> bool {
        self.read_only
    }

    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
        open_in(&self.location, name)
    }

    fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        ensure_writable(self.read_only, out_name)?;
        write_in(&self.location, source, out_name)
    }
}

impl fmt::Display for FilesystemAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FilesystemAccessor: {}>", self.location.display())
    }
}

/// A `file://` address; no mount step.
#[derive(Debug, Clone)]
pub struct FileAccessor {
    base_address: String,
    read_only: bool,
}

impl FileAccessor {
    /// `base_address` must name a directory and end in `/`.
    pub fn new(base_address: &str, read_only: bool) -> Result<Self, Error> {
        let base_address = strip_scheme(base_address, "file");
        if !base_address.ends_with('/') {
            return Err(Error::precondition(format!(
                "file base address {} must end with '/'",
                base_address
            )));
        }

        Ok(Self {
            base_address: base_address.to_string(),
            read_only,
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }
}

impl Accessor for FileAccessor {
    fn read_only(&self) -> bool {
        self.read_only
    }

    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
        open_in(Path::new(&self.base_address), name)
    }

    fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        ensure_writable(self.read_only, out_name)?;
        write_in(Path::new(&self.base_address), source, out_name)
    }
}

impl fmt::Display for FileAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FileAccessor: {}>", self.base_address)
    }
}
