//! Accessors that mount their source on a temporary directory.
//!
//! The mount is shared by nested `start()`/`finish()` pairs: the first
//! `start()` creates a `media-*` directory and probes the candidate
//! filesystem types in order, committing to the first one that mounts.
//! The last `finish()` unmounts and removes the directory.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::accessor::{ensure_writable, Accessor, ReadStream};
use crate::counted::Counted;
use crate::filesystem::{open_in, write_in};
use crate::mount::{MountCandidate, MountError, Mounter, SystemMounter};
use crate::Error;

const ISO9660: &str = "iso9660";
const MOUNT_POINT_PREFIX: &str = "media-";

pub struct MountingAccessor {
    source: String,
    candidates: Vec<MountCandidate>,
    read_only: bool,
    mounter: Arc<dyn Mounter>,
    mount_root: PathBuf,
    state: Counted<PathBuf>,
}

impl MountingAccessor {
    pub fn new(source: impl Into<String>, candidates: Vec<MountCandidate>, read_only: bool) -> Self {
        Self {
            source: source.into(),
            candidates,
            read_only,
            mounter: Arc::new(SystemMounter::default()),
            mount_root: std::env::temp_dir(),
            state: Counted::new(),
        }
    }

    pub fn with_mounter(mut self, mounter: Arc<dyn Mounter>) -> Self {
        self.mounter = mounter;
        self
    }

    /// Directory under which temporary mount points are created.
    pub fn with_mount_root(mut self, mount_root: impl Into<PathBuf>) -> Self {
        self.mount_root = mount_root.into();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn candidates(&self) -> &[MountCandidate] {
        &self.candidates
    }

    /// The current mount point, if started.
    pub fn location(&self) -> Option<&Path> {
        self.state.get().map(PathBuf::as_path)
    }

    pub fn start_count(&self) -> usize {
        self.state.count()
    }

    fn mounted_location(&self, name: &str) -> Result<&Path, Error> {
        self.location().ok_or_else(|| {
            Error::precondition(format!("cannot access {}: {} is not started", name, self))
        })
    }
}

/// Create a mount point and mount `source` on it with the first candidate
/// that succeeds. On failure the mount point is removed again.
fn mount_first(
    source: &str,
    candidates: &mut [MountCandidate],
    mounter: &dyn Mounter,
    mount_root: &Path,
) -> Result<PathBuf, Error> {
    let location = tempfile::Builder::new()
        .prefix(MOUNT_POINT_PREFIX)
        .tempdir_in(mount_root)?
        .keep();

    let mut attempts: Vec<(String, MountError)> = Vec::with_capacity(candidates.len());
    for candidate in candidates.iter_mut() {
        if candidate.fstype == ISO9660 && !candidate.has_option("ro") {
            candidate.options.push("ro".to_string());
        }

        match mounter.mount(source, &location, &candidate.fstype, &candidate.options) {
            Ok(()) => {
                log::info!(
                    "Mounted {} on {} as {}",
                    source,
                    location.display(),
                    candidate.fstype
                );
                return Ok(location);
            }
            Err(e) => {
                log::debug!("Mounting {} as {} failed: {}", source, candidate.fstype, e);
                attempts.push((candidate.fstype.clone(), e));
            }
        }
    }

    if let Err(e) = fs::remove_dir(&location) {
        log::warn!(
            "Failed to remove mount point {}: {}",
            location.display(),
            e
        );
    }
    Err(Error::MountFailure {
        device: source.to_string(),
        attempts,
    })
}

fn unmount(mounter: &dyn Mounter, location: &Path) -> Result<(), Error> {
    mounter.umount(location)?;
    if let Err(e) = fs::remove_dir(location) {
        log::warn!(
            "Failed to remove mount point {}: {}",
            location.display(),
            e
        );
    }
    Ok(())
}

impl Accessor for MountingAccessor {
    fn read_only(&self) -> bool {
        self.read_only
    }

    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
        open_in(self.mounted_location(name)?, name)
    }

    fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        ensure_writable(self.read_only, out_name)?;
        write_in(self.mounted_location(out_name)?, source, out_name)
    }

    fn start(&mut self) -> Result<(), Error> {
        let Self {
            source,
            candidates,
            mounter,
            mount_root,
            state,
            ..
        } = self;
        state.acquire_with(|| mount_first(source, candidates, mounter.as_ref(), mount_root))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        let mounter = self.mounter.as_ref();
        self.state
            .release_with(|location| unmount(mounter, location))?;
        Ok(())
    }
}

impl Drop for MountingAccessor {
    fn drop(&mut self) {
        let outstanding = self.state.count();
        if outstanding == 0 {
            return;
        }

        log::error!(
            "{} dropped with {} unmatched start(); releasing mount",
            self,
            outstanding
        );
        while self.state.is_held() {
            if let Err(e) = self.finish() {
                log::error!("Failed to release {}: {}", self.source, e);
                break;
            }
        }
    }
}

impl fmt::Display for MountingAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<MountingAccessor: {}>", self.source)
    }
}
