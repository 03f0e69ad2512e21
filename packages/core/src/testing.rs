//! Test doubles for the mount collaborator.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::mount::{MountError, Mounter};

/// A recorded call to [`Mounter::mount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    pub source: String,
    pub target: PathBuf,
    pub fstype: String,
    pub options: Vec<String>,
}

#[derive(Default)]
struct FakeState {
    failing: HashSet<String>,
    attempts: Vec<MountCall>,
    mounted: Vec<MountCall>,
    unmounts: Vec<PathBuf>,
    fail_umount: bool,
}

/// A [`Mounter`] that records calls and never touches the OS.
///
/// A successful "mount" leaves the target directory as an ordinary empty
/// directory, so reads and writes through the accessor hit the scratch
/// directory directly. Clones share their recorded state.
#[derive(Clone, Default)]
pub struct FakeMounter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeMounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mount attempt with `fstype` fail.
    pub fn failing(self, fstype: impl Into<String>) -> Self {
        self.state.lock().unwrap().failing.insert(fstype.into());
        self
    }

    pub fn set_umount_failure(&self, fail: bool) {
        self.state.lock().unwrap().fail_umount = fail;
    }

    /// Every mount attempt, successful or not, in order.
    pub fn attempts(&self) -> Vec<MountCall> {
        self.state.lock().unwrap().attempts.clone()
    }

    /// Successful mounts, in order.
    pub fn mounts(&self) -> Vec<MountCall> {
        self.state.lock().unwrap().mounted.clone()
    }

    pub fn unmounts(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().unmounts.clone()
    }
}

impl Mounter for FakeMounter {
    fn mount(
        &self,
        source: &str,
        target: &Path,
        fstype: &str,
        options: &[String],
    ) -> Result<(), MountError> {
        let mut state = self.state.lock().unwrap();
        let call = MountCall {
            source: source.to_string(),
            target: target.to_path_buf(),
            fstype: fstype.to_string(),
            options: options.to_vec(),
        };
        state.attempts.push(call.clone());

        if state.failing.contains(fstype) {
            return Err(MountError::Rejected { status: 32 });
        }
        state.mounted.push(call);
        Ok(())
    }

    fn umount(&self, target: &Path) -> Result<(), MountError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_umount {
            return Err(MountError::Rejected { status: 32 });
        }
        state.unmounts.push(target.to_path_buf());
        Ok(())
    }
}
