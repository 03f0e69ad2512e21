//! The mount utility collaborator.
//!
//! [`MountingAccessor`](crate::MountingAccessor) never calls mount(2)
//! itself; it goes through a [`Mounter`] so the probing loop can be driven
//! by a fake in tests.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Errors from a single mount or unmount attempt.
#[derive(thiserror::Error, Debug)]
pub enum MountError {
    #[error("failed to run {program}: {error}")]
    Spawn { program: String, error: io::Error },

    #[error("exited with status {status}")]
    Rejected { status: i32 },

    #[error("terminated by signal")]
    Killed,
}

/// Mounts and unmounts filesystems.
///
/// `mount` must either fully mount `source` at `target` or leave nothing
/// behind. `umount` is only ever called on a target that `mount` succeeded
/// for.
pub trait Mounter: Send + Sync {
    fn mount(
        &self,
        source: &str,
        target: &Path,
        fstype: &str,
        options: &[String],
    ) -> Result<(), MountError>;

    fn umount(&self, target: &Path) -> Result<(), MountError>;
}

/// One filesystem type to try, with the options to mount it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountCandidate {
    pub fstype: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl MountCandidate {
    pub fn new<I, S>(fstype: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fstype: fstype.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// [`Mounter`] backed by the system `mount` and `umount` programs.
#[derive(Debug, Clone)]
pub struct SystemMounter {
    mount_program: PathBuf,
    umount_program: PathBuf,
}

impl SystemMounter {
    pub fn new(mount_program: impl Into<PathBuf>, umount_program: impl Into<PathBuf>) -> Self {
        Self {
            mount_program: mount_program.into(),
            umount_program: umount_program.into(),
        }
    }

    fn run(program: &Path, command: &mut Command) -> Result<(), MountError> {
        let status = command.status().map_err(|error| MountError::Spawn {
            program: program.display().to_string(),
            error,
        })?;

        if status.success() {
            Ok(())
        } else {
            match status.code() {
                Some(status) => Err(MountError::Rejected { status }),
                None => Err(MountError::Killed),
            }
        }
    }
}

impl Default for SystemMounter {
    fn default() -> Self {
        Self::new("/bin/mount", "/bin/umount")
    }
}

impl Mounter for SystemMounter {
    fn mount(
        &self,
        source: &str,
        target: &Path,
        fstype: &str,
        options: &[String],
    ) -> Result<(), MountError> {
        let mut command = Command::new(&self.mount_program);
        command.arg("-t").arg(fstype);
        if !options.is_empty() {
            command.arg("-o").arg(options.join(","));
        }
        command.arg(source).arg(target);

        log::debug!(
            "Mounting {} on {} (type: {}, options: {:?})",
            source,
            target.display(),
            fstype,
            options
        );
        Self::run(&self.mount_program, &mut command)
    }

    fn umount(&self, target: &Path) -> Result<(), MountError> {
        log::debug!("Unmounting {}", target.display());
        let mut command = Command::new(&self.umount_program);
        command.arg(target);
        Self::run(&self.umount_program, &mut command)
    }
}
