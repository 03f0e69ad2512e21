//! The `mediafs` command: probe, fetch from, and store to an installation
//! source given by address.
//!
//! ```text
//! mediafs probe nfs://server:/export/xs/ .treeinfo
//! mediafs fetch --fs udf dev:///dev/sr0 repodata/repomd.xml -o repomd.xml
//! mediafs store --read-write ftp://user:pw@host/upload/ install.log ./install.log
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to trace each
//! request.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use mediafs::{copy_stream, create_accessor, Accessor, AccessorOptions, AnyAccessor};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Accessor(#[from] mediafs::Error),

    #[error("{path}: {error}")]
    LocalFile { path: PathBuf, error: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// mediafs - reach installation sources by address
#[derive(Parser, Debug)]
#[command(name = "mediafs")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Open the source for writing (mounts without `ro`)
    #[arg(long, global = true)]
    pub read_write: bool,

    /// Filesystem type to try when mounting a device; repeat to try several
    #[arg(long = "fs", value_name = "TYPE", global = true)]
    pub fs_types: Vec<String>,

    /// Directory in which temporary mount points are created
    #[arg(long, value_name = "DIR", global = true)]
    pub mount_root: Option<PathBuf>,

    /// HTTP request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether NAME exists under ADDRESS
    Probe { address: String, name: String },

    /// Copy NAME from ADDRESS to a local file, or to stdout
    Fetch {
        address: String,
        name: String,

        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Copy LOCAL_FILE to NAME under ADDRESS
    Store {
        address: String,
        name: String,
        local_file: PathBuf,
    },
}

impl Command {
    pub fn address(&self) -> &str {
        match self {
            Command::Probe { address, .. }
            | Command::Fetch { address, .. }
            | Command::Store { address, .. } => address,
        }
    }
}

impl Args {
    pub fn options(&self) -> AccessorOptions {
        AccessorOptions {
            read_only: !self.read_write,
            fs_types: (!self.fs_types.is_empty()).then(|| self.fs_types.clone()),
            mount_root: self.mount_root.clone(),
            http_timeout: self.timeout.map(Duration::from_secs),
            mounter: None,
        }
    }
}

/// Run one command, writing its output to `stdout`.
///
/// Returns `Ok(false)` when a probe finds nothing.
pub fn run(args: &Args, stdout: &mut dyn Write) -> Result<bool, CliError> {
    let mut accessor = create_accessor(args.command.address(), &args.options())?;
    log::debug!("Using {}", accessor);

    accessor.start()?;
    let result = execute(&args.command, &mut accessor, stdout);
    let finished = accessor.finish();

    let outcome = result?;
    finished?;
    Ok(outcome)
}

fn execute(
    command: &Command,
    accessor: &mut AnyAccessor,
    stdout: &mut dyn Write,
) -> Result<bool, CliError> {
    match command {
        Command::Probe { name, .. } => {
            let found = accessor.access(name);
            writeln!(stdout, "{}: {}", name, if found { "present" } else { "missing" })?;
            Ok(found)
        }
        Command::Fetch { name, output, .. } => {
            let mut stream = accessor.open_address(name)?;
            match output {
                Some(path) => {
                    let file = File::create(path).map_err(|error| CliError::LocalFile {
                        path: path.clone(),
                        error,
                    })?;
                    let copied = copy_stream(&mut stream, file)?;
                    log::info!("Fetched {} ({} bytes) to {}", name, copied, path.display());
                }
                None => {
                    copy_stream(&mut stream, &mut *stdout)?;
                }
            }
            Ok(true)
        }
        Command::Store {
            name, local_file, ..
        } => {
            let mut file = File::open(local_file).map_err(|error| CliError::LocalFile {
                path: local_file.clone(),
                error,
            })?;
            accessor.write_file(&mut file, name)?;
            Ok(true)
        }
    }
}
