//! The accessor contract.

use std::io::{self, Read, Write};

use crate::Error;

/// A readable stream returned by [`Accessor::open_address`].
pub type ReadStream = Box<dyn Read + Send>;

/// Chunk size used by [`copy_stream`]: 256 blocks of 512 bytes.
pub const COPY_CHUNK_SIZE: usize = 256 * 512;

/// Uniform access to an installation source.
///
/// Callers bracket use with [`start`](Accessor::start) and
/// [`finish`](Accessor::finish). Pairs may nest; only the outermost pair
/// acquires and releases the underlying resource.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Accessor>`.
pub trait Accessor {
    fn read_only(&self) -> bool;

    /// Open `name`, relative to the accessor's base, for reading.
    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error>;

    /// Report whether `name` can be opened.
    ///
    /// This is a probe: every failure, including calling it before
    /// `start()`, is reported as `false`.
    fn access(&mut self, name: &str) -> bool {
        match self.open_address(name) {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(e) => {
                log::debug!("{} is not accessible: {}", name, e);
                false
            }
        }
    }

    /// Copy `source` to `out_name` under the accessor's base.
    fn write_file(&mut self, _source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        Err(Error::precondition(format!(
            "cannot write {}: backend does not support writing",
            out_name
        )))
    }

    fn start(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn can_eject(&self) -> bool {
        false
    }
}

impl<T: Accessor + ?Sized> Accessor for Box<T> {
    fn read_only(&self) -> bool {
        (**self).read_only()
    }

    fn open_address(&mut self, name: &str) -> Result<ReadStream, Error> {
        (**self).open_address(name)
    }

    fn access(&mut self, name: &str) -> bool {
        (**self).access(name)
    }

    fn write_file(&mut self, source: &mut dyn Read, out_name: &str) -> Result<(), Error> {
        (**self).write_file(source, out_name)
    }

    fn start(&mut self) -> Result<(), Error> {
        (**self).start()
    }

    fn finish(&mut self) -> Result<(), Error> {
        (**self).finish()
    }

    fn can_eject(&self) -> bool {
        (**self).can_eject()
    }
}

/// Refuse a write on a read-only accessor.
pub fn ensure_writable(read_only: bool, out_name: &str) -> Result<(), Error> {
    if read_only {
        Err(Error::precondition(format!(
            "cannot write {}: accessor is read-only",
            out_name
        )))
    } else {
        Ok(())
    }
}

/// Copy everything from `source` into `dest` in [`COPY_CHUNK_SIZE`] chunks.
///
/// `dest` is flushed and closed on return, including when `source` is
/// empty. Returns the number of bytes copied.
pub fn copy_stream<W: Write>(source: &mut dyn Read, mut dest: W) -> io::Result<u64> {
    let mut buf = vec![0u8; COPY_CHUNK_SIZE];
    let mut copied = 0u64;

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dest.write_all(&buf[..n])?;
        copied += n as u64;
    }

    dest.flush()?;
    drop(dest);
    Ok(copied)
}
