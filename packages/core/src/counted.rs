//! Reference-counted ownership of an external resource.
//!
//! Nested `start()`/`finish()` pairs share one mount point or one FTP
//! control connection. [`Counted`] holds that resource together with its
//! count, so "resource present" and "count above zero" cannot disagree.

use std::num::NonZeroUsize;

#[derive(Debug)]
struct Held<T> {
    resource: T,
    count: NonZeroUsize,
}

#[derive(Debug)]
pub struct Counted<T> {
    held: Option<Held<T>>,
}

impl<T> Counted<T> {
    pub const fn new() -> Self {
        Self { held: None }
    }

    /// Take one reference, calling `open` only on the 0 -> 1 transition.
    ///
    /// If `open` fails the count is left unchanged. Returns the new count.
    pub fn acquire_with<E>(&mut self, open: impl FnOnce() -> Result<T, E>) -> Result<usize, E> {
        match &mut self.held {
            Some(held) => {
                held.count = held.count.saturating_add(1);
                Ok(held.count.get())
            }
            None => {
                let resource = open()?;
                self.held = Some(Held {
                    resource,
                    count: NonZeroUsize::MIN,
                });
                Ok(1)
            }
        }
    }

    /// Drop one reference, calling `close` only on the 1 -> 0 transition.
    ///
    /// Releasing when nothing is held is a no-op returning `Ok(0)`. If
    /// `close` fails the resource stays held with a count of one.
    pub fn release_with<E>(&mut self, close: impl FnOnce(&mut T) -> Result<(), E>) -> Result<usize, E> {
        let Some(held) = &mut self.held else {
            return Ok(0);
        };

        match NonZeroUsize::new(held.count.get() - 1) {
            Some(count) => {
                held.count = count;
                Ok(count.get())
            }
            None => {
                close(&mut held.resource)?;
                self.held = None;
                Ok(0)
            }
        }
    }

    pub fn count(&self) -> usize {
        self.held.as_ref().map_or(0, |held| held.count.get())
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.held.as_ref().map(|held| &held.resource)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.held.as_mut().map(|held| &mut held.resource)
    }
}

impl<T> Default for Counted<T> {
    fn default() -> Self {
        Self::new()
    }
}
