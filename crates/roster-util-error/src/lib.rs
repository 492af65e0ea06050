//! Error helpers shared across the roster crates.

use std::{error, fmt};

/// An error and its `source()` chain, displayed as `outer: inner: root`.
pub struct CompactChain<'e>(&'e (dyn error::Error + 'static));

impl fmt::Display for CompactChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)?;

        let mut cur = self.0.source();
        while let Some(err) = cur {
            write!(f, ": {err}")?;
            cur = err.source();
        }

        Ok(())
    }
}

pub trait FmtCompact {
    fn fmt_compact(&self) -> CompactChain<'_>;
}

impl<E> FmtCompact for E
where
    E: error::Error + 'static,
{
    fn fmt_compact(&self) -> CompactChain<'_> {
        CompactChain(self)
    }
}

#[cfg(test)]
mod tests;
