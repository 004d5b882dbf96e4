//! Structural generation counter.
//!
//! Every change that can move an entry to a different `(bucket, slot)`
//! advances the counter. Cursors remember the generation they were
//! minted under and are rejected once the map has moved on, so a stale
//! cursor fails fast instead of reading whatever entry shifted into its
//! old slot.

use crate::error::MapError;

/// Per-map generation. Embed in the owning struct and call `bump` from
/// every structural mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub(crate) fn current(&self) -> u64 {
        self.0
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Ok iff `minted` is the current generation.
    #[inline]
    pub(crate) fn check(&self, minted: u64) -> Result<(), MapError> {
        if minted == self.0 {
            Ok(())
        } else {
            Err(MapError::InvalidatedCursor {
                cursor: minted,
                map: self.0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_generation_accepts_its_own_stamp() {
        let g = Generation::new();
        assert_eq!(g.check(g.current()), Ok(()));
    }

    #[test]
    fn bump_rejects_older_stamps() {
        let mut g = Generation::new();
        let old = g.current();
        g.bump();
        assert_eq!(
            g.check(old),
            Err(MapError::InvalidatedCursor { cursor: 0, map: 1 })
        );
        assert_eq!(g.check(g.current()), Ok(()));
    }

    #[test]
    fn wraps_instead_of_overflowing() {
        let mut g = Generation(u64::MAX);
        g.bump();
        assert_eq!(g.current(), 0);
    }
}
