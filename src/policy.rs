//! Resize policy: the load-factor band a `ChainedHashMap` keeps its
//! element count inside, and the capacity it rebuilds to when the band
//! is left.

use crate::error::PolicyError;

/// Default growth multiplier; also the target load factor after a rebuild.
pub const DEFAULT_EXPAND_FACTOR: usize = 2;
/// Default shrink divisor.
pub const DEFAULT_SHRINK_FACTOR: usize = 4;
/// Default (and floor) bucket count.
pub const DEFAULT_MIN_CAPACITY: usize = 4;

/// Bounds the element count `n` of a table with `c` buckets to
/// `c / shrink_factor <= n <= c * expand_factor` whenever
/// `c > min_capacity`.
///
/// A rebuild resizes to `max(min_capacity, n * expand_factor)` buckets.
/// `shrink_factor > expand_factor` is required so that a freshly rebuilt
/// table sits strictly inside the band and a single removal cannot
/// trigger another rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizePolicy {
    expand_factor: usize,
    shrink_factor: usize,
    min_capacity: usize,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            expand_factor: DEFAULT_EXPAND_FACTOR,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl ResizePolicy {
    pub fn new(
        expand_factor: usize,
        shrink_factor: usize,
        min_capacity: usize,
    ) -> Result<Self, PolicyError> {
        if expand_factor == 0 {
            return Err(PolicyError::ZeroExpandFactor);
        }
        if min_capacity == 0 {
            return Err(PolicyError::ZeroMinCapacity);
        }
        if shrink_factor <= expand_factor {
            return Err(PolicyError::ShrinkNotAboveExpand {
                expand: expand_factor,
                shrink: shrink_factor,
            });
        }
        Ok(Self {
            expand_factor,
            shrink_factor,
            min_capacity,
        })
    }

    pub fn expand_factor(&self) -> usize {
        self.expand_factor
    }

    pub fn shrink_factor(&self) -> usize {
        self.shrink_factor
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// True when `count` entries overflow `capacity` buckets.
    pub fn should_grow(&self, count: usize, capacity: usize) -> bool {
        count > capacity.saturating_mul(self.expand_factor)
    }

    /// True when `count` entries underfill `capacity` buckets. Never true
    /// at or below the capacity floor.
    pub fn should_shrink(&self, count: usize, capacity: usize) -> bool {
        capacity > self.min_capacity && count < capacity / self.shrink_factor
    }

    /// Capacity a rebuild holding `count` entries allocates.
    pub fn target_capacity(&self, count: usize) -> usize {
        count.saturating_mul(self.expand_factor).max(self.min_capacity)
    }

    /// `Some(new_capacity)` when a table of `capacity` buckets must be
    /// rebuilt to hold `count` entries.
    pub fn rebuild_target(&self, count: usize, capacity: usize) -> Option<usize> {
        if self.should_grow(count, capacity) || self.should_shrink(count, capacity) {
            Some(self.target_capacity(count))
        } else {
            None
        }
    }

    /// Whether `count` entries in `capacity` buckets satisfy the band.
    pub fn admits(&self, count: usize, capacity: usize) -> bool {
        capacity >= self.min_capacity && self.rebuild_target(count, capacity).is_none()
    }
}
