//! Error types for map access and policy construction.

use thiserror::Error;

/// Failure of a checked access into a `ChainedHashMap`.
///
/// A failing call never modifies the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    /// Returned by `ChainedHashMap::at` when the key is absent.
    #[error("key not found in map")]
    KeyNotFound,
    /// The cursor was minted before a structural change to the map.
    #[error("cursor from generation {cursor} used on map at generation {map}")]
    InvalidatedCursor { cursor: u64, map: u64 },
    /// The cursor is the before-begin or after-end sentinel.
    #[error("cursor does not point at an entry")]
    SentinelCursor,
}

/// Rejected `ResizePolicy` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("expand factor must be at least 1")]
    ZeroExpandFactor,
    #[error("minimum capacity must be at least 1")]
    ZeroMinCapacity,
    #[error("shrink factor {shrink} must be greater than expand factor {expand}")]
    ShrinkNotAboveExpand { expand: usize, shrink: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = MapError::InvalidatedCursor { cursor: 3, map: 7 };
        assert_eq!(e.to_string(), "cursor from generation 3 used on map at generation 7");

        let p = PolicyError::ShrinkNotAboveExpand { expand: 4, shrink: 2 };
        assert_eq!(
            p.to_string(),
            "shrink factor 2 must be greater than expand factor 4"
        );
        assert_eq!(MapError::KeyNotFound.to_string(), "key not found in map");
    }
}
