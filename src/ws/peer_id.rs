//! Type-safe peer identifier.
//!
//! [`PeerId`] is a newtype wrapper around [`uuid::Uuid`] (v4) assigned to
//! every messaging connection when it opens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a connected messaging peer.
///
/// Doubles as the name of the peer's private room, so emitting to
/// `Some(&peer_id.to_string())` reaches exactly that peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(uuid::Uuid);

impl PeerId {
    /// Creates a new random `PeerId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `PeerId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PeerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
