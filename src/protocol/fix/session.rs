//! # Session Identity
//!
//! Identifies a FIX session by its counterparty pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a session by (SenderCompID, TargetCompID), read from the
/// perspective of the party that owns the session.
///
/// # Examples
///
/// ```
/// use synthex::protocol::fix::SessionId;
///
/// let session = SessionId::new("VENUE", "CLIENT");
/// assert_eq!(session.to_string(), "VENUE->CLIENT");
/// assert_eq!(session.reversed(), SessionId::new("CLIENT", "VENUE"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    sender_comp_id: String,
    target_comp_id: String,
}

impl SessionId {
    /// Creates a session identity.
    #[must_use]
    pub fn new(sender_comp_id: impl Into<String>, target_comp_id: impl Into<String>) -> Self {
        Self {
            sender_comp_id: sender_comp_id.into(),
            target_comp_id: target_comp_id.into(),
        }
    }

    /// Returns the SenderCompID.
    #[inline]
    #[must_use]
    pub fn sender_comp_id(&self) -> &str {
        &self.sender_comp_id
    }

    /// Returns the TargetCompID.
    #[inline]
    #[must_use]
    pub fn target_comp_id(&self) -> &str {
        &self.target_comp_id
    }

    /// Returns the same session seen from the counterparty's side.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            sender_comp_id: self.target_comp_id.clone(),
            target_comp_id: self.sender_comp_id.clone(),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.sender_comp_id, self.target_comp_id)
    }
}
