//! Change notifications delivered to media query listeners.

use serde::{Deserialize, Serialize};

/// Event type the mock dispatches on match transitions
pub const CHANGE_EVENT: &str = "change";

/// Event carried to listeners, mirroring the platform's `MediaQueryListEvent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQueryListEvent {
    /// Event type (`"change"` for transitions)
    #[serde(rename = "type")]
    pub event_type: String,
    /// Match state after the transition
    pub matches: bool,
    /// Query string of the live query object
    pub media: String,
}

impl MediaQueryListEvent {
    /// Create an event of any type (for manual dispatch)
    #[must_use]
    pub fn new(event_type: impl Into<String>, matches: bool, media: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            matches,
            media: media.into(),
        }
    }

    /// Create a `change` notification
    #[must_use]
    pub fn change(matches: bool, media: impl Into<String>) -> Self {
        Self::new(CHANGE_EVENT, matches, media)
    }

    /// Check if this is a `change` event
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.event_type == CHANGE_EVENT
    }
}
