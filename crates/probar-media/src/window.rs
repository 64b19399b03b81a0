//! Host Window Emulation
//!
//! The host object that owns the process-wide `matchMedia` slot. Tests create
//! one per emulated page and hand it to [`crate::MatchMediaMock`].
//!
//! ## Toyota Way Application:
//! - **Poka-Yoke**: the host kind is fixed at construction, so installing on a
//!   non-DOM host fails before anything is overridden

use crate::query_list::{same_entry, MatchMedia, MatchMediaEntry, MediaQueryList};
use crate::result::{MediaMockError, MediaMockResult};
use std::cell::{Cell, RefCell};
use std::fmt;

/// Kind of execution host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKind {
    /// DOM emulation environment (has a window)
    #[default]
    Dom,
    /// Plain runtime without DOM globals
    Headless,
}

impl HostKind {
    /// Check if DOM globals are available
    #[must_use]
    pub const fn has_dom(self) -> bool {
        matches!(self, Self::Dom)
    }
}

/// Emulated window holding the `matchMedia` entry-point slot
#[derive(Default)]
pub struct Window {
    kind: HostKind,
    match_media: RefCell<Option<MatchMediaEntry>>,
    overridden: Cell<bool>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("kind", &self.kind)
            .field("has_match_media", &self.match_media.borrow().is_some())
            .field("overridden", &self.overridden.get())
            .finish()
    }
}

impl Window {
    /// Create a DOM-emulation window with an empty `matchMedia` slot
    #[must_use]
    pub fn dom() -> Self {
        Self::default()
    }

    /// Create a host without DOM globals
    #[must_use]
    pub fn headless() -> Self {
        Self {
            kind: HostKind::Headless,
            ..Self::default()
        }
    }

    /// Seed the slot with a platform entry point
    #[must_use]
    pub fn with_match_media(self, entry: MatchMediaEntry) -> Self {
        *self.match_media.borrow_mut() = Some(entry);
        self
    }

    /// Host kind
    #[must_use]
    pub const fn kind(&self) -> HostKind {
        self.kind
    }

    /// Current entry point, if any
    #[must_use]
    pub fn match_media_entry(&self) -> Option<MatchMediaEntry> {
        self.match_media.borrow().clone()
    }

    /// Check whether the slot currently holds `entry`
    #[must_use]
    pub fn has_entry(&self, entry: &MatchMediaEntry) -> bool {
        self.match_media
            .borrow()
            .as_ref()
            .is_some_and(|current| same_entry(current, entry))
    }

    /// Replace the entry point, returning the previous one
    pub fn replace_match_media(&self, entry: Option<MatchMediaEntry>) -> Option<MatchMediaEntry> {
        self.match_media.replace(entry)
    }

    /// Call the entry point (`window.matchMedia(query)`)
    pub fn match_media(&self, query: &str) -> MediaMockResult<MediaQueryList> {
        // Clone out of the slot so the entry may touch the window while running.
        let entry = self
            .match_media_entry()
            .ok_or(MediaMockError::MatchMediaUnavailable)?;
        Ok(entry.match_media(query))
    }

    /// Check whether a mock currently overrides the entry point
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.overridden.get()
    }

    pub(crate) fn set_overridden(&self, overridden: bool) {
        self.overridden.set(overridden);
    }
}
