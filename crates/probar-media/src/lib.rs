//! Probar Media: a controllable `matchMedia` for component tests
//!
//! Replaces a window's `matchMedia` entry point with a mock whose viewport the
//! test drives. Live query objects read the current viewport on every access,
//! and changing the viewport notifies exactly the listeners whose match state
//! flipped, the way a real browser does on resize.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐ install  ┌──────────┐ match_media ┌────────────────┐
//! │ MatchMediaMock│─────────►│  Window  │────────────►│ MediaQueryList │
//! │   set()       │          │  (slot)  │             │  add_listener  │
//! └──────┬────────┘          └──────────┘             └───────┬────────┘
//!        │ replace viewport                                   │ attach
//!        ▼                                                    ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ MediaContext: viewport + legacy/modern listener lanes            │
//! │ diff each entry's last-known match, notify on flip               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use jugar_probar_media::{Listener, MatchMediaMock, ViewportDescription, Window};
//! use std::rc::Rc;
//!
//! let window = Rc::new(Window::dom());
//! let mock = MatchMediaMock::builder(Rc::clone(&window))
//!     .viewport(ViewportDescription::new().width("320px"))
//!     .build();
//! mock.install()?;
//!
//! let mobile = window.match_media("(max-width: 600px)")?;
//! assert!(mobile.matches());
//!
//! mobile.add_event_listener("change", Listener::from_fn(|event| {
//!     assert!(!event.matches);
//! }));
//! assert_eq!(mock.set(ViewportDescription::new().width("1440px")), 1);
//!
//! mock.cleanup();
//! ```

#![warn(missing_docs)]

mod controller;
mod devices;
mod evaluator;
mod event;
mod lifecycle;
mod listener;
mod query_list;
mod registry;
mod result;
mod scheduler;
mod state;
mod viewport;
mod window;


pub use controller::{MatchMediaMock, MatchMediaMockBuilder};
pub use devices::{DeviceCatalog, DevicePreset};
pub use evaluator::{CssMediaEvaluator, QueryEvaluator, DEFAULT_MEDIA_TYPE};
pub use event::{MediaQueryListEvent, CHANGE_EVENT};
pub use lifecycle::{GroupState, Hook, LifecycleHooks, TestGroup};
pub use listener::{HandleEvent, Listener};
pub use query_list::{same_entry, MatchMedia, MatchMediaEntry, MediaQueryList, MediaQueryListFactory};
pub use registry::Lane;
pub use result::{MediaMockError, MediaMockResult};
pub use scheduler::{ImmediateScheduler, RenderQueue, RenderScheduler, MAX_TASKS_PER_FLUSH};
pub use viewport::{FeatureKind, MediaFeature, MediaValue, ViewportDescription};
pub use window::{HostKind, Window};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Lane, Listener, MatchMediaMock, MediaMockError, MediaMockResult, MediaQueryList,
        MediaQueryListEvent, ViewportDescription, Window,
    };
}
