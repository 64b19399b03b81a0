//! matchMedia Mock Controller
//!
//! Owns the simulated viewport and the override of a window's `matchMedia`
//! slot.
//!
//! ```rust,ignore
//! let window = Rc::new(Window::dom());
//! let mock = MatchMediaMock::builder(Rc::clone(&window))
//!     .viewport(ViewportDescription::new().width("320px"))
//!     .build();
//! mock.install()?;
//!
//! let mobile = window.match_media("(max-width: 600px)")?;
//! mobile.add_event_listener("change", Listener::from_fn(|e| println!("{}", e.matches)));
//!
//! mock.set(ViewportDescription::new().width("1440px")); // listener sees `false`
//! mock.cleanup();
//! ```
//!
//! ## State machine
//!
//! ```text
//! uninstalled ──install()──► installed ──cleanup()──► uninstalled
//! ```
//!
//! Installing twice without `cleanup` fails with
//! [`MediaMockError::AlreadyInstalled`] instead of silently stacking overrides.

use crate::evaluator::{CssMediaEvaluator, QueryEvaluator};
use crate::lifecycle::LifecycleHooks;
use crate::query_list::{MatchMediaEntry, MediaQueryList, MediaQueryListFactory};
use crate::registry::Lane;
use crate::result::{MediaMockError, MediaMockResult};
use crate::scheduler::{ImmediateScheduler, RenderScheduler};
use crate::state::MediaContext;
use crate::viewport::ViewportDescription;
use crate::window::Window;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Builder for [`MatchMediaMock`]
pub struct MatchMediaMockBuilder {
    window: Rc<Window>,
    viewport: ViewportDescription,
    evaluator: Rc<dyn QueryEvaluator>,
    scheduler: Rc<dyn RenderScheduler>,
}

impl fmt::Debug for MatchMediaMockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchMediaMockBuilder")
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl MatchMediaMockBuilder {
    /// Initial viewport
    #[must_use]
    pub fn viewport(mut self, viewport: ViewportDescription) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replace the query evaluator
    #[must_use]
    pub fn evaluator(mut self, evaluator: Rc<dyn QueryEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Replace the render scheduler `set` runs inside
    #[must_use]
    pub fn scheduler(mut self, scheduler: Rc<dyn RenderScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Build the (uninstalled) mock
    #[must_use]
    pub fn build(self) -> MatchMediaMock {
        let context = Rc::new(MediaContext::new(self.viewport, Rc::clone(&self.evaluator)));
        MatchMediaMock {
            inner: Rc::new(MockInner {
                window: self.window,
                scheduler: self.scheduler,
                context: RefCell::new(context),
                installation: RefCell::new(None),
            }),
        }
    }
}

struct Installation {
    original: Option<MatchMediaEntry>,
    entry: MatchMediaEntry,
}

struct MockInner {
    window: Rc<Window>,
    scheduler: Rc<dyn RenderScheduler>,
    context: RefCell<Rc<MediaContext>>,
    installation: RefCell<Option<Installation>>,
}

impl MockInner {
    fn restore(&self) -> bool {
        let Some(installation) = self.installation.borrow_mut().take() else {
            return false;
        };
        if !self.window.has_entry(&installation.entry) {
            tracing::warn!("matchMedia slot was replaced while mocked; restoring original anyway");
        }
        let _ = self.window.replace_match_media(installation.original);
        self.window.set_overridden(false);

        // Handles from this installation keep the old context and go quiet.
        let old = Rc::clone(&self.context.borrow());
        let fresh = Rc::new(MediaContext::new(old.viewport(), old.evaluator()));
        *self.context.borrow_mut() = fresh;
        true
    }
}

impl Drop for MockInner {
    fn drop(&mut self) {
        if self.restore() {
            tracing::debug!("matchMedia mock dropped while installed; original restored");
        }
    }
}

/// Controllable stand-in for `window.matchMedia`
///
/// Cheap to clone; clones drive the same mock. When the last clone is
/// dropped while installed, the original entry point is restored.
#[derive(Clone)]
pub struct MatchMediaMock {
    inner: Rc<MockInner>,
}

impl fmt::Debug for MatchMediaMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchMediaMock")
            .field("installed", &self.is_installed())
            .field("context", &self.inner.context.borrow())
            .finish()
    }
}

impl MatchMediaMock {
    /// Mock over `window` with an empty viewport and the default evaluator
    #[must_use]
    pub fn new(window: Rc<Window>) -> Self {
        Self::builder(window).build()
    }

    /// Start configuring a mock over `window`
    #[must_use]
    pub fn builder(window: Rc<Window>) -> MatchMediaMockBuilder {
        MatchMediaMockBuilder {
            window,
            viewport: ViewportDescription::default(),
            evaluator: Rc::new(CssMediaEvaluator::new()),
            scheduler: Rc::new(ImmediateScheduler),
        }
    }

    fn context(&self) -> Rc<MediaContext> {
        Rc::clone(&self.inner.context.borrow())
    }

    /// Override the window's `matchMedia` entry point
    ///
    /// # Errors
    ///
    /// - [`MediaMockError::WrongEnvironment`] if the window is not a DOM host
    /// - [`MediaMockError::AlreadyInstalled`] if this or another mock already
    ///   overrides the window
    pub fn install(&self) -> MediaMockResult<()> {
        let window = &self.inner.window;
        if !window.kind().has_dom() {
            return Err(MediaMockError::WrongEnvironment);
        }
        if self.is_installed() || window.is_overridden() {
            tracing::warn!("refusing to install matchMedia mock twice");
            return Err(MediaMockError::AlreadyInstalled);
        }

        let entry: MatchMediaEntry = Rc::new(MediaQueryListFactory::from_context(self.context()));
        let original = window.replace_match_media(Some(Rc::clone(&entry)));
        window.set_overridden(true);
        tracing::debug!(had_original = original.is_some(), "matchMedia mock installed");

        *self.inner.installation.borrow_mut() = Some(Installation { original, entry });
        Ok(())
    }

    /// Restore the original entry point; a no-op when not installed
    pub fn cleanup(&self) {
        if self.inner.restore() {
            tracing::debug!("matchMedia mock cleaned up");
        }
    }

    /// Check if the mock currently overrides the window
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.inner.installation.borrow().is_some()
    }

    /// Replace the viewport and notify listeners whose match state flipped
    ///
    /// The new description replaces the old one wholesale. Runs inside the
    /// render scheduler, so scheduled follow-on work has run on return.
    /// Returns the number of notifications delivered.
    pub fn set(&self, viewport: ViewportDescription) -> usize {
        let context = self.context();
        let mut pending = Some(viewport);
        let mut delivered = 0;

        self.inner.scheduler.act(&mut || {
            if let Some(viewport) = pending.take() {
                context.replace_viewport(viewport);
                delivered = context.notify_transitions();
            }
        });

        tracing::debug!(delivered, "viewport updated");
        delivered
    }

    /// Current viewport description
    #[must_use]
    pub fn viewport(&self) -> ViewportDescription {
        self.context().viewport()
    }

    /// Registered listeners in one lane of the current installation
    #[must_use]
    pub fn listener_count(&self, lane: Lane) -> usize {
        self.context().listener_count(lane)
    }

    /// Shorthand for `window.match_media(query)`
    pub fn match_media(&self, query: &str) -> MediaMockResult<MediaQueryList> {
        self.inner.window.match_media(query)
    }

    /// The window this mock overrides
    #[must_use]
    pub fn window(&self) -> &Rc<Window> {
        &self.inner.window
    }

    /// Install before a test group and clean up after it
    pub fn register_hooks(&self, hooks: &mut dyn LifecycleHooks) {
        let mock = self.clone();
        hooks.before_all(Box::new(move || mock.install()));
        let mock = self.clone();
        hooks.after_all(Box::new(move || -> MediaMockResult<()> {
            mock.cleanup();
            Ok(())
        }));
    }
}
