//! Test Group Lifecycle
//!
//! Group-level setup and teardown hooks, the `beforeAll`/`afterAll` pair a
//! test framework supplies. [`crate::MatchMediaMock::register_hooks`] plugs
//! into any [`LifecycleHooks`] implementation; [`TestGroup`] is a small
//! runner for harnesses that have none.
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: a failed setup stops the group before any test runs
//! - **Heijunka**: teardown always runs, in reverse registration order

use crate::result::{MediaMockError, MediaMockResult};
use std::fmt;

/// A lifecycle hook
pub type Hook = Box<dyn FnMut() -> MediaMockResult<()>>;

/// Registration surface for group-level hooks
pub trait LifecycleHooks {
    /// Register a hook to run once before the group's tests
    fn before_all(&mut self, hook: Hook);

    /// Register a hook to run once after the group's tests
    fn after_all(&mut self, hook: Hook);
}

/// State of a test group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    /// Hooks registered, nothing run yet
    #[default]
    Registered,
    /// Teardown completed
    TornDown,
    /// A hook failed
    Failed,
}

/// Minimal test-group runner implementing [`LifecycleHooks`]
///
/// # Example
///
/// ```ignore
/// let mut group = TestGroup::new("responsive header");
/// mock.register_hooks(&mut group);
///
/// group.run(|| {
///     let list = mock.match_media("(max-width: 600px)").unwrap();
///     assert!(list.matches());
/// })?;
/// ```
#[derive(Default)]
pub struct TestGroup {
    name: String,
    before: Vec<Hook>,
    after: Vec<Hook>,
    state: GroupState,
}

impl fmt::Debug for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestGroup")
            .field("name", &self.name)
            .field("before_all", &self.before.len())
            .field("after_all", &self.after.len())
            .field("state", &self.state)
            .finish()
    }
}

impl LifecycleHooks for TestGroup {
    fn before_all(&mut self, hook: Hook) {
        self.before.push(hook);
    }

    fn after_all(&mut self, hook: Hook) {
        self.after.push(hook);
    }
}

impl TestGroup {
    /// Create an empty group
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Group name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> GroupState {
        self.state
    }

    /// Number of registered `(before_all, after_all)` hooks
    #[must_use]
    pub fn hook_counts(&self) -> (usize, usize) {
        (self.before.len(), self.after.len())
    }

    /// Run setup hooks, the tests, then teardown hooks
    ///
    /// # Errors
    ///
    /// Returns the first hook failure. When a setup hook fails the tests are
    /// skipped but teardown hooks still run.
    pub fn run<T>(&mut self, tests: impl FnOnce() -> T) -> MediaMockResult<T> {
        let mut first_error: Option<MediaMockError> = None;

        for (index, hook) in self.before.iter_mut().enumerate() {
            if let Err(e) = hook() {
                first_error = Some(MediaMockError::fixture(format!(
                    "group '{}' before_all hook #{index} failed: {e}",
                    self.name
                )));
                break;
            }
        }

        let output = if first_error.is_none() {
            tracing::debug!(group = %self.name, "running test group");
            Some(tests())
        } else {
            None
        };

        for (index, hook) in self.after.iter_mut().enumerate().rev() {
            if let Err(e) = hook() {
                if first_error.is_none() {
                    first_error = Some(MediaMockError::fixture(format!(
                        "group '{}' after_all hook #{index} failed: {e}",
                        self.name
                    )));
                }
            }
        }

        match (first_error, output) {
            (None, Some(output)) => {
                self.state = GroupState::TornDown;
                Ok(output)
            }
            (Some(err), _) => {
                self.state = GroupState::Failed;
                Err(err)
            }
            (None, None) => Err(MediaMockError::fixture("test group produced no result")),
        }
    }
}
