//! Media query listeners.
//!
//! The platform accepts either a plain callback or an object with a
//! `handleEvent` method. Here that choice is made once, when the listener is
//! built, and dispatch branches on the variant.

use crate::event::MediaQueryListEvent;
use std::fmt;
use std::rc::Rc;

/// Object-style listener (the platform's `{ handleEvent }` shape)
pub trait HandleEvent {
    /// Handle a dispatched event
    fn handle_event(&self, event: &MediaQueryListEvent);
}

/// A listener registered on a live query object
///
/// Cloning is cheap and preserves identity: clones compare equal under
/// [`Listener::same`] and can be used to detach the original.
#[derive(Clone)]
pub enum Listener {
    /// Plain callback
    Callable(Rc<dyn Fn(&MediaQueryListEvent)>),
    /// Handler object
    Handler(Rc<dyn HandleEvent>),
}

impl Listener {
    /// Build a callback listener
    #[must_use]
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(&MediaQueryListEvent) + 'static,
    {
        Self::Callable(Rc::new(callback))
    }

    /// Build a handler-object listener
    #[must_use]
    pub fn from_handler<H>(handler: Rc<H>) -> Self
    where
        H: HandleEvent + 'static,
    {
        Self::Handler(handler)
    }

    /// Deliver an event to the listener
    pub fn invoke(&self, event: &MediaQueryListEvent) {
        match self {
            Self::Callable(callback) => callback(event),
            Self::Handler(handler) => handler.handle_event(event),
        }
    }

    /// Identity comparison: true when both wrap the same allocation
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }

    /// Check if this is a handler object
    #[must_use]
    pub const fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }

    fn identity(&self) -> *const () {
        match self {
            Self::Callable(callback) => Rc::as_ptr(callback).cast::<()>(),
            Self::Handler(handler) => Rc::as_ptr(handler).cast::<()>(),
        }
    }
}

impl<H: HandleEvent + 'static> From<Rc<H>> for Listener {
    fn from(handler: Rc<H>) -> Self {
        Self::from_handler(handler)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_handler() { "Handler" } else { "Callable" };
        f.debug_tuple(kind).field(&self.identity()).finish()
    }
}
