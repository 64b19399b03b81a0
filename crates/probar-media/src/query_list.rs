//! Live Query Objects
//!
//! A [`MediaQueryList`] is the handle application code receives from
//! `matchMedia(query)`. Its `matches` is recomputed on every read, so a
//! viewport change made through the mock is visible on handles obtained
//! before the change.

use crate::evaluator::QueryEvaluator;
use crate::event::{MediaQueryListEvent, CHANGE_EVENT};
use crate::listener::Listener;
use crate::registry::Lane;
use crate::state::MediaContext;
use crate::viewport::ViewportDescription;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Live media query handle, contract-compatible with the platform's `MediaQueryList`
///
/// Clones share identity: listeners attached through one clone can be
/// detached through another.
#[derive(Clone)]
pub struct MediaQueryList {
    id: u64,
    media: Rc<str>,
    context: Rc<MediaContext>,
    onchange: Rc<RefCell<Option<Listener>>>,
}

impl fmt::Debug for MediaQueryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaQueryList")
            .field("media", &&*self.media)
            .field("matches", &self.matches())
            .finish()
    }
}

impl MediaQueryList {
    pub(crate) fn new(context: Rc<MediaContext>, media: &str) -> Self {
        Self {
            id: context.next_query_id(),
            media: Rc::from(media),
            context,
            onchange: Rc::new(RefCell::new(None)),
        }
    }

    /// Query string this handle was created for
    #[must_use]
    pub fn media(&self) -> &str {
        &self.media
    }

    /// Whether the query matches the current viewport (never cached)
    #[must_use]
    pub fn matches(&self) -> bool {
        self.context.evaluate(&self.media)
    }

    /// The `onchange` slot; the mock stores it but never invokes it
    #[must_use]
    pub fn onchange(&self) -> Option<Listener> {
        self.onchange.borrow().clone()
    }

    /// Assign the `onchange` slot
    pub fn set_onchange(&self, listener: Option<Listener>) {
        *self.onchange.borrow_mut() = listener;
    }

    /// Legacy registration; `None` is ignored
    pub fn add_listener(&self, listener: impl Into<Option<Listener>>) {
        if let Some(listener) = listener.into() {
            self.context
                .attach(Lane::Legacy, self.id, Rc::clone(&self.media), listener);
        }
    }

    /// Legacy deregistration; unknown listeners are ignored
    pub fn remove_listener(&self, listener: &Listener) {
        self.context.detach(Lane::Legacy, listener);
    }

    /// Modern registration; only the `"change"` event is supported
    pub fn add_event_listener(&self, event_type: &str, listener: impl Into<Option<Listener>>) {
        if event_type != CHANGE_EVENT {
            return;
        }
        if let Some(listener) = listener.into() {
            self.context
                .attach(Lane::Modern, self.id, Rc::clone(&self.media), listener);
        }
    }

    /// Modern deregistration; other event types and unknown listeners are ignored
    pub fn remove_event_listener(&self, event_type: &str, listener: &Listener) {
        if event_type == CHANGE_EVENT {
            self.context.detach(Lane::Modern, listener);
        }
    }

    /// Manually dispatch an event
    ///
    /// A `"change"` event is delivered to every registered listener, modern
    /// lane first, whatever the current match state. Always returns `true`.
    pub fn dispatch_event(&self, event: &MediaQueryListEvent) -> bool {
        if event.is_change() {
            let delivered = self.context.dispatch_to_all(event);
            tracing::debug!(media = %self.media, delivered, "manual change dispatch");
        }
        true
    }

    /// Number of listeners attached through this query object
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.context.listener_count_for_query(self.id)
    }

    /// Identity comparison
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.context, &other.context) && self.id == other.id
    }
}

/// A query-matching entry point (the platform's `window.matchMedia`)
pub trait MatchMedia {
    /// Create a live query object for `query`
    fn match_media(&self, query: &str) -> MediaQueryList;
}

/// Shared handle stored in a window's entry-point slot
pub type MatchMediaEntry = Rc<dyn MatchMedia>;

/// Reference equality of two entry points
#[must_use]
pub fn same_entry(a: &MatchMediaEntry, b: &MatchMediaEntry) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// Produces live query objects bound to one shared state
pub struct MediaQueryListFactory {
    context: Rc<MediaContext>,
}

impl fmt::Debug for MediaQueryListFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaQueryListFactory")
            .field("context", &self.context)
            .finish()
    }
}

impl MediaQueryListFactory {
    pub(crate) fn from_context(context: Rc<MediaContext>) -> Self {
        Self { context }
    }

    /// Platform-like entry point over a fixed viewport that never changes
    #[must_use]
    pub fn fixed(viewport: ViewportDescription) -> Self {
        Self::fixed_with_evaluator(viewport, Rc::new(crate::evaluator::CssMediaEvaluator::new()))
    }

    /// Fixed entry point with a custom evaluator
    #[must_use]
    pub fn fixed_with_evaluator(
        viewport: ViewportDescription,
        evaluator: Rc<dyn QueryEvaluator>,
    ) -> Self {
        Self::from_context(Rc::new(MediaContext::new(viewport, evaluator)))
    }
}

impl MatchMedia for MediaQueryListFactory {
    fn match_media(&self, query: &str) -> MediaQueryList {
        MediaQueryList::new(Rc::clone(&self.context), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::HandleEvent;
    use std::cell::Cell;

    fn factory(width: &str) -> MediaQueryListFactory {
        MediaQueryListFactory::fixed(ViewportDescription::new().width(width))
    }

    fn counter() -> (Rc<Cell<usize>>, Listener) {
        let count = Rc::new(Cell::new(0));
        let count_clone = Rc::clone(&count);
        let listener = Listener::from_fn(move |_| count_clone.set(count_clone.get() + 1));
        (count, listener)
    }

    #[test]
    fn test_matches_and_media() {
        let list = factory("320px").match_media("(max-width: 600px)");
        assert!(list.matches());
        assert_eq!(list.media(), "(max-width: 600px)");
        assert!(list.onchange().is_none());
    }

    #[test]
    fn test_add_listener_ignores_none() {
        let list = factory("320px").match_media("(max-width: 600px)");
        list.add_listener(None::<Listener>);
        assert_eq!(list.listener_count(), 0);

        let (_, listener) = counter();
        list.add_listener(listener);
        assert_eq!(list.listener_count(), 1);
    }

    #[test]
    fn test_add_event_listener_only_change() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (_, listener) = counter();

        list.add_event_listener("resize", listener.clone());
        assert_eq!(list.listener_count(), 0);

        list.add_event_listener("change", listener);
        assert_eq!(list.listener_count(), 1);
    }

    #[test]
    fn test_remove_event_listener_requires_change_type() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (_, listener) = counter();
        list.add_event_listener("change", listener.clone());

        list.remove_event_listener("click", &listener);
        assert_eq!(list.listener_count(), 1);

        list.remove_event_listener("change", &listener);
        assert_eq!(list.listener_count(), 0);
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (_, attached) = counter();
        let (_, stranger) = counter();
        list.add_listener(attached);

        list.remove_listener(&stranger);
        list.remove_event_listener("change", &stranger);
        assert_eq!(list.listener_count(), 1);
    }

    #[test]
    fn test_lanes_are_independent() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (_, listener) = counter();
        list.add_listener(listener.clone());

        list.remove_event_listener("change", &listener);
        assert_eq!(list.listener_count(), 1);

        list.remove_listener(&listener);
        assert_eq!(list.listener_count(), 0);
    }

    #[test]
    fn test_dispatch_event_change_reaches_all() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (legacy_count, legacy) = counter();
        let (modern_count, modern) = counter();
        list.add_listener(legacy);
        list.add_event_listener("change", modern);

        let event = MediaQueryListEvent::change(false, "(max-width: 600px)");
        assert!(list.dispatch_event(&event));
        assert_eq!(legacy_count.get(), 1);
        assert_eq!(modern_count.get(), 1);
    }

    #[test]
    fn test_dispatch_event_other_type_reaches_none() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (count, listener) = counter();
        list.add_event_listener("change", listener);

        assert!(list.dispatch_event(&MediaQueryListEvent::new("click", true, "")));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_dispatch_event_order_modern_first() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let order = Rc::new(RefCell::new(Vec::new()));

        let legacy_order = Rc::clone(&order);
        list.add_listener(Listener::from_fn(move |_| legacy_order.borrow_mut().push("legacy")));
        let modern_order = Rc::clone(&order);
        list.add_event_listener(
            "change",
            Listener::from_fn(move |_| modern_order.borrow_mut().push("modern")),
        );

        let _ = list.dispatch_event(&MediaQueryListEvent::change(true, list.media()));
        assert_eq!(*order.borrow(), vec!["modern", "legacy"]);
    }

    #[test]
    fn test_handler_object_listener() {
        struct Flag(Cell<bool>);
        impl HandleEvent for Flag {
            fn handle_event(&self, event: &MediaQueryListEvent) {
                self.0.set(event.matches);
            }
        }

        let list = factory("320px").match_media("(max-width: 600px)");
        let flag = Rc::new(Flag(Cell::new(false)));
        let listener = Listener::from_handler(Rc::clone(&flag));
        list.add_event_listener("change", listener.clone());

        let _ = list.dispatch_event(&MediaQueryListEvent::change(true, list.media()));
        assert!(flag.0.get());

        list.remove_event_listener("change", &Listener::from_handler(Rc::clone(&flag)));
        assert_eq!(list.listener_count(), 0);
    }

    #[test]
    fn test_onchange_is_stored_not_invoked() {
        let list = factory("320px").match_media("(max-width: 600px)");
        let (count, listener) = counter();
        list.set_onchange(Some(listener));

        assert!(list.onchange().is_some());
        let _ = list.dispatch_event(&MediaQueryListEvent::change(true, list.media()));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_identity() {
        let entry = factory("320px");
        let first = entry.match_media("print");
        let second = entry.match_media("print");

        assert!(first.same(&first.clone()));
        assert!(!first.same(&second));
    }

    #[test]
    fn test_same_entry() {
        let a: MatchMediaEntry = Rc::new(factory("1px"));
        let b: MatchMediaEntry = Rc::new(factory("1px"));
        assert!(same_entry(&a, &Rc::clone(&a)));
        assert!(!same_entry(&a, &b));
    }
}
