//! Shared state of one mock installation and the diff-and-dispatch pass.
//!
//! Every live query object and the controller hold the same `Rc<MediaContext>`.
//! No `RefCell` borrow is held while a listener runs, so listeners may attach,
//! detach, read `matches` or call `set` again from inside a notification.

use crate::evaluator::QueryEvaluator;
use crate::event::MediaQueryListEvent;
use crate::listener::Listener;
use crate::registry::{Lane, ListenerRegistry};
use crate::viewport::ViewportDescription;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
pub(crate) struct MediaState {
    pub(crate) viewport: ViewportDescription,
    pub(crate) registry: ListenerRegistry,
    next_query_id: u64,
}

pub(crate) struct MediaContext {
    state: RefCell<MediaState>,
    evaluator: Rc<dyn QueryEvaluator>,
}

impl fmt::Debug for MediaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MediaContext")
            .field("viewport", &state.viewport)
            .field("legacy_listeners", &state.registry.len(Lane::Legacy))
            .field("modern_listeners", &state.registry.len(Lane::Modern))
            .finish()
    }
}

impl MediaContext {
    pub(crate) fn new(viewport: ViewportDescription, evaluator: Rc<dyn QueryEvaluator>) -> Self {
        Self {
            state: RefCell::new(MediaState {
                viewport,
                ..MediaState::default()
            }),
            evaluator,
        }
    }

    pub(crate) fn evaluator(&self) -> Rc<dyn QueryEvaluator> {
        Rc::clone(&self.evaluator)
    }

    pub(crate) fn next_query_id(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_query_id += 1;
        state.next_query_id
    }

    /// Evaluate `media` against the current viewport
    pub(crate) fn evaluate(&self, media: &str) -> bool {
        let state = self.state.borrow();
        self.evaluator.matches(media, &state.viewport)
    }

    pub(crate) fn viewport(&self) -> ViewportDescription {
        self.state.borrow().viewport.clone()
    }

    pub(crate) fn replace_viewport(&self, viewport: ViewportDescription) {
        self.state.borrow_mut().viewport = viewport;
    }

    pub(crate) fn listener_count(&self, lane: Lane) -> usize {
        self.state.borrow().registry.len(lane)
    }

    pub(crate) fn listener_count_for_query(&self, query_id: u64) -> usize {
        self.state.borrow().registry.count_for_query(query_id)
    }

    pub(crate) fn attach(&self, lane: Lane, query_id: u64, media: Rc<str>, listener: Listener) {
        let matches = self.evaluate(&media);
        tracing::trace!(?lane, media = &*media, matches, "listener attached");
        self.state
            .borrow_mut()
            .registry
            .attach(lane, query_id, media, listener, matches);
    }

    pub(crate) fn detach(&self, lane: Lane, listener: &Listener) {
        let removed = self.state.borrow_mut().registry.detach(lane, listener);
        tracing::trace!(?lane, removed, "listener detach");
    }

    /// Notify every listener whose match state flipped; returns the number notified
    pub(crate) fn notify_transitions(&self) -> usize {
        Lane::DISPATCH_ORDER
            .iter()
            .map(|lane| self.notify_lane(*lane))
            .sum()
    }

    fn notify_lane(&self, lane: Lane) -> usize {
        // Entries appended during this pass are not visited; entries detached
        // during it are skipped.
        let ids = self.state.borrow().registry.entry_ids(lane);
        let mut delivered = 0;

        for id in ids {
            let pending = {
                let mut state = self.state.borrow_mut();
                let MediaState {
                    viewport, registry, ..
                } = &mut *state;
                let Some(entry) = registry.entry_by_id_mut(lane, id) else {
                    continue;
                };
                let current = self.evaluator.matches(&entry.media, viewport);
                if current == entry.last_known_match {
                    None
                } else {
                    entry.last_known_match = current;
                    Some((
                        entry.listener.clone(),
                        MediaQueryListEvent::change(current, &*entry.media),
                    ))
                }
            };

            if let Some((listener, event)) = pending {
                tracing::debug!(?lane, media = %event.media, matches = event.matches, "change dispatched");
                listener.invoke(&event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Deliver `event` to every registered listener, modern lane first
    pub(crate) fn dispatch_to_all(&self, event: &MediaQueryListEvent) -> usize {
        let listeners = self.state.borrow().registry.listeners_in_dispatch_order();
        for listener in &listeners {
            listener.invoke(event);
        }
        listeners.len()
    }
}
