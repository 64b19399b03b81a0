//! Listener Registry
//!
//! Two parallel lanes of listener entries, one per registration style. Each
//! entry remembers the query it belongs to and the match state it last saw.

use crate::listener::Listener;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Registration style of a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// `addListener` / `removeListener`
    Legacy,
    /// `addEventListener("change", ..)` / `removeEventListener`
    Modern,
}

impl Lane {
    /// Order lanes are visited in during dispatch
    pub const DISPATCH_ORDER: [Self; 2] = [Self::Modern, Self::Legacy];
}

/// One registered listener
#[derive(Debug, Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) id: u64,
    pub(crate) listener: Listener,
    pub(crate) query_id: u64,
    pub(crate) media: Rc<str>,
    pub(crate) last_known_match: bool,
}

/// Listener storage for a single mock installation
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    legacy: Vec<ListenerEntry>,
    modern: Vec<ListenerEntry>,
    next_entry_id: u64,
}

impl ListenerRegistry {
    fn lane(&self, lane: Lane) -> &Vec<ListenerEntry> {
        match lane {
            Lane::Legacy => &self.legacy,
            Lane::Modern => &self.modern,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut Vec<ListenerEntry> {
        match lane {
            Lane::Legacy => &mut self.legacy,
            Lane::Modern => &mut self.modern,
        }
    }

    /// Append an entry; duplicates are kept and notified independently
    pub(crate) fn attach(
        &mut self,
        lane: Lane,
        query_id: u64,
        media: Rc<str>,
        listener: Listener,
        matches: bool,
    ) {
        self.next_entry_id += 1;
        let id = self.next_entry_id;
        self.lane_mut(lane).push(ListenerEntry {
            id,
            listener,
            query_id,
            media,
            last_known_match: matches,
        });
    }

    /// Remove the first entry in `lane` wrapping `listener`
    ///
    /// Returns `false` when nothing matched.
    pub(crate) fn detach(&mut self, lane: Lane, listener: &Listener) -> bool {
        let entries = self.lane_mut(lane);
        match entries.iter().position(|entry| entry.listener.same(listener)) {
            Some(index) => {
                let _ = entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Ids of the entries in `lane`, in attachment order
    pub(crate) fn entry_ids(&self, lane: Lane) -> Vec<u64> {
        let mut ids = Vec::with_capacity(self.len(lane));
        self.for_each(lane, |entry| ids.push(entry.id));
        ids
    }

    /// Entry with `id`, if it is still attached
    pub(crate) fn entry_by_id_mut(&mut self, lane: Lane, id: u64) -> Option<&mut ListenerEntry> {
        self.lane_mut(lane).iter_mut().find(|entry| entry.id == id)
    }

    pub(crate) fn len(&self, lane: Lane) -> usize {
        self.lane(lane).len()
    }

    /// Visit the entries of `lane` in attachment order
    pub(crate) fn for_each(&self, lane: Lane, mut visit: impl FnMut(&ListenerEntry)) {
        for entry in self.lane(lane) {
            visit(entry);
        }
    }

    /// Entries across both lanes attached through one query object
    pub(crate) fn count_for_query(&self, query_id: u64) -> usize {
        let mut count = 0;
        for lane in Lane::DISPATCH_ORDER {
            self.for_each(lane, |entry| {
                if entry.query_id == query_id {
                    count += 1;
                }
            });
        }
        count
    }

    /// Listeners of both lanes in dispatch order
    pub(crate) fn listeners_in_dispatch_order(&self) -> Vec<Listener> {
        let mut listeners = Vec::with_capacity(self.legacy.len() + self.modern.len());
        for lane in Lane::DISPATCH_ORDER {
            self.for_each(lane, |entry| listeners.push(entry.listener.clone()));
        }
        listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(query: &str) -> Rc<str> {
        Rc::from(query)
    }

    #[test]
    fn test_attach_records_match_state() {
        let mut registry = ListenerRegistry::default();
        let listener = Listener::from_fn(|_| {});

        registry.attach(Lane::Legacy, 1, media("print"), listener, true);

        assert_eq!(registry.len(Lane::Legacy), 1);
        assert_eq!(registry.len(Lane::Modern), 0);
        let id = registry.entry_ids(Lane::Legacy)[0];
        assert!(registry.entry_by_id_mut(Lane::Legacy, id).unwrap().last_known_match);
    }

    #[test]
    fn test_detach_removes_first_match_only() {
        let mut registry = ListenerRegistry::default();
        let listener = Listener::from_fn(|_| {});

        registry.attach(Lane::Modern, 1, media("a"), listener.clone(), true);
        registry.attach(Lane::Modern, 2, media("b"), listener.clone(), false);

        assert!(registry.detach(Lane::Modern, &listener));
        assert_eq!(registry.len(Lane::Modern), 1);
        let id = registry.entry_ids(Lane::Modern)[0];
        assert_eq!(&*registry.entry_by_id_mut(Lane::Modern, id).unwrap().media, "b");
    }

    #[test]
    fn test_detach_unknown_is_noop() {
        let mut registry = ListenerRegistry::default();
        registry.attach(Lane::Legacy, 1, media("a"), Listener::from_fn(|_| {}), true);

        assert!(!registry.detach(Lane::Legacy, &Listener::from_fn(|_| {})));
        assert_eq!(registry.len(Lane::Legacy), 1);
    }

    #[test]
    fn test_detach_is_lane_scoped() {
        let mut registry = ListenerRegistry::default();
        let listener = Listener::from_fn(|_| {});
        registry.attach(Lane::Legacy, 1, media("a"), listener.clone(), true);

        assert!(!registry.detach(Lane::Modern, &listener));
        assert_eq!(registry.len(Lane::Legacy), 1);
    }

    #[test]
    fn test_entry_mutation_is_in_place() {
        let mut registry = ListenerRegistry::default();
        for id in 0..3 {
            registry.attach(Lane::Modern, id, media("a"), Listener::from_fn(|_| {}), false);
        }
        let ids = registry.entry_ids(Lane::Modern);

        registry.entry_by_id_mut(Lane::Modern, ids[1]).unwrap().last_known_match = true;

        let mut seen = Vec::new();
        registry.for_each(Lane::Modern, |entry| seen.push(entry.last_known_match));
        assert_eq!(seen, vec![false, true, false]);
    }

    #[test]
    fn test_entry_ids_survive_detach() {
        let mut registry = ListenerRegistry::default();
        let first = Listener::from_fn(|_| {});
        registry.attach(Lane::Modern, 1, media("a"), first.clone(), true);
        registry.attach(Lane::Modern, 1, media("b"), Listener::from_fn(|_| {}), true);
        let ids = registry.entry_ids(Lane::Modern);
        assert_ne!(ids[0], ids[1]);

        assert!(registry.detach(Lane::Modern, &first));

        assert!(registry.entry_by_id_mut(Lane::Modern, ids[0]).is_none());
        assert_eq!(&*registry.entry_by_id_mut(Lane::Modern, ids[1]).unwrap().media, "b");
        assert_eq!(registry.entry_ids(Lane::Modern), vec![ids[1]]);
    }

    #[test]
    fn test_for_each_in_attachment_order() {
        let mut registry = ListenerRegistry::default();
        for id in [3, 1, 2] {
            registry.attach(Lane::Legacy, id, media("a"), Listener::from_fn(|_| {}), true);
        }

        let mut seen = Vec::new();
        registry.for_each(Lane::Legacy, |entry| seen.push(entry.query_id));
        assert_eq!(seen, vec![3, 1, 2]);

        registry.for_each(Lane::Modern, |_| panic!("modern lane is empty"));
    }

    #[test]
    fn test_count_for_query_spans_lanes() {
        let mut registry = ListenerRegistry::default();
        registry.attach(Lane::Modern, 7, media("a"), Listener::from_fn(|_| {}), true);
        registry.attach(Lane::Legacy, 7, media("a"), Listener::from_fn(|_| {}), true);
        registry.attach(Lane::Legacy, 8, media("b"), Listener::from_fn(|_| {}), true);

        assert_eq!(registry.count_for_query(7), 2);
        assert_eq!(registry.count_for_query(8), 1);
        assert_eq!(registry.count_for_query(9), 0);
    }

    #[test]
    fn test_dispatch_order_is_modern_then_legacy() {
        let mut registry = ListenerRegistry::default();
        let legacy = Listener::from_fn(|_| {});
        let modern = Listener::from_fn(|_| {});
        registry.attach(Lane::Legacy, 1, media("a"), legacy.clone(), true);
        registry.attach(Lane::Modern, 1, media("a"), modern.clone(), true);

        let ordered = registry.listeners_in_dispatch_order();
        assert_eq!(ordered.len(), 2);
        assert!(ordered[0].same(&modern));
        assert!(ordered[1].same(&legacy));
    }
}
