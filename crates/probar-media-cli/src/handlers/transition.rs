//! Transition command handler
//!
//! Installs a mock on a fresh DOM window, attaches one change listener per
//! query, moves the viewport from `--from` to `--to`, and reports what the
//! listeners received.

use super::resolve_viewport;
use crate::commands::TransitionArgs;
use crate::error::CliResult;
use jugar_probar_media::{
    DeviceCatalog, Listener, MatchMediaMock, MediaQueryList, ViewportDescription, Window,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// A change notification observed by a query's listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Query the listener was attached to
    pub query: String,
    /// `matches` carried by the event
    pub matches: bool,
}

/// Match state of one query before and after the change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTransition {
    /// Query string
    pub query: String,
    /// Match state against `from`
    pub before: bool,
    /// Match state against `to`
    pub after: bool,
}

impl QueryTransition {
    /// Whether the match state flipped
    #[must_use]
    pub const fn flipped(&self) -> bool {
        self.before != self.after
    }
}

/// Result of the transition command
#[derive(Debug, Clone, Serialize)]
pub struct TransitionReport {
    /// Starting viewport
    pub from: ViewportDescription,
    /// Target viewport
    pub to: ViewportDescription,
    /// Per-query states, in argument order
    pub queries: Vec<QueryTransition>,
    /// Notifications in delivery order
    pub notifications: Vec<Notification>,
}

impl TransitionReport {
    /// Number of notifications delivered
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.notifications.len()
    }
}

/// Resolve both viewports and run the transition
pub fn execute_transition(args: &TransitionArgs) -> CliResult<TransitionReport> {
    let catalog = DeviceCatalog::new();
    let from = resolve_viewport(&args.from, &catalog)?;
    let to = resolve_viewport(&args.to, &catalog)?;
    simulate(&args.queries, from, to)
}

/// Drive a mock from `from` to `to` and record every notification
pub fn simulate(
    queries: &[String],
    from: ViewportDescription,
    to: ViewportDescription,
) -> CliResult<TransitionReport> {
    let window = Rc::new(Window::dom());
    let mock = MatchMediaMock::new(Rc::clone(&window));
    mock.install()?;

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let lists = queries
        .iter()
        .map(|query| -> CliResult<MediaQueryList> {
            let list = window.match_media(query)?;
            let log = Rc::clone(&notifications);
            let media = query.clone();
            list.add_event_listener(
                "change",
                Listener::from_fn(move |event| {
                    log.borrow_mut().push(Notification {
                        query: media.clone(),
                        matches: event.matches,
                    });
                }),
            );
            Ok(list)
        })
        .collect::<CliResult<Vec<MediaQueryList>>>()?;

    let _ = mock.set(from.clone());
    let before: Vec<bool> = lists.iter().map(MediaQueryList::matches).collect();
    notifications.borrow_mut().clear();

    let delivered = mock.set(to.clone());
    tracing::debug!(delivered, "transition applied");

    let transitions = lists
        .iter()
        .zip(before)
        .map(|(list, before)| QueryTransition {
            query: list.media().to_string(),
            before,
            after: list.matches(),
        })
        .collect();
    mock.cleanup();

    let notifications = notifications.take();
    Ok(TransitionReport {
        from,
        to,
        queries: transitions,
        notifications,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn queries(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_phone_to_desktop() {
        let report = execute_transition(&TransitionArgs {
            queries: queries(&["(max-width: 600px)", "(min-width: 1024px)", "screen"]),
            from: "iPhone 14".to_string(),
            to: "Desktop 1080p".to_string(),
        })
        .unwrap();

        assert_eq!(report.delivered(), 2);
        assert_eq!(
            report.notifications,
            vec![
                Notification {
                    query: "(max-width: 600px)".to_string(),
                    matches: false,
                },
                Notification {
                    query: "(min-width: 1024px)".to_string(),
                    matches: true,
                },
            ]
        );
        assert!(!report.queries[2].flipped());
    }

    #[test]
    fn test_same_viewport_delivers_nothing() {
        let viewport = ViewportDescription::new().width("320px");
        let report = simulate(
            &queries(&["(max-width: 600px)"]),
            viewport.clone(),
            viewport,
        )
        .unwrap();

        assert_eq!(report.delivered(), 0);
        assert!(report.queries[0].before);
        assert!(report.queries[0].after);
    }

    #[test]
    fn test_duplicate_queries_each_notified() {
        let report = simulate(
            &queries(&["(max-width: 600px)", "(max-width: 600px)"]),
            ViewportDescription::new().width("320px"),
            ViewportDescription::new().width("1440px"),
        )
        .unwrap();

        assert_eq!(report.delivered(), 2);
    }

    #[test]
    fn test_unknown_source_fails() {
        let result = execute_transition(&TransitionArgs {
            queries: queries(&["print"]),
            from: "Nokia 3310".to_string(),
            to: "Pixel 7".to_string(),
        });
        assert!(result.is_err());
    }
}
