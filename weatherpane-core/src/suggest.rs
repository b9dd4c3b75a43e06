//! City autocomplete: the visible list, the debounced search scheduler and
//! the click-outside dismissal shared by all panels.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::{client::MAX_SUGGESTIONS, model::CitySuggestion, panel::PanelId};

/// Idle time after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shorter queries never reach the search endpoint.
pub const MIN_QUERY_LEN: usize = 2;

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}

/// The dismissible suggestion list under a panel's text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionList {
    items: Vec<CitySuggestion>,
    hidden: bool,
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self { items: Vec::new(), hidden: true }
    }
}

impl SuggestionList {
    /// Replace the contents. An empty result hides the list.
    pub fn show(&mut self, mut items: Vec<CitySuggestion>) {
        items.truncate(MAX_SUGGESTIONS);
        self.hidden = items.is_empty();
        self.items = items;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn is_open(&self) -> bool {
        !self.hidden
    }

    pub fn items(&self) -> &[CitySuggestion] {
        &self.items
    }

    /// Only entries of an open list can be picked.
    pub fn get(&self, index: usize) -> Option<&CitySuggestion> {
        if self.hidden { None } else { self.items.get(index) }
    }
}

/// Keyed debounce on the tokio runtime.
///
/// Scheduling under a key aborts whatever is still pending under it, so at
/// most one task per key survives each idle window. A task that resolves to
/// `None` sends nothing.
#[derive(Debug)]
pub struct SearchScheduler<K, E> {
    delay: Duration,
    pending: HashMap<K, AbortHandle>,
    tx: mpsc::UnboundedSender<E>,
}

impl<K, E> SearchScheduler<K, E>
where
    K: Eq + Hash,
    E: Send + 'static,
{
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<E>) -> Self {
        Self { delay, pending: HashMap::new(), tx }
    }

    pub fn schedule<F>(&mut self, key: K, task: F)
    where
        F: Future<Output = Option<E>> + Send + 'static,
    {
        self.cancel(&key);

        let deadline = tokio::time::Instant::now() + self.delay;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(event) = task.await {
                // Receiver gone means the dashboard was dropped.
                let _ = tx.send(event);
            }
        });

        self.pending.insert(key, handle.abort_handle());
    }

    pub fn cancel(&mut self, key: &K) {
        if let Some(handle) = self.pending.remove(key) {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.get(key).is_some_and(|h| !h.is_finished())
    }
}

impl<K, E> Drop for SearchScheduler<K, E> {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

/// Where a pointer went down: element ids from the outermost ancestor to
/// the element itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerTarget {
    ancestry: Vec<String>,
}

impl PointerTarget {
    pub fn new<I, S>(ancestry: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { ancestry: ancestry.into_iter().map(Into::into).collect() }
    }

    /// True when the element `id` is the target or one of its ancestors.
    pub fn is_within(&self, id: &str) -> bool {
        self.ancestry.iter().any(|a| a == id)
    }
}

/// One document-level click-outside handler for every open suggestion list.
#[derive(Debug, Default)]
pub struct DismissalCoordinator {
    open: BTreeSet<PanelId>,
}

impl DismissalCoordinator {
    pub fn set_open(&mut self, panel: PanelId, open: bool) {
        if open {
            self.open.insert(panel);
        } else {
            self.open.remove(&panel);
        }
    }

    pub fn is_open(&self, panel: PanelId) -> bool {
        self.open.contains(&panel)
    }

    /// Panels whose list must close because the pointer landed outside both
    /// their input field and their list. They are no longer tracked as open.
    pub fn pointer_down(&mut self, target: &PointerTarget) -> Vec<PanelId> {
        let dismissed: Vec<PanelId> = self
            .open
            .iter()
            .copied()
            .filter(|panel| {
                let binding = panel.binding();
                !target.is_within(binding.input) && !target.is_within(binding.suggestions)
            })
            .collect();

        for panel in &dismissed {
            self.open.remove(panel);
        }
        dismissed
    }
}
