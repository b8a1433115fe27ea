// History backend seam. The browser's history stack is replaced by a trait
// so the router can be driven by an in-memory stack in tests and by whatever
// host environment embeds the shell.
use crate::router::RouteState;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Serialized route state; `None` for entries the router did not create
    /// (the very first load).
    pub state: Option<RouteState>,
    pub url: String,
}

pub trait HistoryBackend: Send + Sync {
    fn push(&self, state: &RouteState, url: &str);
    fn replace(&self, state: &RouteState, url: &str);
    fn current(&self) -> Option<HistoryEntry>;
}

/// In-memory history stack with browser push/replace/back/forward semantics:
/// pushing truncates the forward tail.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial_url: &str) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: vec![HistoryEntry {
                    state: None,
                    url: initial_url.to_string(),
                }],
                cursor: 0,
            }),
        }
    }

    /// Moves the cursor back one entry and returns it, like the browser's
    /// back button. The caller feeds the entry to `Router::handle_pop_state`.
    pub fn back(&self) -> Option<HistoryEntry> {
        let mut inner = self.inner.write().unwrap();
        if inner.cursor == 0 {
            return None;
        }
        inner.cursor -= 1;
        Some(inner.entries[inner.cursor].clone())
    }

    pub fn forward(&self) -> Option<HistoryEntry> {
        let mut inner = self.inner.write().unwrap();
        if inner.cursor + 1 >= inner.entries.len() {
            return None;
        }
        inner.cursor += 1;
        Some(inner.entries[inner.cursor].clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryBackend for MemoryHistory {
    fn push(&self, state: &RouteState, url: &str) {
        let mut inner = self.inner.write().unwrap();
        let cursor = inner.cursor;
        inner.entries.truncate(cursor + 1);
        inner.entries.push(HistoryEntry {
            state: Some(state.clone()),
            url: url.to_string(),
        });
        inner.cursor += 1;
    }

    fn replace(&self, state: &RouteState, url: &str) {
        let mut inner = self.inner.write().unwrap();
        let cursor = inner.cursor;
        inner.entries[cursor] = HistoryEntry {
            state: Some(state.clone()),
            url: url.to_string(),
        };
    }

    fn current(&self) -> Option<HistoryEntry> {
        let inner = self.inner.read().unwrap();
        inner.entries.get(inner.cursor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(lang: &str, page: &str) -> RouteState {
        RouteState {
            language: lang.into(),
            page: page.into(),
        }
    }

    #[test]
    fn push_truncates_forward_tail() {
        let history = MemoryHistory::new("/");
        history.push(&state("en", "about"), "/en/about");
        history.push(&state("en", "projects"), "/en/projects");
        assert_eq!(history.len(), 3);

        history.back().unwrap();
        history.push(&state("fr", "about"), "/fr/about");
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().unwrap().url, "/fr/about");
        assert!(history.forward().is_none());
    }

    #[test]
    fn replace_keeps_stack_depth() {
        let history = MemoryHistory::new("/");
        history.replace(&state("fr", "home"), "/fr/");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().url, "/fr/");
    }

    #[test]
    fn back_past_first_entry_is_none() {
        let history = MemoryHistory::new("/");
        assert!(history.back().is_none());
    }

    #[test]
    fn first_entry_has_no_saved_state() {
        let history = MemoryHistory::new("/en/about");
        assert_eq!(history.current().unwrap().state, None);
    }
}
