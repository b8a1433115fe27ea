//! URL <-> route state machine: the sole writer of the current route and of
//! history entries, and the notification hub every other module subscribes
//! to.
pub mod history;

pub use history::{HistoryBackend, HistoryEntry, MemoryHistory};

use crate::core::config::SiteConfig;
use crate::core::constants::KEY_REDIRECT_PATH;
use crate::core::error::{AppError, Result};
use crate::storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Current language and page, the router's ground truth. Both fields are
/// always members of the configured valid sets; unrecognized URL segments
/// are normalized to defaults before a state is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    pub language: String,
    pub page: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    PageChange { old_page: String, new_page: String },
    LanguageChange { old_lang: String, new_lang: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

type Observer = Box<dyn Fn(&RouterEvent) -> Result<()> + Send + Sync>;

pub struct Router {
    config: Arc<RwLock<SiteConfig>>,
    history: Arc<dyn HistoryBackend>,
    state: RwLock<RouteState>,
    base_path: String,
    observers: RwLock<Vec<(u64, Observer)>>,
    next_observer_id: AtomicU64,
    redirect_pending: AtomicBool,
}

impl Router {
    /// Builds the router from the initial URL path. A `redirect-path` left in
    /// storage by a 404 handler takes precedence over `initial_path` and is
    /// consumed here. An unrecognized path degrades to the configured
    /// defaults and arms the redirect-pending flag; it is never an error.
    pub fn new(
        config: Arc<RwLock<SiteConfig>>,
        history: Arc<dyn HistoryBackend>,
        storage: &dyn KeyValueStore,
        initial_path: &str,
    ) -> Self {
        let path = match storage.get(KEY_REDIRECT_PATH) {
            Some(saved) => {
                if let Err(e) = storage.remove(KEY_REDIRECT_PATH) {
                    log::warn!("Could not clear redirect path: {}", e);
                }
                saved
            }
            None => initial_path.to_string(),
        };

        let base_path = Self::detect_base_path(&config, &path);
        let router = Self {
            config,
            history,
            state: RwLock::new(RouteState {
                language: String::new(),
                page: String::new(),
            }),
            base_path,
            observers: RwLock::new(Vec::new()),
            next_observer_id: AtomicU64::new(1),
            redirect_pending: AtomicBool::new(false),
        };

        let (state, valid) = router.parse_path(&path);
        if !valid {
            log::warn!("Invalid path '{}', falling back to defaults", path);
            router.redirect_pending.store(true, Ordering::SeqCst);
        }
        *router.state.write().unwrap() = state;
        router
    }

    /// The leading segment counts as a deployment base path only when it is
    /// not itself a recognized language or page token, so the same routing
    /// works at a domain root and under a sub-path. A further restriction
    /// keeps garbage URLs out of the base: the segment only qualifies when
    /// the remainder of the path parses to a valid route, so `/bogus/xyz`
    /// degrades to defaults at the domain root instead of adopting `/bogus`.
    fn detect_base_path(config: &Arc<RwLock<SiteConfig>>, path: &str) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(first) = segments.first() else {
            return String::new();
        };
        let config = config.read().unwrap();
        if config.is_valid_language(first) || config.is_valid_page(first) {
            return String::new();
        }
        if match_segments(&config, &segments[1..]).is_some() {
            format!("/{}", first)
        } else {
            String::new()
        }
    }

    /// Parses a URL path into a route state plus a validity flag. Shapes:
    /// zero segments, a lone language, a lone page, or language/page. Any
    /// other shape yields the defaults and `false`.
    pub fn parse_path(&self, path: &str) -> (RouteState, bool) {
        let path = path
            .strip_prefix(self.base_path.as_str())
            .filter(|_| !self.base_path.is_empty())
            .unwrap_or(path);

        let config = self.config.read().unwrap();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match match_segments(&config, &segments) {
            Some(state) => (state, true),
            None => (
                RouteState {
                    language: config.default_lang.clone(),
                    page: config.default_page.clone(),
                },
                false,
            ),
        }
    }

    /// Inverse of `parse_path`, with the collapse asymmetry the parser
    /// expects on reload: the default pair maps to the site root and the
    /// default page alone maps to `/<lang>/`.
    pub fn build_url(&self, language: &str, page: &str) -> String {
        let config = self.config.read().unwrap();
        if language == config.default_lang && page == config.default_page {
            format!("{}/", self.base_path)
        } else if page == config.default_page {
            format!("{}/{}/", self.base_path, language)
        } else {
            format!("{}/{}/{}", self.base_path, language, page)
        }
    }

    pub fn canonical_default_url(&self) -> String {
        let (lang, page) = {
            let config = self.config.read().unwrap();
            (config.default_lang.clone(), config.default_page.clone())
        };
        self.build_url(&lang, &page)
    }

    /// Sets the current page and fans the change out to subscribers. With
    /// `update_url` a new history entry is pushed; without, only in-memory
    /// state and subscribers see the change (silent navigation).
    pub fn navigate_to(&self, page: &str, update_url: bool) -> Result<()> {
        if !self.config.read().unwrap().is_valid_page(page) {
            return Err(AppError::Validation(format!("unknown page '{}'", page)));
        }

        let (old_page, state) = {
            let mut state = self.state.write().unwrap();
            let old = std::mem::replace(&mut state.page, page.to_string());
            (old, state.clone())
        };

        if update_url {
            let url = self.build_url(&state.language, &state.page);
            self.history.push(&state, &url);
        }

        self.notify(&RouterEvent::PageChange {
            old_page,
            new_page: page.to_string(),
        });
        Ok(())
    }

    /// Sets the current language; otherwise identical to `navigate_to`.
    pub fn change_language(&self, language: &str, update_url: bool) -> Result<()> {
        if !self.config.read().unwrap().is_valid_language(language) {
            return Err(AppError::Validation(format!(
                "unknown language '{}'",
                language
            )));
        }

        let (old_lang, state) = {
            let mut state = self.state.write().unwrap();
            let old = std::mem::replace(&mut state.language, language.to_string());
            (old, state.clone())
        };

        if update_url {
            let url = self.build_url(&state.language, &state.page);
            self.history.push(&state, &url);
        }

        self.notify(&RouterEvent::LanguageChange {
            old_lang,
            new_lang: language.to_string(),
        });
        Ok(())
    }

    /// Back/forward restoration. An entry carrying saved state is replayed
    /// through the ordinary setters in silent mode; an entry without state
    /// (the very first load) falls back to re-parsing the URL.
    pub fn handle_pop_state(&self, saved: Option<RouteState>, path: &str) -> Result<()> {
        match saved {
            Some(target) => {
                if target.language != self.current_language() {
                    self.change_language(&target.language, false)?;
                }
                if target.page != self.current_page() {
                    self.navigate_to(&target.page, false)?;
                }
            }
            None => {
                let (state, _) = self.parse_path(path);
                self.change_language(&state.language, false)?;
                self.navigate_to(&state.page, false)?;
            }
        }
        Ok(())
    }

    // Observer fan-out

    pub fn add_observer<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&RouterEvent) -> Result<()> + Send + Sync + 'static,
    {
        let id = self.next_observer_id.fetch_add(1, Ordering::SeqCst);
        self.observers
            .write()
            .unwrap()
            .push((id, Box::new(callback)));
        ObserverId(id)
    }

    pub fn remove_observer(&self, id: ObserverId) {
        self.observers.write().unwrap().retain(|(i, _)| *i != id.0);
    }

    /// Synchronous, insertion-order delivery. A failing subscriber is logged
    /// and skipped, never allowed to block the rest. Callbacks must not
    /// navigate or (un)subscribe from inside a notification.
    fn notify(&self, event: &RouterEvent) {
        let observers = self.observers.read().unwrap();
        for (id, callback) in observers.iter() {
            if let Err(e) = callback(event) {
                log::error!("Router observer {} failed: {}", id, e);
            }
        }
    }

    // Getters

    pub fn current_language(&self) -> String {
        self.state.read().unwrap().language.clone()
    }

    pub fn current_page(&self) -> String {
        self.state.read().unwrap().page.clone()
    }

    pub fn current_state(&self) -> RouteState {
        self.state.read().unwrap().clone()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Consumes the pending-redirect flag. The orchestrator performs the
    /// actual redirect, keeping the router free of navigation side effects.
    pub fn take_redirect_pending(&self) -> bool {
        self.redirect_pending.swap(false, Ordering::SeqCst)
    }

    // Config passthroughs for late-registered pages and languages.

    pub fn add_valid_page(&self, name: &str) {
        self.config.write().unwrap().add_valid_page(name);
    }

    pub fn add_valid_language(&self, code: &str) {
        self.config.write().unwrap().add_valid_language(code);
    }
}

/// The 0/1/2-segment route grammar. `None` means the shape is not
/// recognized; callers decide how to degrade.
fn match_segments(config: &SiteConfig, segments: &[&str]) -> Option<RouteState> {
    let mut language = config.default_lang.clone();
    let mut page = config.default_page.clone();

    match segments {
        [] => {}
        [single] => {
            if config.is_valid_language(single) {
                language = (*single).to_string();
            } else if config.is_valid_page(single) {
                page = (*single).to_string();
            } else {
                return None;
            }
        }
        [first, second] => {
            if config.is_valid_language(first) && config.is_valid_page(second) {
                language = (*first).to_string();
                page = (*second).to_string();
            } else {
                return None;
            }
        }
        _ => return None,
    }

    Some(RouteState { language, page })
}
