//! Fetches and hydrates each page's HTML fragment exactly once per session,
//! then keeps injected content in sync with language changes.
pub mod fetch;

pub use fetch::{DirFetcher, FragmentFetcher, HttpFetcher};

use crate::core::config::SiteConfig;
use crate::core::error::{AppError, Result};
use crate::dom::{parse, Document, Selector};
use crate::i18n::LanguageManager;
use crate::router::Router;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Post-load hook, run after every (re)load of its page. Callbacks must be
/// idempotent; they fire again on `reload_page`.
pub type PageCallback = Box<dyn Fn(&mut Document) + Send + Sync>;

pub struct PageLoader {
    config: Arc<RwLock<SiteConfig>>,
    router: Arc<Router>,
    language: Arc<LanguageManager>,
    document: Arc<RwLock<Document>>,
    fetcher: Box<dyn FragmentFetcher>,
    loaded: RwLock<HashSet<String>>,
    callbacks: RwLock<HashMap<String, PageCallback>>,
}

impl PageLoader {
    pub fn new(
        config: Arc<RwLock<SiteConfig>>,
        router: Arc<Router>,
        language: Arc<LanguageManager>,
        document: Arc<RwLock<Document>>,
        fetcher: Box<dyn FragmentFetcher>,
    ) -> Self {
        let loader = Self {
            config,
            router,
            language,
            document,
            fetcher,
            loaded: RwLock::new(HashSet::new()),
            callbacks: RwLock::new(HashMap::new()),
        };
        loader.register_default_callbacks();
        loader
    }

    /// The home fragment carries a call-to-action leading to the projects
    /// page. Re-marking the action attribute on every load replaces any
    /// previous wiring instead of stacking it.
    fn register_default_callbacks(&self) {
        self.add_page_callback(
            "home",
            Box::new(|doc: &mut Document| {
                if let Ok(selector) = Selector::parse(".cta-button") {
                    if let Some(id) = doc.select(&selector) {
                        doc.set_attr(id, "data-action", "navigate:projects");
                    }
                }
            }),
        );
    }

    /// Fetches every configured page concurrently. A single page's failure
    /// is logged and never aborts the others.
    pub async fn load_all_pages(&self) {
        let pages: Vec<String> = self.config.read().unwrap().valid_pages().to_vec();
        log::info!("Loading {} page fragments", pages.len());

        let loads = pages.iter().map(|page| self.load_page_content(page));
        for (page, result) in pages.iter().zip(futures::future::join_all(loads).await) {
            if let Err(e) = result {
                log::error!("Loading page '{}' failed: {}", page, e);
            }
        }
    }

    /// No-op when the page is already marked loaded. On failure the
    /// placeholder keeps its prior content.
    pub async fn load_page_content(&self, name: &str) -> Result<()> {
        if self.loaded.read().unwrap().contains(name) {
            log::debug!("Page '{}' already loaded", name);
            return Ok(());
        }

        let base = self.router.base_path();
        let path = format!("{}/{}.html", base, name);
        let html = self.fetcher.fetch(&path).await?;

        {
            let mut doc = self.document.write().unwrap();
            let target = doc.get_element_by_id(name).ok_or_else(|| {
                AppError::Route(format!("no placeholder element for page '{}'", name))
            })?;
            parse::inject_fragment(&mut doc, target, &html)?;
        }
        self.loaded.write().unwrap().insert(name.to_string());

        // Freshly injected markup still carries its authored language.
        self.language.update_page_texts();

        if let Some(callback) = self.callbacks.read().unwrap().get(name) {
            let mut doc = self.document.write().unwrap();
            callback(&mut doc);
        }

        log::debug!("Page '{}' loaded", name);
        Ok(())
    }

    /// Clears the loaded marker and hydrates again, for content refresh
    /// without a full reload.
    pub async fn reload_page(&self, name: &str) -> Result<()> {
        self.loaded.write().unwrap().remove(name);
        self.load_page_content(name).await
    }

    pub async fn preload_page(&self, name: &str) -> Result<()> {
        self.load_page_content(name).await
    }

    pub fn add_page_callback(&self, name: &str, callback: PageCallback) {
        self.callbacks
            .write()
            .unwrap()
            .insert(name.to_string(), callback);
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.read().unwrap().contains(name)
    }
}
