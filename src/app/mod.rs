//! Wires the modules together in dependency order and owns application
//! lifecycle: document shell -> router -> language -> loader -> navigation,
//! then content hydration, language restore, and the one-shot redirect for
//! unrecognized URLs.
use crate::core::config::SiteConfig;
use crate::core::constants::KEY_LAST_LANGUAGE;
use crate::core::error::Result;
use crate::dom::{parse, Document, ElementId};
use crate::i18n::LanguageManager;
use crate::nav::{KeyInput, NavigationUI};
use crate::page::{FragmentFetcher, PageLoader};
use crate::router::{HistoryBackend, Router, RouterEvent};
use crate::storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Minimal lifecycle seam for decorative collaborators (particle systems,
/// timelines, loading screens). The core never looks past it.
pub trait Lifecycle: Send + Sync {
    fn init(&self) -> Result<()> {
        Ok(())
    }
    fn destroy(&self) {}
}

pub struct Application {
    config: Arc<RwLock<SiteConfig>>,
    storage: Arc<dyn KeyValueStore>,
    history: Arc<dyn HistoryBackend>,
    document: Arc<RwLock<Document>>,
    router: Arc<Router>,
    language: Arc<LanguageManager>,
    loader: Arc<PageLoader>,
    nav: Arc<NavigationUI>,
    extras: RwLock<Vec<Box<dyn Lifecycle>>>,
    initialized: AtomicBool,
    revealed: AtomicBool,
}

impl Application {
    /// Constructs every module in dependency order and registers the
    /// cross-module observers. Content is not fetched until `initialize`.
    pub fn new(
        config: SiteConfig,
        history: Arc<dyn HistoryBackend>,
        storage: Arc<dyn KeyValueStore>,
        fetcher: Box<dyn FragmentFetcher>,
        shell_html: &str,
        initial_path: &str,
    ) -> Result<Self> {
        let config = Arc::new(RwLock::new(config));
        let document = Arc::new(RwLock::new(parse::parse_shell(shell_html)?));

        let router = Arc::new(Router::new(
            config.clone(),
            history.clone(),
            storage.as_ref(),
            initial_path,
        ));

        let language = Arc::new(LanguageManager::new(
            config.clone(),
            router.clone(),
            document.clone(),
        )?);
        let loader = Arc::new(PageLoader::new(
            config.clone(),
            router.clone(),
            language.clone(),
            document.clone(),
            fetcher,
        ));
        let nav = Arc::new(NavigationUI::new(
            config.clone(),
            router.clone(),
            document.clone(),
        )?);

        let language_observer = language.clone();
        router.add_observer(move |event| {
            if let RouterEvent::LanguageChange { new_lang, .. } = event {
                language_observer.handle_language_change(new_lang);
            }
            Ok(())
        });

        let nav_observer = nav.clone();
        router.add_observer(move |event| {
            if let RouterEvent::PageChange { new_page, .. } = event {
                nav_observer.handle_page_change(new_page);
            }
            Ok(())
        });

        Ok(Self {
            config,
            storage,
            history,
            document,
            router,
            language,
            loader,
            nav,
            extras: RwLock::new(Vec::new()),
            initialized: AtomicBool::new(false),
            revealed: AtomicBool::new(false),
        })
    }

    /// Hydrates all pages, restores the persisted language without adding a
    /// history stop, resolves any pending redirect, then reveals the UI.
    /// Safe to call once; repeat calls warn and return.
    pub async fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            log::warn!("Application already initialized");
            return Ok(());
        }

        self.loader.load_all_pages().await;

        self.restore_saved_language()?;
        self.language.update_page_texts();
        self.nav.update_active_states(&self.router.current_page());
        self.init_language_persistence();
        self.resolve_pending_redirect();

        for module in self.extras.read().unwrap().iter() {
            if let Err(e) = module.init() {
                log::error!("Collaborator init failed: {}", e);
            }
        }

        self.revealed.store(true, Ordering::SeqCst);
        log::info!(
            "Initial state: {}/{}",
            self.router.current_language(),
            self.router.current_page()
        );
        Ok(())
    }

    /// A previously chosen language overrides the URL-derived default,
    /// silently so the back button gains no extra stop.
    fn restore_saved_language(&self) -> Result<()> {
        let Some(saved) = self.storage.get(KEY_LAST_LANGUAGE) else {
            return Ok(());
        };
        if saved != self.router.current_language()
            && self.config.read().unwrap().is_valid_language(&saved)
        {
            self.router.change_language(&saved, false)?;
        }
        Ok(())
    }

    fn init_language_persistence(&self) {
        if let Err(e) = self
            .storage
            .set(KEY_LAST_LANGUAGE, &self.router.current_language())
        {
            log::warn!("Could not persist language: {}", e);
        }

        let storage = self.storage.clone();
        self.router.add_observer(move |event| {
            if let RouterEvent::LanguageChange { new_lang, .. } = event {
                storage.set(KEY_LAST_LANGUAGE, new_lang)?;
                log::debug!("Language saved: {}", new_lang);
            }
            Ok(())
        });
    }

    /// Consumes the router's redirect-pending flag with a single history
    /// replace to the canonical default URL. Replace, not push, so the dead
    /// URL never becomes a back-button stop, and the flag's one-shot
    /// semantics rule out loops.
    fn resolve_pending_redirect(&self) {
        if self.router.take_redirect_pending() {
            let url = self.router.canonical_default_url();
            log::warn!("Redirecting invalid URL to {}", url);
            self.history.replace(&self.router.current_state(), &url);
        }
    }

    // Programmatic navigation passthroughs

    pub fn navigate_to(&self, page: &str) -> Result<()> {
        self.router.navigate_to(page, true)
    }

    pub fn change_language(&self, lang: &str) -> Result<()> {
        self.router.change_language(lang, true)
    }

    pub fn toggle_language(&self) -> Result<()> {
        self.language.toggle_language()
    }

    pub async fn reload_page(&self, name: &str) -> Result<()> {
        self.loader.reload_page(name).await
    }

    // Input forwarding

    pub fn handle_click(&self, target: ElementId) -> Result<()> {
        self.nav.handle_click(target)
    }

    pub fn handle_key(&self, key: KeyInput) -> Result<()> {
        self.nav.handle_key(key)
    }

    pub fn handle_resize(&self, viewport_width: u32) {
        self.nav.handle_resize(viewport_width);
    }

    pub fn handle_history_entry(&self, entry: crate::router::HistoryEntry) -> Result<()> {
        self.router.handle_pop_state(entry.state, &entry.url)
    }

    // Module getters

    pub fn router(&self) -> Arc<Router> {
        self.router.clone()
    }

    pub fn language_manager(&self) -> Arc<LanguageManager> {
        self.language.clone()
    }

    pub fn page_loader(&self) -> Arc<PageLoader> {
        self.loader.clone()
    }

    pub fn navigation(&self) -> Arc<NavigationUI> {
        self.nav.clone()
    }

    pub fn document(&self) -> Arc<RwLock<Document>> {
        self.document.clone()
    }

    pub fn config(&self) -> Arc<RwLock<SiteConfig>> {
        self.config.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.load(Ordering::SeqCst)
    }

    // Decorative collaborators

    pub fn register_module(&self, module: Box<dyn Lifecycle>) {
        self.extras.write().unwrap().push(module);
    }

    /// Tears down collaborators in reverse registration order.
    pub fn shutdown(&self) {
        let mut extras = self.extras.write().unwrap();
        while let Some(module) = extras.pop() {
            module.destroy();
        }
        log::info!("Application shut down");
    }
}
