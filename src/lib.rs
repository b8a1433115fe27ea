// Module definitions
pub mod app;
pub mod core;
pub mod dom;
pub mod i18n;
pub mod nav;
pub mod page;
pub mod router;
pub mod storage;

// Essential re-exports
pub use app::{Application, Lifecycle};
pub use crate::core::config::SiteConfig;
pub use crate::core::error::{AppError, Result};
pub use dom::{Document, ElementId, Selector};
pub use i18n::LanguageManager;
pub use nav::{KeyInput, NavigationUI};
pub use page::{DirFetcher, FragmentFetcher, HttpFetcher, PageLoader};
pub use router::{
    HistoryBackend, HistoryEntry, MemoryHistory, ObserverId, RouteState, Router, RouterEvent,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};

use std::path::Path;
use std::sync::Arc;

/// Builds and initializes the shell for the driver binary: config from disk,
/// shell and fragments from the content directory (or an HTTP origin when
/// configured), state in `.folio/state.json`.
pub async fn run(initial_path: &str) -> Result<Application> {
    let config = SiteConfig::load().await?;

    let shell_path = Path::new(&config.content_dir).join(&config.shell_file);
    let shell = tokio::fs::read_to_string(&shell_path)
        .await
        .map_err(AppError::Io)?;

    let fetcher: Box<dyn FragmentFetcher> = match &config.content_origin {
        Some(origin) => Box::new(HttpFetcher::new(origin)),
        None => Box::new(DirFetcher::new(&config.content_dir)),
    };

    let history = Arc::new(MemoryHistory::new(initial_path));
    let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(".folio/state.json")?);

    let application = Application::new(config, history, storage, fetcher, &shell, initial_path)?;
    application.initialize().await?;
    Ok(application)
}
