// End-to-end scenarios through the full application: shell parsing, routing,
// hydration, localization, and navigation state.
use folio_shell::{
    Application, DirFetcher, HistoryBackend, KeyInput, KeyValueStore, MemoryHistory, MemoryStore,
    Selector, SiteConfig,
};
use std::sync::Arc;
use tempfile::TempDir;

const SHELL: &str = r#"<html><body>
    <nav id="nav">
        <div class="logo">KB</div>
        <a class="nav-link" data-page="home" data-en="Home" data-fr="Accueil">Home</a>
        <a class="nav-link" data-page="projects" data-en="Projects" data-fr="Projets">Projects</a>
        <a class="nav-link" data-page="about" data-en="About" data-fr="A propos">About</a>
        <a class="nav-link" data-page="contact" data-en="Contact" data-fr="Contact">Contact</a>
        <button id="langToggle">FR</button>
        <div id="hamburger"></div>
    </nav>
    <div id="mobileMenuOverlay">
        <a class="mobile-nav-link" data-page="home">Home</a>
        <a class="mobile-nav-link" data-page="projects">Projects</a>
        <a class="mobile-nav-link" data-page="about">About</a>
        <a class="mobile-nav-link" data-page="contact">Contact</a>
        <button id="mobileLangToggle">FR</button>
    </div>
    <main>
        <section id="home" class="page"></section>
        <section id="projects" class="page"></section>
        <section id="about" class="page"></section>
        <section id="contact" class="page"></section>
    </main>
</body></html>"#;

fn write_fragments(dir: &TempDir) {
    for page in ["home", "projects", "about", "contact"] {
        let html = format!(
            r#"<h2 data-en="{0} in English" data-fr="{0} en francais">{0} in English</h2>
               <a class="cta-button" data-en="See my work" data-fr="Voir mon travail">See my work</a>"#,
            page
        );
        std::fs::write(dir.path().join(format!("{}.html", page)), html).unwrap();
    }
}

async fn app_at(path: &str, storage: Arc<dyn KeyValueStore>) -> (Application, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    write_fragments(&dir);
    let app = Application::new(
        SiteConfig::default(),
        Arc::new(MemoryHistory::new(path)),
        storage,
        Box::new(DirFetcher::new(dir.path())),
        SHELL,
        path,
    )
    .unwrap();
    app.initialize().await.unwrap();
    (app, dir)
}

#[tokio::test]
async fn french_projects_url_localizes_and_activates_everything() {
    let (app, _dir) = app_at("/fr/projects", Arc::new(MemoryStore::new())).await;
    let router = app.router();

    assert_eq!(router.current_language(), "fr");
    assert_eq!(router.current_page(), "projects");

    let doc = app.document();
    let doc = doc.read().unwrap();

    // One active element per surface, all pointing at projects.
    for selector in [".nav-link.active", ".mobile-nav-link.active"] {
        let matches = doc.select_all(&Selector::parse(selector).unwrap());
        assert_eq!(matches.len(), 1, "selector {}", selector);
        assert_eq!(
            doc.element(matches[0]).attr("data-page"),
            Some("projects"),
            "selector {}",
            selector
        );
    }
    let sections = doc.select_all(&Selector::parse(".page.active").unwrap());
    assert_eq!(sections.len(), 1);
    assert_eq!(doc.element(sections[0]).id(), Some("projects"));

    // Every element carrying a data-fr attribute renders its French text.
    for id in doc.select_all(&Selector::parse("[data-fr]").unwrap()) {
        let el = doc.element(id);
        assert_eq!(el.text(), el.attr("data-fr").unwrap());
    }
}

#[tokio::test]
async fn bogus_url_redirects_once_to_root() {
    let dir = tempfile::tempdir().unwrap();
    write_fragments(&dir);
    let history = Arc::new(MemoryHistory::new("/bogus/xyz"));
    let app = Application::new(
        SiteConfig::default(),
        history.clone(),
        Arc::new(MemoryStore::new()),
        Box::new(DirFetcher::new(dir.path())),
        SHELL,
        "/bogus/xyz",
    )
    .unwrap();
    app.initialize().await.unwrap();

    let router = app.router();
    assert_eq!(router.current_language(), "en");
    assert_eq!(router.current_page(), "home");

    // The hard redirect replaced the invalid entry; no extra history stop.
    assert_eq!(history.len(), 1);
    assert_eq!(history.current().unwrap().url, "/");
}

#[tokio::test]
async fn language_toggle_rebuilds_url_and_pushes_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    write_fragments(&dir);
    let history = Arc::new(MemoryHistory::new("/"));
    let app = Application::new(
        SiteConfig::default(),
        history.clone(),
        Arc::new(MemoryStore::new()),
        Box::new(DirFetcher::new(dir.path())),
        SHELL,
        "/",
    )
    .unwrap();
    app.initialize().await.unwrap();
    let before = history.len();

    app.toggle_language().unwrap();

    let router = app.router();
    assert_eq!(router.current_language(), "fr");
    assert_eq!(router.current_page(), "home");
    assert_eq!(history.len(), before + 1);
    assert_eq!(history.current().unwrap().url, "/fr/");

    // The toggle labels now offer the way back.
    let doc = app.document();
    let doc = doc.read().unwrap();
    let toggle = doc.get_element_by_id("langToggle").unwrap();
    assert_eq!(doc.element(toggle).text(), "EN");
}

#[tokio::test]
async fn clicking_the_hydrated_call_to_action_navigates_to_projects() {
    let (app, _dir) = app_at("/", Arc::new(MemoryStore::new())).await;

    let cta = {
        let doc = app.document();
        let doc = doc.read().unwrap();
        doc.select(&Selector::parse(".cta-button").unwrap()).unwrap()
    };
    app.handle_click(cta).unwrap();

    assert_eq!(app.router().current_page(), "projects");
}

#[tokio::test]
async fn keyboard_shortcuts_drive_navigation() {
    let (app, _dir) = app_at("/", Arc::new(MemoryStore::new())).await;

    app.handle_key(KeyInput::Digit(3)).unwrap();
    assert_eq!(app.router().current_page(), "about");

    let doc = app.document();
    let doc = doc.read().unwrap();
    let sections = doc.select_all(&Selector::parse(".page.active").unwrap());
    assert_eq!(doc.element(sections[0]).id(), Some("about"));
}

#[tokio::test]
async fn saved_language_overrides_url_default_silently() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set("last-language", "fr").unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_fragments(&dir);
    let history = Arc::new(MemoryHistory::new("/"));
    let app = Application::new(
        SiteConfig::default(),
        history.clone(),
        storage,
        Box::new(DirFetcher::new(dir.path())),
        SHELL,
        "/",
    )
    .unwrap();
    app.initialize().await.unwrap();

    assert_eq!(app.router().current_language(), "fr");
    // Silent restore: no new history stop for the back button.
    assert_eq!(history.len(), 1);

    let doc = app.document();
    let doc = doc.read().unwrap();
    let home_link = doc
        .select(&Selector::parse(".nav-link[data-page=home]").unwrap())
        .unwrap();
    assert_eq!(doc.element(home_link).text(), "Accueil");
}

#[tokio::test]
async fn language_changes_are_persisted_for_the_next_session() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let (app, _dir) = app_at("/", storage.clone()).await;

    assert_eq!(storage.get("last-language"), Some("en".into()));
    app.change_language("fr").unwrap();
    assert_eq!(storage.get("last-language"), Some("fr".into()));
}
