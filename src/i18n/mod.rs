//! Renders the current language onto the document and owns the language
//! toggle controls. The document itself is the durable record of displayed
//! text: every element carrying a `data-<lang>` attribute is a localizable
//! node whose text (or `src`, for images) tracks the active language.
use crate::core::config::SiteConfig;
use crate::core::error::Result;
use crate::dom::{Document, ElementId, Selector};
use crate::router::Router;
use std::sync::{Arc, RwLock};

pub struct LanguageManager {
    config: Arc<RwLock<SiteConfig>>,
    router: Arc<Router>,
    document: Arc<RwLock<Document>>,
    current_lang: RwLock<String>,
    lang_toggle: Selector,
    mobile_lang_toggle: Selector,
}

impl LanguageManager {
    /// Reads the router's language and immediately synchronizes the toggle
    /// labels and every localizable node.
    pub fn new(
        config: Arc<RwLock<SiteConfig>>,
        router: Arc<Router>,
        document: Arc<RwLock<Document>>,
    ) -> Result<Self> {
        let (lang_toggle, mobile_lang_toggle) = {
            let cfg = config.read().unwrap();
            (
                Selector::parse(&cfg.selectors.lang_toggle)?,
                Selector::parse(&cfg.selectors.mobile_lang_toggle)?,
            )
        };

        let manager = Self {
            current_lang: RwLock::new(router.current_language()),
            config,
            router,
            document,
            lang_toggle,
            mobile_lang_toggle,
        };
        manager.update_toggle_buttons();
        manager.update_page_texts();
        Ok(manager)
    }

    pub fn current_language(&self) -> String {
        self.current_lang.read().unwrap().clone()
    }

    /// Flips between the two supported languages. The router decides whether
    /// the change reaches the URL and history; this component never does.
    pub fn toggle_language(&self) -> Result<()> {
        let next = self.other_language(&self.router.current_language());
        self.router.change_language(&next, true)
    }

    fn other_language(&self, current: &str) -> String {
        let config = self.config.read().unwrap();
        let langs = config.valid_languages();
        if langs.first().map(String::as_str) == Some(current) {
            langs.get(1).cloned().unwrap_or_else(|| current.to_string())
        } else {
            langs.first().cloned().unwrap_or_else(|| current.to_string())
        }
    }

    /// Called from the router's languageChange observer.
    pub fn handle_language_change(&self, new_lang: &str) {
        *self.current_lang.write().unwrap() = new_lang.to_string();
        self.update_toggle_buttons();
        self.update_page_texts();
    }

    /// The toggle shows the language you would switch to, uppercased.
    pub fn update_toggle_buttons(&self) {
        let label = self.other_language(&self.current_language()).to_uppercase();
        let mut doc = self.document.write().unwrap();

        // Both controls are optional; mobile-only layouts omit the desktop
        // one and vice versa.
        if let Some(id) = doc.select(&self.lang_toggle) {
            doc.set_text(id, &label);
        }
        if let Some(id) = doc.select(&self.mobile_lang_toggle) {
            doc.set_text(id, &label);
        }
    }

    /// Re-applies the active language to every localizable node in the
    /// document, including freshly injected fragments.
    pub fn update_page_texts(&self) {
        let lang = self.current_language();
        let langs: Vec<String> = {
            let config = self.config.read().unwrap();
            config.valid_languages().to_vec()
        };
        let attr = format!("data-{}", lang);

        let mut doc = self.document.write().unwrap();
        for id in doc.walk() {
            let el = doc.element(id);
            if !langs.iter().any(|l| el.attr(&format!("data-{}", l)).is_some()) {
                continue;
            }
            let Some(value) = el.attr(&attr).map(str::to_string) else {
                continue;
            };
            if el.tag() == "img" {
                doc.set_attr(id, "src", &value);
            } else {
                doc.set_text(id, &value);
            }
        }
    }

    /// Writes per-language attributes onto an element and applies the
    /// current language right away.
    pub fn add_translation(&self, id: ElementId, translations: &[(&str, &str)]) {
        let lang = self.current_language();
        let mut doc = self.document.write().unwrap();
        for (code, text) in translations {
            doc.set_attr(id, &format!("data-{}", code), text);
        }
        if let Some(value) = doc.element(id).attr(&format!("data-{}", lang)) {
            let value = value.to_string();
            if doc.element(id).tag() == "img" {
                doc.set_attr(id, "src", &value);
            } else {
                doc.set_text(id, &value);
            }
        }
    }

    /// Pure lookup for callers needing a translated string outside the
    /// attribute convention, resolved via `[data-key="..."]` elements.
    pub fn get_text(&self, key: &str, lang: Option<&str>) -> Option<String> {
        let lang = lang.map(str::to_string).unwrap_or_else(|| self.current_language());
        let selector = Selector::parse(&format!("[data-key=\"{}\"]", key)).ok()?;
        let doc = self.document.read().unwrap();
        let id = doc.select(&selector)?;
        doc.element(id)
            .attr(&format!("data-{}", lang))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_shell;
    use crate::router::MemoryHistory;
    use crate::storage::MemoryStore;

    const SHELL: &str = r#"<body>
        <button id="langToggle">FR</button>
        <button id="mobileLangToggle">FR</button>
        <h1 data-en="Welcome" data-fr="Bienvenue" data-key="greeting">Welcome</h1>
        <img id="diagram" data-en="/img/en.png" data-fr="/img/fr.png" src="/img/en.png">
        <p>untranslated</p>
    </body>"#;

    fn setup(path: &str) -> (Arc<Router>, Arc<RwLock<Document>>, LanguageManager) {
        let config = Arc::new(RwLock::new(SiteConfig::default()));
        let history = Arc::new(MemoryHistory::new(path));
        let router = Arc::new(Router::new(
            config.clone(),
            history,
            &MemoryStore::new(),
            path,
        ));
        let document = Arc::new(RwLock::new(parse_shell(SHELL).unwrap()));
        let manager = LanguageManager::new(config, router.clone(), document.clone()).unwrap();
        (router, document, manager)
    }

    fn text_of(doc: &Arc<RwLock<Document>>, id_value: &str) -> String {
        let doc = doc.read().unwrap();
        let id = doc.get_element_by_id(id_value).unwrap();
        doc.element(id).text().to_string()
    }

    #[test]
    fn construction_syncs_toggles_to_the_other_language() {
        let (_, doc, _) = setup("/");
        assert_eq!(text_of(&doc, "langToggle"), "FR");
        assert_eq!(text_of(&doc, "mobileLangToggle"), "FR");

        let (_, doc, _) = setup("/fr/");
        assert_eq!(text_of(&doc, "langToggle"), "EN");
    }

    #[test]
    fn language_change_rewrites_text_and_image_sources() {
        let (_, doc, manager) = setup("/");
        manager.handle_language_change("fr");

        {
            let d = doc.read().unwrap();
            let h1 = d
                .select(&Selector::parse("[data-key=greeting]").unwrap())
                .unwrap();
            assert_eq!(d.element(h1).text(), "Bienvenue");
            let img = d.get_element_by_id("diagram").unwrap();
            assert_eq!(d.element(img).attr("src"), Some("/img/fr.png"));
        }
        assert_eq!(text_of(&doc, "langToggle"), "EN");
    }

    #[test]
    fn double_toggle_restores_original_text() {
        let (router, doc, manager) = setup("/");
        let observer_doc = doc.clone();
        let before: Vec<String> = {
            let d = observer_doc.read().unwrap();
            d.walk().iter().map(|&id| d.element(id).text().to_string()).collect()
        };

        manager.handle_language_change("fr");
        manager.handle_language_change("en");

        let after: Vec<String> = {
            let d = doc.read().unwrap();
            d.walk().iter().map(|&id| d.element(id).text().to_string()).collect()
        };
        assert_eq!(before, after);
        drop(router);
    }

    #[test]
    fn toggle_language_routes_through_the_router() {
        let (router, _, manager) = setup("/");
        manager.toggle_language().unwrap();
        assert_eq!(router.current_language(), "fr");
    }

    #[test]
    fn get_text_resolves_keys_per_language() {
        let (_, _, manager) = setup("/");
        assert_eq!(manager.get_text("greeting", None), Some("Welcome".into()));
        assert_eq!(
            manager.get_text("greeting", Some("fr")),
            Some("Bienvenue".into())
        );
        assert_eq!(manager.get_text("missing", None), None);
    }

    #[test]
    fn add_translation_applies_immediately() {
        let (_, doc, manager) = setup("/fr/");
        let id = {
            let mut d = doc.write().unwrap();
            let id = d.create_element("span");
            let root = d.root();
            d.append_child(root, id);
            id
        };
        manager.add_translation(id, &[("en", "New"), ("fr", "Nouveau")]);
        let d = doc.read().unwrap();
        assert_eq!(d.element(id).text(), "Nouveau");
    }
}
