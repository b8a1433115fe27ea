// Central configuration: the single source of truth for valid languages,
// valid pages, defaults, and named selector strings shared by every module.
use crate::core::constants::{
    DEFAULT_ANIMATION_DURATION_MS, DEFAULT_LANGUAGE, DEFAULT_MOBILE_BREAKPOINT, DEFAULT_PAGE,
    DEFAULT_SCROLL_THRESHOLD,
};
use crate::core::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// TOML Configuration Structure
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    routing: RoutingConfigToml,
    #[serde(default)]
    ui: Option<UiConfigToml>,
    #[serde(default)]
    content: Option<ContentConfigToml>,
    #[serde(default)]
    selectors: Option<SelectorConfigToml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoutingConfigToml {
    #[serde(default = "default_lang")]
    default_lang: String,
    #[serde(default = "default_page")]
    default_page: String,
    #[serde(default = "default_langs")]
    valid_langs: Vec<String>,
    #[serde(default = "default_pages")]
    valid_pages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct UiConfigToml {
    #[serde(default = "default_scroll_threshold")]
    scroll_threshold: u32,
    #[serde(default = "default_mobile_breakpoint")]
    mobile_breakpoint: u32,
    #[serde(default = "default_animation_duration")]
    animation_duration_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContentConfigToml {
    #[serde(default = "default_content_dir")]
    dir: String,
    #[serde(default = "default_shell_file")]
    shell: String,
    #[serde(default)]
    origin: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct SelectorConfigToml {
    #[serde(default = "default_sel_nav")]
    nav: String,
    #[serde(default = "default_sel_hamburger")]
    hamburger: String,
    #[serde(default = "default_sel_lang_toggle")]
    lang_toggle: String,
    #[serde(default = "default_sel_mobile_lang_toggle")]
    mobile_lang_toggle: String,
    #[serde(default = "default_sel_overlay")]
    mobile_menu_overlay: String,
    #[serde(default = "default_sel_logo")]
    logo: String,
}

// Default Functions
fn default_lang() -> String {
    DEFAULT_LANGUAGE.into()
}
fn default_page() -> String {
    DEFAULT_PAGE.into()
}
fn default_langs() -> Vec<String> {
    vec!["en".into(), "fr".into()]
}
fn default_pages() -> Vec<String> {
    vec![
        "home".into(),
        "projects".into(),
        "about".into(),
        "contact".into(),
    ]
}
fn default_scroll_threshold() -> u32 {
    DEFAULT_SCROLL_THRESHOLD
}
fn default_mobile_breakpoint() -> u32 {
    DEFAULT_MOBILE_BREAKPOINT
}
fn default_animation_duration() -> u64 {
    DEFAULT_ANIMATION_DURATION_MS
}
fn default_content_dir() -> String {
    "public".into()
}
fn default_shell_file() -> String {
    "index.html".into()
}
fn default_sel_nav() -> String {
    "#nav".into()
}
fn default_sel_hamburger() -> String {
    "#hamburger".into()
}
fn default_sel_lang_toggle() -> String {
    "#langToggle".into()
}
fn default_sel_mobile_lang_toggle() -> String {
    "#mobileLangToggle".into()
}
fn default_sel_overlay() -> String {
    "#mobileMenuOverlay".into()
}
fn default_sel_logo() -> String {
    ".logo".into()
}

// Main Configuration Structure
#[derive(Debug, Clone)]
pub struct SiteConfig {
    config_path: Option<PathBuf>,
    pub default_lang: String,
    pub default_page: String,
    valid_langs: Vec<String>,
    valid_pages: Vec<String>,
    pub scroll_threshold: u32,
    pub mobile_breakpoint: u32,
    pub animation_duration: Duration,
    pub content_dir: String,
    pub shell_file: String,
    pub content_origin: Option<String>,
    pub selectors: Selectors,
}

#[derive(Debug, Clone)]
pub struct Selectors {
    pub nav: String,
    pub hamburger: String,
    pub lang_toggle: String,
    pub mobile_lang_toggle: String,
    pub mobile_menu_overlay: String,
    pub logo: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            nav: default_sel_nav(),
            hamburger: default_sel_hamburger(),
            lang_toggle: default_sel_lang_toggle(),
            mobile_lang_toggle: default_sel_mobile_lang_toggle(),
            mobile_menu_overlay: default_sel_overlay(),
            logo: default_sel_logo(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            default_lang: default_lang(),
            default_page: default_page(),
            valid_langs: default_langs(),
            valid_pages: default_pages(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_DURATION_MS),
            content_dir: default_content_dir(),
            shell_file: default_shell_file(),
            content_origin: None,
            selectors: Selectors::default(),
        }
    }
}

impl SiteConfig {
    /// Candidate config locations, checked in order.
    pub fn config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("folio.toml"),
            PathBuf::from(".folio/config.toml"),
        ]
    }

    pub async fn load() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                match Self::from_file(&path).await {
                    Ok(config) => {
                        config.log_startup();
                        return Ok(config);
                    }
                    Err(e) => log::warn!("Skipping unreadable config {}: {}", path.display(), e),
                }
            }
        }

        log::info!("No config file found, using built-in defaults");
        Ok(Self::default())
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(AppError::Io)?;
        let file: ConfigFile =
            toml::from_str(&content).map_err(|e| AppError::Validation(format!("TOML: {}", e)))?;

        let ui = file.ui.unwrap_or_else(|| UiConfigToml {
            scroll_threshold: default_scroll_threshold(),
            mobile_breakpoint: default_mobile_breakpoint(),
            animation_duration_ms: default_animation_duration(),
        });
        let content_cfg = file.content.unwrap_or_else(|| ContentConfigToml {
            dir: default_content_dir(),
            shell: default_shell_file(),
            origin: None,
        });
        let selectors = file
            .selectors
            .map(|s| Selectors {
                nav: s.nav,
                hamburger: s.hamburger,
                lang_toggle: s.lang_toggle,
                mobile_lang_toggle: s.mobile_lang_toggle,
                mobile_menu_overlay: s.mobile_menu_overlay,
                logo: s.logo,
            })
            .unwrap_or_default();

        let config = Self {
            config_path: Some(path.as_ref().to_path_buf()),
            default_lang: file.routing.default_lang,
            default_page: file.routing.default_page,
            valid_langs: file.routing.valid_langs,
            valid_pages: file.routing.valid_pages,
            scroll_threshold: ui.scroll_threshold,
            mobile_breakpoint: ui.mobile_breakpoint,
            animation_duration: Duration::from_millis(ui.animation_duration_ms),
            content_dir: content_cfg.dir,
            shell_file: content_cfg.shell,
            content_origin: content_cfg.origin,
            selectors,
        };

        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };

        let file = ConfigFile {
            routing: RoutingConfigToml {
                default_lang: self.default_lang.clone(),
                default_page: self.default_page.clone(),
                valid_langs: self.valid_langs.clone(),
                valid_pages: self.valid_pages.clone(),
            },
            ui: Some(UiConfigToml {
                scroll_threshold: self.scroll_threshold,
                mobile_breakpoint: self.mobile_breakpoint,
                animation_duration_ms: self.animation_duration.as_millis() as u64,
            }),
            content: Some(ContentConfigToml {
                dir: self.content_dir.clone(),
                shell: self.shell_file.clone(),
                origin: self.content_origin.clone(),
            }),
            selectors: Some(SelectorConfigToml {
                nav: self.selectors.nav.clone(),
                hamburger: self.selectors.hamburger.clone(),
                lang_toggle: self.selectors.lang_toggle.clone(),
                mobile_lang_toggle: self.selectors.mobile_lang_toggle.clone(),
                mobile_menu_overlay: self.selectors.mobile_menu_overlay.clone(),
                logo: self.selectors.logo.clone(),
            }),
        };

        let content = toml::to_string_pretty(&file)
            .map_err(|e| AppError::Validation(format!("TOML: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(AppError::Io)?;
            }
        }

        tokio::fs::write(path, content).await.map_err(AppError::Io)
    }

    fn validate(&self) -> Result<()> {
        if !self.is_valid_language(&self.default_lang) {
            return Err(AppError::Validation(format!(
                "default_lang '{}' is not in valid_langs",
                self.default_lang
            )));
        }
        if !self.is_valid_page(&self.default_page) {
            return Err(AppError::Validation(format!(
                "default_page '{}' is not in valid_pages",
                self.default_page
            )));
        }
        Ok(())
    }

    pub fn is_valid_language(&self, code: &str) -> bool {
        self.valid_langs.iter().any(|l| l == code)
    }

    pub fn is_valid_page(&self, name: &str) -> bool {
        self.valid_pages.iter().any(|p| p == name)
    }

    /// Idempotent append; no-op when the page is already registered.
    pub fn add_valid_page(&mut self, name: &str) {
        if !self.is_valid_page(name) {
            self.valid_pages.push(name.to_string());
            log::info!("New page registered: {}", name);
        }
    }

    /// Idempotent append; no-op when the language is already registered.
    pub fn add_valid_language(&mut self, code: &str) {
        if !self.is_valid_language(code) {
            self.valid_langs.push(code.to_string());
            log::info!("New language registered: {}", code);
        }
    }

    pub fn valid_languages(&self) -> &[String] {
        &self.valid_langs
    }

    pub fn valid_pages(&self) -> &[String] {
        &self.valid_pages
    }

    fn log_startup(&self) {
        log::info!("Folio Shell v{}", crate::core::constants::VERSION);
        log::info!(
            "Routing: langs [{}], pages [{}], default {}/{}",
            self.valid_langs.join(", "),
            self.valid_pages.join(", "),
            self.default_lang,
            self.default_page
        );
    }
}
