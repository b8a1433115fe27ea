//! Active/inactive state for nav links and page sections, plus the mobile
//! hamburger menu. Subscribes to the router's page changes; never owns route
//! state itself.
use crate::core::config::SiteConfig;
use crate::core::constants::CLASS_ACTIVE;
use crate::core::error::Result;
use crate::dom::{Document, ElementId, Selector};
use crate::router::Router;
use std::sync::{Arc, RwLock};

/// The subset of keyboard input the navigation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Digit keys 1..=9 jump to the corresponding nav link.
    Digit(u8),
    Escape,
}

pub struct NavigationUI {
    config: Arc<RwLock<SiteConfig>>,
    router: Arc<Router>,
    document: Arc<RwLock<Document>>,
    menu_open: RwLock<bool>,
    hamburger: Selector,
    overlay: Selector,
    logo: Selector,
    nav_link: Selector,
    mobile_nav_link: Selector,
    page_section: Selector,
}

impl NavigationUI {
    pub fn new(
        config: Arc<RwLock<SiteConfig>>,
        router: Arc<Router>,
        document: Arc<RwLock<Document>>,
    ) -> Result<Self> {
        let (hamburger, overlay, logo) = {
            let cfg = config.read().unwrap();
            (
                Selector::parse(&cfg.selectors.hamburger)?,
                Selector::parse(&cfg.selectors.mobile_menu_overlay)?,
                Selector::parse(&cfg.selectors.logo)?,
            )
        };

        Ok(Self {
            config,
            router,
            document,
            menu_open: RwLock::new(false),
            hamburger,
            overlay,
            logo,
            nav_link: Selector::parse(".nav-link")?,
            mobile_nav_link: Selector::parse(".mobile-nav-link")?,
            page_section: Selector::parse(".page")?,
        })
    }

    pub fn is_menu_open(&self) -> bool {
        *self.menu_open.read().unwrap()
    }

    /// Called from the router's pageChange observer: exactly one desktop
    /// link, one mobile link, and one page section end up active, and the
    /// viewport returns to the top.
    pub fn handle_page_change(&self, new_page: &str) {
        self.update_active_states(new_page);
        self.close_menu_if_open();
    }

    pub fn update_active_states(&self, active_page: &str) {
        let mut doc = self.document.write().unwrap();

        for selector in [&self.nav_link, &self.mobile_nav_link, &self.page_section] {
            for id in doc.select_all(selector) {
                doc.remove_class(id, CLASS_ACTIVE);
            }
        }

        let desktop = Selector::parse(&format!(".nav-link[data-page=\"{}\"]", active_page));
        let mobile = Selector::parse(&format!(".mobile-nav-link[data-page=\"{}\"]", active_page));

        // All three targets are optional; a missing surface is expected.
        if let Ok(selector) = desktop {
            if let Some(id) = doc.select(&selector) {
                doc.add_class(id, CLASS_ACTIVE);
            }
        }
        if let Ok(selector) = mobile {
            if let Some(id) = doc.select(&selector) {
                doc.add_class(id, CLASS_ACTIVE);
            }
        }
        if let Some(id) = doc.get_element_by_id(active_page) {
            doc.add_class(id, CLASS_ACTIVE);
        }

        doc.scroll_to_top();
    }

    // Hamburger menu

    pub fn toggle_menu(&self) {
        if self.is_menu_open() {
            self.close_menu();
        } else {
            self.open_menu();
        }
    }

    pub fn open_menu(&self) {
        *self.menu_open.write().unwrap() = true;
        self.set_menu_classes(true);
    }

    pub fn close_menu(&self) {
        *self.menu_open.write().unwrap() = false;
        self.set_menu_classes(false);
    }

    pub fn close_menu_if_open(&self) {
        if self.is_menu_open() {
            self.close_menu();
        }
    }

    fn set_menu_classes(&self, open: bool) {
        let mut doc = self.document.write().unwrap();
        for selector in [&self.hamburger, &self.overlay] {
            if let Some(id) = doc.select(selector) {
                if open {
                    doc.add_class(id, CLASS_ACTIVE);
                } else {
                    doc.remove_class(id, CLASS_ACTIVE);
                }
            }
        }
        doc.set_scroll_locked(open);
    }

    // Input routing

    /// Click dispatch for every clickable the navigation owns: nav links,
    /// the logo, the hamburger, the overlay backdrop, and elements marked
    /// with a `data-action="navigate:<page>"` attribute.
    pub fn handle_click(&self, target: ElementId) -> Result<()> {
        enum Action {
            Navigate(String),
            ToggleMenu,
            CloseMenu,
            None,
        }

        let action = {
            let doc = self.document.read().unwrap();
            let el = doc.element(target);

            if self.hamburger.matches(el) {
                Action::ToggleMenu
            } else if self.overlay.matches(el) {
                // Only a click on the backdrop itself closes; clicks on
                // children are the menu's own content.
                Action::CloseMenu
            } else if self.logo.matches(el) {
                Action::Navigate(self.config.read().unwrap().default_page.clone())
            } else if self.nav_link.matches(el) || self.mobile_nav_link.matches(el) {
                match el.attr("data-page") {
                    Some(page) => Action::Navigate(page.to_string()),
                    None => Action::None,
                }
            } else if let Some(action) = el.attr("data-action") {
                match action.strip_prefix("navigate:") {
                    Some(page) => Action::Navigate(page.to_string()),
                    None => Action::None,
                }
            } else {
                Action::None
            }
        };

        match action {
            Action::Navigate(page) => {
                self.router.navigate_to(&page, true)?;
                self.close_menu_if_open();
            }
            Action::ToggleMenu => self.toggle_menu(),
            Action::CloseMenu => self.close_menu(),
            Action::None => {}
        }
        Ok(())
    }

    /// Digit keys 1..N navigate to the nth nav link's page; Escape closes
    /// the menu.
    pub fn handle_key(&self, key: KeyInput) -> Result<()> {
        match key {
            KeyInput::Escape => {
                self.close_menu_if_open();
                Ok(())
            }
            KeyInput::Digit(n) => {
                let target = {
                    let doc = self.document.read().unwrap();
                    let links = doc.select_all(&self.nav_link);
                    let index = usize::from(n).checked_sub(1);
                    index
                        .and_then(|i| links.get(i).copied())
                        .and_then(|id| doc.element(id).attr("data-page").map(str::to_string))
                };
                if let Some(page) = target {
                    self.router.navigate_to(&page, true)?;
                    self.close_menu_if_open();
                }
                Ok(())
            }
        }
    }

    /// Resizing past the mobile breakpoint dismisses the overlay menu.
    pub fn handle_resize(&self, viewport_width: u32) {
        let breakpoint = self.config.read().unwrap().mobile_breakpoint;
        if viewport_width > breakpoint {
            self.close_menu_if_open();
        }
    }
}
