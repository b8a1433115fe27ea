pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PAGE: &str = "home";

/// Storage keys - the only two keys the crate ever touches.
pub const KEY_LAST_LANGUAGE: &str = "last-language";
pub const KEY_REDIRECT_PATH: &str = "redirect-path";

/// CSS class toggled on active nav links and page sections.
pub const CLASS_ACTIVE: &str = "active";

pub const DEFAULT_SCROLL_THRESHOLD: u32 = 50;
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 300;
