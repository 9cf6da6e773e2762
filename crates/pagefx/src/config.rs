//! Tunables for the page controllers.
//!
//! Defaults reproduce the stock page behaviour; override individual values
//! with the `with_*` builders.
//!
//! ```
//! use std::time::Duration;
//! use pagefx::config::{Features, PageConfig};
//!
//! let config = PageConfig::default()
//!     .with_features(Features::REVEAL | Features::NAVBAR)
//!     .with_alert_delay(Duration::from_secs(8));
//! assert!(config.features.contains(Features::NAVBAR));
//! assert!(!config.features.contains(Features::THEME));
//! ```

use std::time::Duration;

use bitflags::bitflags;

use crate::environment::MOBILE_BREAKPOINT;
use crate::geometry::RootMargin;
use crate::intersection::IntersectionOptions;
use crate::navbar::NavbarThresholds;

bitflags! {
    /// Which enhancements a [`crate::page::Page`] installs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Features: u32 {
        const REVEAL      = 1 << 0;
        const NAVBAR      = 1 << 1;
        const THEME       = 1 << 2;
        const SCROLL_TOP  = 1 << 3;
        const TOOLTIPS    = 1 << 4;
        const ALERTS      = 1 << 5;
        const FORMS       = 1 << 6;
        const LAZY_IMAGES = 1 << 7;
        const DROPDOWNS   = 1 << 8;
        const KEYBOARD    = 1 << 9;
        const ACTIVITY    = 1 << 10;
        const CARD_EFFECTS = 1 << 11;
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::all()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub features: Features,

    // Reveal on scroll
    pub reveal_selector: String,
    pub reveal: IntersectionOptions,
    /// Per-sibling animation delay for revealed elements.
    pub reveal_stagger: Option<Duration>,
    pub mobile_breakpoint: f64,

    // Navbar
    pub navbar_selector: String,
    pub navbar: NavbarThresholds,

    // Card hover, ripple and press
    pub card_selector: String,
    pub ripple_duration: Duration,
    pub card_press_duration: Duration,

    // Theme
    pub theme_storage_key: String,

    // Scroll-to-top button
    pub scroll_top_offset: f64,

    // Alerts
    pub alert_selector: String,
    pub alert_delay: Duration,
    pub alert_fade: Duration,

    // Forms
    pub submit_restore: Duration,

    // Idle detection
    pub idle_after: Duration,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            features: Features::default(),
            reveal_selector: ".card, .alert".to_string(),
            reveal: IntersectionOptions {
                threshold: 0.1,
                root_margin: RootMargin::bottom(-50.0),
            },
            reveal_stagger: Some(Duration::from_millis(100)),
            mobile_breakpoint: MOBILE_BREAKPOINT,
            card_selector: ".card".to_string(),
            ripple_duration: Duration::from_millis(600),
            card_press_duration: Duration::from_millis(150),
            navbar_selector: ".navbar".to_string(),
            navbar: NavbarThresholds::default(),
            theme_storage_key: "luxury-theme".to_string(),
            scroll_top_offset: 300.0,
            alert_selector: ".alert".to_string(),
            alert_delay: Duration::from_millis(5000),
            alert_fade: Duration::from_millis(300),
            submit_restore: Duration::from_millis(5000),
            idle_after: Duration::from_millis(30_000),
        }
    }
}

impl PageConfig {
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_reveal_selector(mut self, selector: impl Into<String>) -> Self {
        self.reveal_selector = selector.into();
        self
    }

    pub fn with_reveal_options(mut self, options: IntersectionOptions) -> Self {
        self.reveal = options;
        self
    }

    pub fn with_reveal_stagger(mut self, stagger: Option<Duration>) -> Self {
        self.reveal_stagger = stagger;
        self
    }

    pub fn with_card_selector(mut self, selector: impl Into<String>) -> Self {
        self.card_selector = selector.into();
        self
    }

    pub fn with_ripple_duration(mut self, duration: Duration) -> Self {
        self.ripple_duration = duration;
        self
    }

    pub fn with_card_press_duration(mut self, duration: Duration) -> Self {
        self.card_press_duration = duration;
        self
    }

    pub fn with_mobile_breakpoint(mut self, width: f64) -> Self {
        self.mobile_breakpoint = width;
        self
    }

    pub fn with_navbar_selector(mut self, selector: impl Into<String>) -> Self {
        self.navbar_selector = selector.into();
        self
    }

    pub fn with_navbar_thresholds(mut self, thresholds: NavbarThresholds) -> Self {
        self.navbar = thresholds;
        self
    }

    pub fn with_theme_storage_key(mut self, key: impl Into<String>) -> Self {
        self.theme_storage_key = key.into();
        self
    }

    pub fn with_scroll_top_offset(mut self, offset: f64) -> Self {
        self.scroll_top_offset = offset;
        self
    }

    pub fn with_alert_selector(mut self, selector: impl Into<String>) -> Self {
        self.alert_selector = selector.into();
        self
    }

    pub fn with_alert_delay(mut self, delay: Duration) -> Self {
        self.alert_delay = delay;
        self
    }

    pub fn with_alert_fade(mut self, fade: Duration) -> Self {
        self.alert_fade = fade;
        self
    }

    pub fn with_submit_restore(mut self, delay: Duration) -> Self {
        self.submit_restore = delay;
        self
    }

    pub fn with_idle_after(mut self, idle: Duration) -> Self {
        self.idle_after = idle;
        self
    }
}
