//! Light/dark theme switching with a persisted preference.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::dom::{Document, Element, NodeId};
use crate::storage::KeyValueStore;

pub const TOGGLE_CLASS: &str = "theme-toggle-btn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// CSS custom properties for this mode.
    pub fn palette(self) -> [(&'static str, &'static str); 4] {
        match self {
            ThemeMode::Light => [
                ("--bg-primary", "#ffffff"),
                ("--bg-secondary", "#f8fafc"),
                ("--text-primary", "#1e293b"),
                ("--text-secondary", "#64748b"),
            ],
            ThemeMode::Dark => [
                ("--bg-primary", "#0f172a"),
                ("--bg-secondary", "#1e293b"),
                ("--text-primary", "#f8fafc"),
                ("--text-secondary", "#cbd5e1"),
            ],
        }
    }

    /// Icon classes for the toggle button: offer the opposite mode.
    pub fn icon(self) -> &'static str {
        match self {
            ThemeMode::Light => "fas fa-moon",
            ThemeMode::Dark => "fas fa-sun",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(()),
        }
    }
}

pub struct ThemeManager {
    mode: ThemeMode,
    store: Box<dyn KeyValueStore>,
    key: String,
    toggle: Option<NodeId>,
    icon: Option<NodeId>,
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManager")
            .field("mode", &self.mode)
            .field("key", &self.key)
            .field("toggle", &self.toggle)
            .finish_non_exhaustive()
    }
}

impl ThemeManager {
    /// Loads the saved mode (light when absent or unreadable) and applies it.
    pub fn load(document: &mut Document, store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let mode = match store.get(&key) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|_| {
                debug!("ignoring unknown saved theme `{saved}`");
                ThemeMode::Light
            }),
            Ok(None) => ThemeMode::Light,
            Err(err) => {
                warn!("could not read theme preference: {err}");
                ThemeMode::Light
            }
        };

        let manager = Self {
            mode,
            store,
            key,
            toggle: None,
            icon: None,
        };
        manager.apply(document);
        manager
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Writes `data-theme` and the palette variables to the root element.
    pub fn apply(&self, document: &mut Document) {
        let root = document.document_element();
        document.set_attribute(root, "data-theme", self.mode.as_str());
        for (property, value) in self.mode.palette() {
            document.set_style(root, property, value);
        }
    }

    /// Appends the toggle button to the body.
    pub fn create_toggle(&mut self, document: &mut Document) -> NodeId {
        if let Some(toggle) = self.toggle {
            return toggle;
        }
        let body = document.body();
        let toggle = document.insert(
            body,
            Element::new("button")
                .with_class(TOGGLE_CLASS)
                .with_attr("aria-label", "Toggle dark mode")
                .with_child(Element::new("i")),
        );
        self.icon = document.children(toggle).first().copied();
        self.toggle = Some(toggle);
        self.update_icon(document);
        toggle
    }

    pub fn toggle_button(&self) -> Option<NodeId> {
        self.toggle
    }

    fn update_icon(&self, document: &mut Document) {
        if let Some(icon) = self.icon {
            document.set_attribute(icon, "class", self.mode.icon());
        }
    }

    /// Flips the mode, applies and persists it.
    pub fn toggle(&mut self, document: &mut Document) -> ThemeMode {
        self.set_mode(document, self.mode.toggled());
        self.mode
    }

    pub fn set_mode(&mut self, document: &mut Document, mode: ThemeMode) {
        self.mode = mode;
        self.apply(document);
        if let Err(err) = self.store.set(&self.key, mode.as_str()) {
            warn!("could not persist theme preference: {err}");
        }
        self.update_icon(document);
    }

    /// Handles a click; returns true if it hit the toggle button.
    pub fn on_click(&mut self, document: &mut Document, target: NodeId) -> bool {
        let Some(toggle) = self.toggle else {
            return false;
        };
        let hit = target == toggle || document.ancestors(target).contains(&toggle);
        if hit {
            self.toggle(document);
        }
        hit
    }
}
