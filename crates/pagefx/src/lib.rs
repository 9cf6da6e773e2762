//! Scroll-reactive presentation controllers for a page document.
//!
//! The crate models a page as an in-memory [`Document`] and installs a set
//! of progressive enhancements on it: one-time reveal of content as it
//! scrolls into view, a navbar that elevates and hides with scroll
//! direction, a persisted light/dark theme, alerts that dismiss themselves,
//! form affordances and more. A host (a browser binding, a test, a headless
//! renderer) feeds events in and applies the resulting mutations.
//!
//! ```
//! use pagefx::{Document, Element, Environment, MemoryStore, Page, PageConfig, PageEvent, Rect};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let navbar = doc.insert(
//!     body,
//!     Element::new("nav").with_class("navbar").with_rect(Rect::new(0.0, 0.0, 1280.0, 64.0)),
//! );
//!
//! let mut page = Page::new(doc, Environment::default(), Box::new(MemoryStore::new()), PageConfig::default())?;
//! page.dispatch(PageEvent::Scroll { offset: 80.0 });
//! page.run_frame();
//! assert!(page.document().has_class(navbar, "scrolled"));
//! # Ok::<(), pagefx::PageFxError>(())
//! ```

pub mod activity;
pub mod alerts;
pub mod card_effects;
pub mod config;
pub mod dom;
pub mod dropdown;
pub mod environment;
pub mod error;
pub mod events;
pub mod forms;
pub mod frame;
pub mod geometry;
pub mod intersection;
pub mod keyboard;
pub mod lazy_images;
mod log_init;
pub mod navbar;
pub mod page;
pub mod reveal;
pub mod runtime;
pub mod scroll_top;
pub mod storage;
pub mod testing;
pub mod theme;
pub mod timer;
pub mod tooltip;

pub use card_effects::CardEffects;
pub use config::{Features, PageConfig};
pub use dom::{Document, Element, Mutation, NodeId};
pub use environment::{Environment, Viewport};
pub use error::{PageFxError, Result};
pub use events::{Key, PageCommand, PageEvent};
pub use geometry::{Rect, RootMargin};
pub use intersection::{IntersectionEntry, IntersectionOptions, IntersectionWatcher};
pub use log_init::init_logger;
pub use navbar::{
    NavbarStateKind, NavbarThresholds, NavbarVisibilityController, NavbarVisualState, ScrollSample,
    derive_navbar_state,
};
pub use page::Page;
pub use reveal::{RevealScheduler, WatchedElement};
pub use runtime::PageRuntime;
pub use storage::{KeyValueStore, MemoryStore};
pub use theme::{ThemeManager, ThemeMode};

// Re-export the log crate so hosts can use pagefx::log::debug!, etc.
pub use log;
pub use pagecss::{PcssError, SelectorList, parse_selectors};
