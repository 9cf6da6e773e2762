//! A stock page for tests and demos.
//!
//! [`PageFixture::landing_page`] builds the kind of document the controllers
//! were written for: a fixed navbar, a column of cards, an alert, a contact
//! form, a dropdown, a deferred image and a couple of titled links.
//!
//! ```
//! use pagefx::testing::PageFixture;
//!
//! let fixture = PageFixture::landing_page();
//! assert_eq!(fixture.cards.len(), 4);
//! let page = fixture.into_page().unwrap();
//! assert!(page.navbar().is_some());
//! ```

use crate::config::PageConfig;
use crate::dom::{Document, Element, NodeId};
use crate::environment::Environment;
use crate::error::Result;
use crate::geometry::Rect;
use crate::page::Page;
use crate::storage::MemoryStore;

/// Vertical distance between consecutive cards.
pub const CARD_SPACING: f64 = 600.0;

#[derive(Debug)]
pub struct PageFixture {
    pub document: Document,
    pub environment: Environment,
    pub config: PageConfig,
    pub store: MemoryStore,
    pub navbar: NodeId,
    pub dropdown_toggle: NodeId,
    pub dropdown_menu: NodeId,
    pub cards: Vec<NodeId>,
    /// Image inside the first card.
    pub card_image: NodeId,
    pub alert: NodeId,
    pub form: NodeId,
    pub email: NodeId,
    pub phone: NodeId,
    pub submit: NodeId,
    pub image: NodeId,
    pub titled_link: NodeId,
}

impl PageFixture {
    pub fn landing_page() -> Self {
        let mut document = Document::new();
        let body = document.body();

        let navbar = document.insert(
            body,
            Element::new("nav")
                .with_class("navbar")
                .with_rect(Rect::new(0.0, 0.0, 1280.0, 72.0)),
        );
        let dropdown = document.insert(navbar, Element::new("li").with_class("dropdown"));
        let dropdown_toggle = document.insert(
            dropdown,
            Element::new("a")
                .with_class("dropdown-toggle")
                .with_text("Services"),
        );
        let dropdown_menu = document.insert(dropdown, Element::new("ul").with_class("dropdown-menu"));
        let titled_link = document.insert(
            navbar,
            Element::new("a")
                .with_attr("title", "Call us")
                .with_rect(Rect::new(1100.0, 20.0, 80.0, 30.0)),
        );

        let main = document.insert(body, Element::new("main"));
        let alert = document.insert(
            main,
            Element::new("div")
                .with_class("alert")
                .with_text("Welcome back")
                .with_rect(Rect::new(40.0, 100.0, 600.0, 60.0)),
        );
        let cards: Vec<NodeId> = (0..4)
            .map(|i| {
                document.insert(
                    main,
                    Element::new("div")
                        .with_class("card")
                        .with_rect(Rect::new(40.0, 200.0 + CARD_SPACING * i as f64, 400.0, 300.0)),
                )
            })
            .collect();
        let card_image = document.insert(
            cards[0],
            Element::new("img")
                .with_attr("src", "/static/suite.jpg")
                .with_rect(Rect::new(40.0, 200.0, 400.0, 180.0)),
        );
        let image = document.insert(
            main,
            Element::new("img")
                .with_attr("data-src", "/static/gallery.jpg")
                .with_rect(Rect::new(40.0, 3000.0, 400.0, 300.0)),
        );

        let form = document.insert(main, Element::new("form"));
        let email_group = document.insert(form, Element::new("div").with_class("mb-3"));
        document.insert(email_group, Element::new("label").with_text("Email"));
        let email = document.insert(
            email_group,
            Element::new("input")
                .with_class("form-control")
                .with_attr("type", "email"),
        );
        let phone_group = document.insert(form, Element::new("div").with_class("mb-3"));
        document.insert(phone_group, Element::new("label").with_text("Phone"));
        let phone = document.insert(
            phone_group,
            Element::new("input")
                .with_class("form-control")
                .with_attr("type", "tel"),
        );
        let submit = document.insert(
            form,
            Element::new("button")
                .with_class("btn")
                .with_attr("type", "submit")
                .with_text("Send")
                .with_rect(Rect::new(40.0, 3600.0, 140.0, 44.0)),
        );

        document.take_mutations();

        Self {
            document,
            environment: Environment::default(),
            config: PageConfig::default(),
            store: MemoryStore::new(),
            navbar,
            dropdown_toggle,
            dropdown_menu,
            cards,
            card_image,
            alert,
            form,
            email,
            phone,
            submit,
            image,
            titled_link,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn into_page(self) -> Result<Page> {
        Page::new(
            self.document,
            self.environment,
            Box::new(self.store),
            self.config,
        )
    }
}
