//! Floating "back to top" button.

use crate::dom::{Document, Element, NodeId};
use crate::events::PageCommand;

pub const BUTTON_CLASS: &str = "scroll-to-top";

#[derive(Debug)]
pub struct ScrollTopButton {
    button: NodeId,
    offset: f64,
    shown: bool,
}

impl ScrollTopButton {
    /// Appends the (initially hidden) button to the body.
    pub fn create(document: &mut Document, offset: f64) -> Self {
        let body = document.body();
        let button = document.insert(
            body,
            Element::new("button")
                .with_class(BUTTON_CLASS)
                .with_attr("aria-label", "Scroll to top")
                .with_child(Element::new("i").with_class("fas").with_class("fa-arrow-up")),
        );
        let this = Self {
            button,
            offset,
            shown: false,
        };
        this.write(document);
        this
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    fn write(&self, document: &mut Document) {
        let (opacity, visibility) = if self.shown {
            ("1", "visible")
        } else {
            ("0", "hidden")
        };
        document.set_style(self.button, "opacity", opacity);
        document.set_style(self.button, "visibility", visibility);
    }

    /// Shows the button past the offset, hides it otherwise.
    pub fn on_scroll(&mut self, document: &mut Document, offset: f64) {
        let shown = offset > self.offset;
        if shown != self.shown {
            self.shown = shown;
            self.write(document);
        }
    }

    /// A click on the button (or its icon) asks the host to scroll home.
    pub fn on_click(&self, document: &Document, target: NodeId) -> Option<PageCommand> {
        if target == self.button || document.ancestors(target).contains(&self.button) {
            Some(PageCommand::ScrollTo {
                top: 0.0,
                smooth: true,
            })
        } else {
            None
        }
    }
}
