//! Click and keyboard handling for `.dropdown-toggle` / `.dropdown-menu` pairs.

use pagecss::{SelectorList, parse_selectors};

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::events::Key;

pub const SHOW_CLASS: &str = "show";
const MENU_CLASS: &str = "dropdown-menu";

#[derive(Debug)]
pub struct DropdownController {
    toggle: SelectorList,
    container: SelectorList,
    open_menu: SelectorList,
}

impl DropdownController {
    pub fn new() -> Result<Self> {
        Ok(Self {
            toggle: parse_selectors(".dropdown-toggle")?,
            container: parse_selectors(".dropdown")?,
            open_menu: parse_selectors(".dropdown-menu.show")?,
        })
    }

    /// True when the page has at least one toggle.
    pub fn applies_to(&self, document: &Document) -> bool {
        document.query(&self.toggle).is_some()
    }

    /// The toggle `target` belongs to, if any.
    pub fn toggle_for(&self, document: &Document, target: NodeId) -> Option<NodeId> {
        document.closest(target, &self.toggle)
    }

    /// Handles a click anywhere on the page.
    ///
    /// A click on a toggle flips its menu; a click outside every `.dropdown`
    /// closes all open menus. Returns the menu that was flipped.
    pub fn on_click(&self, document: &mut Document, target: NodeId) -> Option<NodeId> {
        let flipped = self
            .toggle_for(document, target)
            .and_then(|toggle| self.flip(document, toggle));

        if document.closest(target, &self.container).is_none() {
            self.close_all(document);
        }
        flipped
    }

    /// Enter or Space on a focused toggle behaves like a click on it.
    pub fn on_key(&self, document: &mut Document, focused: Option<NodeId>, key: Key) -> Option<NodeId> {
        if !matches!(key, Key::Enter | Key::Space) {
            return None;
        }
        let toggle = self.toggle_for(document, focused?)?;
        self.on_click(document, toggle)
    }

    fn flip(&self, document: &mut Document, toggle: NodeId) -> Option<NodeId> {
        let menu = document
            .next_element_sibling(toggle)
            .filter(|menu| document.has_class(*menu, MENU_CLASS))?;
        document.toggle_class(menu, SHOW_CLASS);
        Some(menu)
    }

    pub fn close_all(&self, document: &mut Document) -> usize {
        let open = document.query_all(&self.open_menu);
        for menu in &open {
            document.remove_class(*menu, SHOW_CLASS);
        }
        open.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let dropdown = doc.insert(body, Element::new("li").with_class("dropdown"));
        let toggle = doc.insert(
            dropdown,
            Element::new("a")
                .with_class("dropdown-toggle")
                .with_child(Element::new("span").with_text("Services")),
        );
        let menu = doc.insert(dropdown, Element::new("ul").with_class("dropdown-menu"));
        let outside = doc.insert(body, Element::new("main"));
        (doc, toggle, menu, outside)
    }

    #[test]
    fn toggle_click_flips_menu() {
        let (mut doc, toggle, menu, _) = page();
        let dropdowns = DropdownController::new().unwrap();
        let label = doc.children(toggle)[0];

        assert_eq!(dropdowns.on_click(&mut doc, label), Some(menu));
        assert!(doc.has_class(menu, SHOW_CLASS));
        dropdowns.on_click(&mut doc, toggle);
        assert!(!doc.has_class(menu, SHOW_CLASS));
    }

    #[test]
    fn outside_click_closes_menus() {
        let (mut doc, toggle, menu, outside) = page();
        let dropdowns = DropdownController::new().unwrap();
        dropdowns.on_click(&mut doc, toggle);

        // Clicking inside the menu keeps it open.
        assert_eq!(dropdowns.on_click(&mut doc, menu), None);
        assert!(doc.has_class(menu, SHOW_CLASS));

        dropdowns.on_click(&mut doc, outside);
        assert!(!doc.has_class(menu, SHOW_CLASS));
    }

    #[test]
    fn enter_and_space_activate_focused_toggle() {
        let (mut doc, toggle, menu, outside) = page();
        let dropdowns = DropdownController::new().unwrap();

        assert_eq!(dropdowns.on_key(&mut doc, Some(toggle), Key::Enter), Some(menu));
        assert!(doc.has_class(menu, SHOW_CLASS));
        dropdowns.on_key(&mut doc, Some(toggle), Key::Space);
        assert!(!doc.has_class(menu, SHOW_CLASS));

        assert_eq!(dropdowns.on_key(&mut doc, Some(toggle), Key::Tab), None);
        assert_eq!(dropdowns.on_key(&mut doc, Some(outside), Key::Enter), None);
        assert_eq!(dropdowns.on_key(&mut doc, None, Key::Enter), None);
    }

    #[test]
    fn toggle_without_menu_is_ignored() {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.insert(body, Element::new("a").with_class("dropdown-toggle"));
        let dropdowns = DropdownController::new().unwrap();
        assert!(dropdowns.applies_to(&doc));
        assert_eq!(dropdowns.on_click(&mut doc, toggle), None);
    }
}
