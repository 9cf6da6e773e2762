//! Focus-ring mode: Tab switches the body into keyboard navigation, any
//! click switches it back.

use crate::dom::Document;
use crate::events::Key;

pub const KEYBOARD_CLASS: &str = "keyboard-navigation";

#[derive(Debug, Default)]
pub struct KeyboardNavigation {
    active: bool,
}

impl KeyboardNavigation {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn on_key(&mut self, document: &mut Document, key: Key) {
        if key == Key::Tab {
            self.active = true;
            let body = document.body();
            document.add_class(body, KEYBOARD_CLASS);
        }
    }

    pub fn on_click(&mut self, document: &mut Document) {
        self.active = false;
        let body = document.body();
        document.remove_class(body, KEYBOARD_CLASS);
    }
}
