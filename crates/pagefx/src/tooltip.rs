//! Styled replacements for native `title` tooltips.

use log::trace;

use crate::dom::{Document, Element, NodeId};
use crate::geometry::Rect;

pub const TOOLTIP_CLASS: &str = "custom-tooltip";

/// Gap between the target's top edge and the tooltip.
const GAP: f64 = 10.0;

/// Top-left corner for a tooltip of `tip` size centred above `target`.
pub fn tooltip_position(target: &Rect, tip: &Rect) -> (f64, f64) {
    let left = target.x + target.width / 2.0 - tip.width / 2.0;
    let top = target.y - tip.height - GAP;
    (left, top)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tooltip {
    target: NodeId,
    tip: NodeId,
}

#[derive(Debug, Default)]
pub struct TooltipSynthesizer {
    tooltips: Vec<Tooltip>,
}

impl TooltipSynthesizer {
    /// Moves every `title` into a hidden tooltip node. Returns how many were made.
    pub fn install(&mut self, document: &mut Document, targets: impl IntoIterator<Item = NodeId>) -> usize {
        let body = document.body();
        let mut created = 0;
        for target in targets {
            if self.tip_for(target).is_some() {
                continue;
            }
            let Some(text) = document.remove_attribute(target, "title") else {
                continue;
            };
            let tip = document.insert(
                body,
                Element::new("div")
                    .with_class(TOOLTIP_CLASS)
                    .with_text(text),
            );
            document.set_style(tip, "position", "absolute");
            document.set_style(tip, "opacity", "0");
            document.set_style(tip, "pointer-events", "none");
            self.tooltips.push(Tooltip { target, tip });
            created += 1;
        }
        trace!("created {created} tooltip(s)");
        created
    }

    pub fn tip_for(&self, target: NodeId) -> Option<NodeId> {
        self.tooltips
            .iter()
            .find(|t| t.target == target)
            .map(|t| t.tip)
    }

    pub fn len(&self) -> usize {
        self.tooltips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tooltips.is_empty()
    }

    pub fn on_mouse_enter(&self, document: &mut Document, target: NodeId) -> bool {
        let Some(tip) = self.tip_for(target) else {
            return false;
        };
        let (left, top) = tooltip_position(&document.rect(target), &document.rect(tip));
        document.set_style(tip, "left", &format!("{left}px"));
        document.set_style(tip, "top", &format!("{top}px"));
        document.set_style(tip, "opacity", "1");
        true
    }

    pub fn on_mouse_leave(&self, document: &mut Document, target: NodeId) -> bool {
        let Some(tip) = self.tip_for(target) else {
            return false;
        };
        document.set_style(tip, "opacity", "0");
        true
    }

    /// Removes every tooltip node.
    pub fn dispose(&mut self, document: &mut Document) {
        for tooltip in self.tooltips.drain(..) {
            document.remove(tooltip.tip);
        }
    }
}
