//! Pointer feedback on cards.
//!
//! Entering a card tilts its first image and drops a short-lived ripple
//! under the pointer. Leaving puts the image back. Clicking presses the card
//! in for a moment. Ripples and presses end on timers owned by the
//! controller, so disposing it cancels them and clears any ripple still on
//! the page.

use std::time::Duration;

use log::trace;
use pagecss::{SelectorList, parse_selectors};

use crate::dom::{Document, Element, NodeId};
use crate::error::Result;
use crate::events::TimerTask;
use crate::timer::{TimerHandle, TimerQueue};

pub const RIPPLE_CLASS: &str = "ripple";

const IMAGE_HOVER: &str = "scale(1.05) rotate(1deg)";
const IMAGE_REST: &str = "scale(1) rotate(0deg)";
const CARD_PRESSED: &str = "scale(0.98)";
const CARD_REST: &str = "scale(1)";

#[derive(Debug)]
struct Ripple {
    node: NodeId,
    _expiry: TimerHandle,
}

#[derive(Debug)]
struct TrackedCard {
    node: NodeId,
    press: Option<TimerHandle>,
}

#[derive(Debug)]
pub struct CardEffects {
    image: SelectorList,
    ripple_duration: Duration,
    press_duration: Duration,
    cards: Vec<TrackedCard>,
    ripples: Vec<Ripple>,
}

impl CardEffects {
    pub fn new(ripple_duration: Duration, press_duration: Duration) -> Result<Self> {
        Ok(Self {
            image: parse_selectors("img")?,
            ripple_duration,
            press_duration,
            cards: Vec::new(),
            ripples: Vec::new(),
        })
    }

    pub fn install(&mut self, cards: impl IntoIterator<Item = NodeId>) -> usize {
        let mut installed = 0;
        for node in cards {
            if self.is_card(node) {
                continue;
            }
            self.cards.push(TrackedCard { node, press: None });
            installed += 1;
        }
        installed
    }

    fn is_card(&self, node: NodeId) -> bool {
        self.cards.iter().any(|c| c.node == node)
    }

    /// Pointer entered `target` at document coordinates `(x, y)`.
    ///
    /// Returns the ripple that was added, if `target` is a card.
    pub fn on_mouse_enter(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        target: NodeId,
        x: f64,
        y: f64,
    ) -> Option<NodeId> {
        if !self.is_card(target) || !document.is_connected(target) {
            return None;
        }
        if let Some(image) = document.query_within(target, &self.image) {
            document.set_style(image, "transform", IMAGE_HOVER);
        }

        let rect = document.rect(target);
        let size = rect.width.max(rect.height);
        let left = x - rect.x - size / 2.0;
        let top = y - rect.y - size / 2.0;

        document.set_style(target, "position", "relative");
        let ripple = document.insert(target, Element::new("span").with_class(RIPPLE_CLASS));
        for (property, value) in [
            ("position", "absolute".to_string()),
            ("width", format!("{size}px")),
            ("height", format!("{size}px")),
            ("left", format!("{left}px")),
            ("top", format!("{top}px")),
            (
                "background",
                "radial-gradient(circle, rgba(255,255,255,0.3) 0%, transparent 70%)".to_string(),
            ),
            ("border-radius", "50%".to_string()),
            ("transform", "scale(0)".to_string()),
            ("animation", "ripple 0.6s ease-out".to_string()),
            ("pointer-events", "none".to_string()),
            ("z-index", "1".to_string()),
        ] {
            document.set_style(ripple, property, &value);
        }

        let expiry = timers.schedule(self.ripple_duration, TimerTask::RemoveRipple(ripple));
        self.ripples.push(Ripple {
            node: ripple,
            _expiry: expiry,
        });
        trace!("ripple {ripple:?} on card {target:?}");
        Some(ripple)
    }

    pub fn on_mouse_leave(&self, document: &mut Document, target: NodeId) -> bool {
        if !self.is_card(target) {
            return false;
        }
        if let Some(image) = document.query_within(target, &self.image) {
            document.set_style(image, "transform", IMAGE_REST);
        }
        true
    }

    /// Presses in the card containing `target`. Returns that card.
    pub fn on_click(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        target: NodeId,
    ) -> Option<NodeId> {
        let chain: Vec<NodeId> = std::iter::once(target)
            .chain(document.ancestors(target))
            .collect();
        let card = self.cards.iter_mut().find(|c| chain.contains(&c.node))?;

        document.set_style(card.node, "transform", CARD_PRESSED);
        // A second click restarts the press.
        card.press = Some(timers.schedule(
            self.press_duration,
            TimerTask::ReleaseCardPress(card.node),
        ));
        Some(card.node)
    }

    /// Reacts to a card timer coming due. Returns true if it was ours.
    pub fn on_timer(&mut self, document: &mut Document, task: &TimerTask) -> bool {
        match *task {
            TimerTask::RemoveRipple(ripple) => {
                if document.is_connected(ripple) {
                    document.remove(ripple);
                }
                self.ripples.retain(|r| r.node != ripple);
                true
            }
            TimerTask::ReleaseCardPress(card) => {
                if let Some(tracked) = self.cards.iter_mut().find(|c| c.node == card) {
                    tracked.press = None;
                    document.set_style(card, "transform", CARD_REST);
                }
                true
            }
            _ => false,
        }
    }

    /// Ripples currently on the page.
    pub fn active_ripples(&self) -> usize {
        self.ripples.len()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cancels pending timers and takes down any ripple still showing.
    pub fn dispose(&mut self, document: &mut Document) {
        for ripple in self.ripples.drain(..) {
            document.remove(ripple.node);
        }
        self.cards.clear();
    }
}
