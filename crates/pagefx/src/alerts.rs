//! Dismissable, self-expiring alerts.
//!
//! Every alert gets a close button. After the auto-hide delay an alert still
//! on the page slides out, and once the fade has run it is detached. Clicking
//! the close button starts the same slide-out early.

use std::time::Duration;

use log::debug;

use crate::dom::{Document, Element, NodeId};
use crate::events::TimerTask;
use crate::timer::{TimerHandle, TimerQueue};

pub const CLOSE_CLASS: &str = "btn-close";

#[derive(Debug)]
struct TrackedAlert {
    node: NodeId,
    close: NodeId,
    dismissing: bool,
    auto_hide: Option<TimerHandle>,
    removal: Option<TimerHandle>,
}

#[derive(Debug)]
pub struct AlertDismisser {
    delay: Duration,
    fade: Duration,
    alerts: Vec<TrackedAlert>,
}

impl AlertDismisser {
    pub fn new(delay: Duration, fade: Duration) -> Self {
        Self {
            delay,
            fade,
            alerts: Vec::new(),
        }
    }

    /// Adds close buttons and arms the auto-hide timers.
    pub fn install(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        alerts: impl IntoIterator<Item = NodeId>,
    ) -> usize {
        let mut installed = 0;
        for node in alerts {
            if self.alerts.iter().any(|a| a.node == node) {
                continue;
            }
            let existing = document
                .children(node)
                .iter()
                .copied()
                .find(|child| document.has_class(*child, CLOSE_CLASS));
            let close = existing.unwrap_or_else(|| {
                document.insert(
                    node,
                    Element::new("button")
                        .with_class(CLOSE_CLASS)
                        .with_attr("type", "button")
                        .with_attr("aria-label", "Close"),
                )
            });
            self.alerts.push(TrackedAlert {
                node,
                close,
                dismissing: false,
                auto_hide: Some(timers.schedule(self.delay, TimerTask::AlertAutoHide(node))),
                removal: None,
            });
            installed += 1;
        }
        installed
    }

    pub fn close_button(&self, alert: NodeId) -> Option<NodeId> {
        self.alerts.iter().find(|a| a.node == alert).map(|a| a.close)
    }

    pub fn is_dismissing(&self, alert: NodeId) -> bool {
        self.alerts.iter().any(|a| a.node == alert && a.dismissing)
    }

    /// Starts the slide-out. Returns false if it had already started.
    pub fn dismiss(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        alert: NodeId,
    ) -> bool {
        let Some(tracked) = self.alerts.iter_mut().find(|a| a.node == alert) else {
            return false;
        };
        if tracked.dismissing || !document.is_connected(alert) {
            return false;
        }
        tracked.dismissing = true;
        tracked.auto_hide = None;
        document.set_style(alert, "transition", "all 0.3s ease");
        document.set_style(alert, "opacity", "0");
        document.set_style(alert, "transform", "translateX(100%)");
        tracked.removal = Some(timers.schedule(self.fade, TimerTask::AlertRemove(alert)));
        debug!("dismissing alert {alert:?}");
        true
    }

    /// Handles a click; returns true if it hit a close button.
    pub fn on_click(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        target: NodeId,
    ) -> bool {
        let Some(alert) = self
            .alerts
            .iter()
            .find(|a| a.close == target || document.ancestors(target).contains(&a.close))
            .map(|a| a.node)
        else {
            return false;
        };
        self.dismiss(document, timers, alert);
        true
    }

    /// Reacts to an alert timer coming due. Returns true if it was ours.
    pub fn on_timer(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        task: &TimerTask,
    ) -> bool {
        match *task {
            TimerTask::AlertAutoHide(alert) => {
                self.dismiss(document, timers, alert);
                true
            }
            TimerTask::AlertRemove(alert) => {
                if document.is_connected(alert) {
                    document.remove(alert);
                }
                self.alerts.retain(|a| a.node != alert);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Forgets every alert; their pending timers are cancelled.
    pub fn dispose(&mut self) {
        self.alerts.clear();
    }
}
