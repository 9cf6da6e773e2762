//! Events the host feeds in, commands it gets back, and the internal work
//! items scheduled on frames and timers.

use crate::dom::NodeId;

/// Keyboard keys the controllers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Space,
    Escape,
    Char(char),
    Other,
}

/// Input delivered by the hosting page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The window scrolled to `offset` pixels from the top.
    Scroll { offset: f64 },
    Resize { width: f64, height: f64 },
    MouseMove,
    TouchStart,
    KeyDown { key: Key },
    Click { target: NodeId },
    /// The pointer entered `target` at document coordinates `(x, y)`.
    MouseEnter { target: NodeId, x: f64, y: f64 },
    MouseLeave { target: NodeId },
    MouseDown { target: NodeId },
    MouseUp { target: NodeId },
    Focus { target: NodeId },
    Blur { target: NodeId },
    /// A form control's value changed.
    Input { target: NodeId, value: String },
    Submit { form: NodeId },
    /// Stops an [`crate::runtime::PageRuntime`].
    Shutdown,
}

impl PageEvent {
    /// Events that count as user activity for the idle monitor.
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            PageEvent::MouseMove
                | PageEvent::TouchStart
                | PageEvent::KeyDown { .. }
                | PageEvent::Scroll { .. }
        )
    }
}

/// Requests for the host that cannot be expressed as document mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum PageCommand {
    ScrollTo { top: f64, smooth: bool },
}

/// Work deferred to the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    NavbarUpdate,
}

/// Work deferred by a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Start fading an alert out.
    AlertAutoHide(NodeId),
    /// Detach an alert once its fade finished.
    AlertRemove(NodeId),
    /// No user activity for the idle period.
    ActivityExpired,
    /// Put a submit button back to its pre-submit label.
    RestoreSubmit(NodeId),
    /// Take a card's hover ripple off the page.
    RemoveRipple(NodeId),
    /// End a card's click press.
    ReleaseCardPress(NodeId),
}
