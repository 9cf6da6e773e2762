//! Idle detection. After a stretch without pointer, keyboard, scroll or touch
//! input the body gets `inactive` so stylesheets can pause animations.
//!
//! The inactivity timer belongs to the monitor: dropping or disposing the
//! monitor cancels it.

use std::time::Duration;

use log::trace;

use crate::dom::Document;
use crate::events::TimerTask;
use crate::timer::{TimerHandle, TimerQueue};

pub const INACTIVE_CLASS: &str = "inactive";

#[derive(Debug)]
pub struct ActivityMonitor {
    idle_after: Duration,
    timer: Option<TimerHandle>,
    disposed: bool,
}

impl ActivityMonitor {
    pub fn new(idle_after: Duration) -> Self {
        Self {
            idle_after,
            timer: None,
            disposed: false,
        }
    }

    /// Clears the idle class and restarts the countdown.
    pub fn on_activity(&mut self, document: &mut Document, timers: &mut TimerQueue<TimerTask>) {
        if self.disposed {
            return;
        }
        let body = document.body();
        document.remove_class(body, INACTIVE_CLASS);
        // Replacing the handle cancels the previous countdown.
        self.timer = Some(timers.schedule(self.idle_after, TimerTask::ActivityExpired));
    }

    pub fn on_timer(&mut self, document: &mut Document, task: &TimerTask) -> bool {
        if *task != TimerTask::ActivityExpired {
            return false;
        }
        if self.disposed {
            return true;
        }
        self.timer = None;
        let body = document.body();
        document.add_class(body, INACTIVE_CLASS);
        trace!("page idle");
        true
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn dispose(&mut self) {
        self.timer = None;
        self.disposed = true;
    }
}
