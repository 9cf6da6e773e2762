//! Async driver for a [`Page`].
//!
//! The runtime owns the page and pumps two sources with `tokio::select!`:
//! host events from an unbounded channel and a frame ticker that advances
//! the page clock by the real elapsed time before running a frame. Commands
//! the page emits are forwarded to an optional sink.
//!
//! After every event and every frame the document's mutation log is drained
//! and sent, as one batch, to the mutation sink if there is one. Without a
//! sink the batch is discarded, so the log never outgrows a single step.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::dom::Mutation;
use crate::error::{PageFxError, Result};
use crate::events::{PageCommand, PageEvent};
use crate::page::Page;

/// Roughly one display refresh at 60Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct PageRuntime {
    page: Page,
    events: mpsc::UnboundedReceiver<PageEvent>,
    commands: Option<mpsc::UnboundedSender<PageCommand>>,
    mutations: Option<mpsc::UnboundedSender<Vec<Mutation>>>,
    frame_interval: Duration,
}

impl PageRuntime {
    /// Wraps `page`; events sent on the returned sender drive it.
    pub fn new(page: Page) -> (Self, mpsc::UnboundedSender<PageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runtime = Self {
            page,
            events: rx,
            commands: None,
            mutations: None,
            frame_interval: FRAME_INTERVAL,
        };
        (runtime, tx)
    }

    /// Forwards every [`PageCommand`] to `sink`.
    pub fn with_command_sink(mut self, sink: mpsc::UnboundedSender<PageCommand>) -> Self {
        self.commands = Some(sink);
        self
    }

    /// Sends each step's document mutations to `sink` as one batch.
    pub fn with_mutation_sink(mut self, sink: mpsc::UnboundedSender<Vec<Mutation>>) -> Self {
        self.mutations = Some(sink);
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    fn flush_commands(&mut self) {
        let commands = self.page.take_commands();
        let Some(sink) = self.commands.as_ref() else {
            return;
        };
        for command in commands {
            if sink.send(command).is_err() {
                debug!("command receiver dropped");
                self.commands = None;
                break;
            }
        }
    }

    fn flush_mutations(&mut self) {
        let batch = self.page.document_mut().take_mutations();
        if batch.is_empty() {
            return;
        }
        let Some(sink) = self.mutations.as_ref() else {
            return;
        };
        if sink.send(batch).is_err() {
            debug!("mutation receiver dropped");
            self.mutations = None;
        }
    }

    fn flush(&mut self) {
        self.flush_commands();
        self.flush_mutations();
    }

    /// Runs until a [`PageEvent::Shutdown`] arrives or every sender is gone,
    /// then disposes the page and hands it back.
    pub async fn run(mut self) -> Page {
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(PageEvent::Shutdown) | None => break,
                    Some(event) => {
                        self.page.dispatch(event);
                        self.flush();
                    }
                },
                _ = ticker.tick() => {
                    let now = Instant::now();
                    self.page.advance(now - last_tick);
                    last_tick = now;
                    self.page.run_frame();
                    self.flush();
                }
            }
        }

        self.flush_commands();
        self.page.dispose();
        self.flush_mutations();
        debug!("page runtime stopped");
        self.page
    }

    /// Blocking variant of [`PageRuntime::run`].
    ///
    /// Inside a multi-thread runtime this reuses it via `block_in_place`;
    /// with no runtime a current-thread one is created. A current-thread
    /// runtime cannot be blocked on, so that case is an error.
    pub fn run_blocking(self) -> Result<Page> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                use tokio::runtime::RuntimeFlavor;
                match handle.runtime_flavor() {
                    RuntimeFlavor::MultiThread => {
                        Ok(tokio::task::block_in_place(|| handle.block_on(self.run())))
                    }
                    _ => Err(PageFxError::RuntimeInit(
                        "cannot block inside a current-thread runtime, use run().await".to_string(),
                    )),
                }
            }
            Err(_) => {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| PageFxError::RuntimeInit(e.to_string()))?;
                Ok(rt.block_on(self.run()))
            }
        }
    }
}
