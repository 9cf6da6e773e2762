//! Visibility watching, modelled on the browser's intersection observer.
//!
//! A watcher keeps the last known intersecting state of every observed node.
//! [`IntersectionWatcher::take_records`] recomputes each node against the
//! viewport and reports the nodes whose state changed since the previous
//! call. A freshly observed node always reports once, so callers learn the
//! initial state.

use log::trace;

use crate::dom::{Document, NodeId};
use crate::environment::{Environment, Viewport};
use crate::error::{PageFxError, Result};
use crate::geometry::RootMargin;

/// When a node counts as intersecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Minimum visible fraction of the node's area. `0.0` means any overlap.
    pub threshold: f64,
    /// Adjustment applied to the viewport before testing.
    pub root_margin: RootMargin,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::default(),
        }
    }
}

/// A change in a node's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

#[derive(Debug)]
struct Observation {
    target: NodeId,
    last: Option<bool>,
}

#[derive(Debug)]
pub struct IntersectionWatcher {
    options: IntersectionOptions,
    observations: Vec<Observation>,
}

impl IntersectionWatcher {
    /// Fails with `UnsupportedEnvironment` when the host cannot report visibility.
    pub fn new(env: &Environment, options: IntersectionOptions) -> Result<Self> {
        if !env.supports_intersection {
            return Err(PageFxError::UnsupportedEnvironment("intersection observation"));
        }
        Ok(Self {
            options,
            observations: Vec::new(),
        })
    }

    pub fn options(&self) -> &IntersectionOptions {
        &self.options
    }

    /// Starts watching `target`. Returns false if it was already watched.
    pub fn observe(&mut self, target: NodeId) -> bool {
        if self.is_observing(target) {
            return false;
        }
        self.observations.push(Observation { target, last: None });
        true
    }

    pub fn unobserve(&mut self, target: NodeId) -> bool {
        let before = self.observations.len();
        self.observations.retain(|o| o.target != target);
        self.observations.len() != before
    }

    /// Stops watching everything.
    pub fn disconnect(&mut self) {
        self.observations.clear();
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observations.iter().any(|o| o.target == target)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Stops watching every target no longer attached to `document` and
    /// returns them.
    pub fn release_detached(&mut self, document: &Document) -> Vec<NodeId> {
        let mut released = Vec::new();
        self.observations.retain(|o| {
            let connected = document.is_connected(o.target);
            if !connected {
                released.push(o.target);
            }
            connected
        });
        released
    }

    fn measure(&self, document: &Document, viewport: &Viewport, target: NodeId) -> (f64, bool) {
        if !document.is_connected(target) {
            return (0.0, false);
        }
        let root = viewport.bounds().expand(&self.options.root_margin);
        let rect = document.rect(target);
        if rect.intersection(&root).is_none() {
            return (0.0, false);
        }
        let ratio = rect.intersection_ratio(&root);
        let intersecting = if self.options.threshold <= 0.0 {
            true
        } else {
            ratio >= self.options.threshold
        };
        (ratio, intersecting)
    }

    /// Entries for every observed node whose state changed since the last call.
    pub fn take_records(&mut self, document: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let measured: Vec<(f64, bool)> = self
            .observations
            .iter()
            .map(|o| self.measure(document, viewport, o.target))
            .collect();

        let mut entries = Vec::new();
        for (observation, (ratio, intersecting)) in self.observations.iter_mut().zip(measured) {
            if observation.last == Some(intersecting) {
                continue;
            }
            observation.last = Some(intersecting);
            trace!(
                "intersection change for {:?}: ratio={ratio:.3} intersecting={intersecting}",
                observation.target
            );
            entries.push(IntersectionEntry {
                target: observation.target,
                ratio,
                is_intersecting: intersecting,
            });
        }
        entries
    }
}
