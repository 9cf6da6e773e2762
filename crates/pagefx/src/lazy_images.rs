//! Deferred image loading: `img[data-src]` gets its real `src` once it first
//! touches the viewport.

use log::debug;

use crate::dom::{Document, NodeId};
use crate::environment::{Environment, Viewport};
use crate::error::Result;
use crate::intersection::{IntersectionOptions, IntersectionWatcher};

pub const LOADED_CLASS: &str = "loaded";

#[derive(Debug)]
pub struct LazyImageLoader {
    watcher: IntersectionWatcher,
    loaded: Vec<NodeId>,
}

impl LazyImageLoader {
    /// Fails with `UnsupportedEnvironment` when visibility cannot be observed.
    pub fn new(env: &Environment) -> Result<Self> {
        Ok(Self {
            watcher: IntersectionWatcher::new(env, IntersectionOptions::default())?,
            loaded: Vec::new(),
        })
    }

    pub fn observe(&mut self, images: impl IntoIterator<Item = NodeId>) -> usize {
        images
            .into_iter()
            .filter(|image| self.watcher.observe(*image))
            .count()
    }

    pub fn pending(&self) -> usize {
        self.watcher.len()
    }

    pub fn loaded(&self) -> &[NodeId] {
        &self.loaded
    }

    /// Swaps in `data-src` for every image now in view.
    pub fn check(&mut self, document: &mut Document, viewport: &Viewport) -> usize {
        let released = self.watcher.release_detached(document);
        if !released.is_empty() {
            debug!("dropped {} detached image(s)", released.len());
        }
        let mut count = 0;
        for entry in self.watcher.take_records(document, viewport) {
            if !entry.is_intersecting {
                continue;
            }
            let Some(src) = document
                .attribute(entry.target, "data-src")
                .map(str::to_string)
            else {
                continue;
            };
            document.set_attribute(entry.target, "src", &src);
            document.add_class(entry.target, LOADED_CLASS);
            self.watcher.unobserve(entry.target);
            self.loaded.push(entry.target);
            count += 1;
        }
        if count > 0 {
            debug!("loaded {count} deferred image(s)");
        }
        count
    }

    pub fn dispose(&mut self) {
        self.watcher.disconnect();
    }
}
