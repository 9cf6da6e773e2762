//! One-time reveal of elements as they scroll into view.
//!
//! Registered elements get the `animate-on-scroll` class and are watched
//! against the viewport. The first time one is sufficiently visible it gets
//! `visible` and is never watched again. On small screens or with reduced
//! motion nothing is registered and content stays in its static state.
//!
//! With a stagger set, a revealed element's animation is delayed by its
//! position among its siblings, so a row of cards cascades in. Elements
//! detached from the document while still pending are dropped on the next
//! check.

use std::time::Duration;

use log::debug;
use pagecss::SelectorList;

use crate::dom::{Document, NodeId};
use crate::environment::{Environment, MOBILE_BREAKPOINT, Viewport};
use crate::error::{PageFxError, Result};
use crate::intersection::{IntersectionEntry, IntersectionOptions, IntersectionWatcher};

/// Class added when an element is registered.
pub const PENDING_CLASS: &str = "animate-on-scroll";
/// Class added when an element is revealed.
pub const VISIBLE_CLASS: &str = "visible";

/// A registered element and whether it has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedElement {
    pub node: NodeId,
    pub revealed: bool,
}

#[derive(Debug)]
pub struct RevealScheduler {
    options: IntersectionOptions,
    mobile_breakpoint: f64,
    stagger: Option<Duration>,
    watcher: Option<IntersectionWatcher>,
    watched: Vec<WatchedElement>,
    promotions: usize,
    disposed: bool,
}

impl RevealScheduler {
    pub fn new(options: IntersectionOptions) -> Self {
        Self {
            options,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            stagger: None,
            watcher: None,
            watched: Vec::new(),
            promotions: 0,
            disposed: false,
        }
    }

    pub fn with_mobile_breakpoint(mut self, width: f64) -> Self {
        self.mobile_breakpoint = width;
        self
    }

    /// Delays each reveal by `step` times the element's index among its siblings.
    pub fn with_stagger(mut self, step: Duration) -> Self {
        self.stagger = Some(step);
        self
    }

    /// Starts watching `elements`. Returns how many were newly registered.
    ///
    /// With reduced motion or a mobile-width viewport this does nothing and
    /// returns `Ok(0)`.
    pub fn register(
        &mut self,
        document: &mut Document,
        env: &Environment,
        elements: impl IntoIterator<Item = NodeId>,
    ) -> Result<usize> {
        if self.disposed {
            return Ok(0);
        }
        if !env.allows_motion(self.mobile_breakpoint) {
            debug!(
                "reveal disabled (reduced_motion={}, width={})",
                env.reduced_motion, env.viewport.width
            );
            return Ok(0);
        }
        let watcher = match self.watcher.take() {
            Some(watcher) => watcher,
            None => IntersectionWatcher::new(env, self.options)?,
        };
        let watcher = self.watcher.insert(watcher);

        let mut registered = 0;
        for node in elements {
            if document.node(node).is_none() || self.watched.iter().any(|w| w.node == node) {
                continue;
            }
            self.watched.push(WatchedElement {
                node,
                revealed: false,
            });
            document.add_class(node, PENDING_CLASS);
            watcher.observe(node);
            registered += 1;
        }
        debug!("reveal watching {registered} new element(s)");
        Ok(registered)
    }

    /// Registers every element matching `selectors`.
    ///
    /// Fails with `MissingTarget` when nothing matches.
    pub fn register_matching(
        &mut self,
        document: &mut Document,
        env: &Environment,
        selectors: &SelectorList,
    ) -> Result<usize> {
        let nodes = document.query_all(selectors);
        if nodes.is_empty() {
            return Err(PageFxError::MissingTarget(selectors.to_string()));
        }
        self.register(document, env, nodes)
    }

    /// Handles one visibility change. Returns true if it revealed the node.
    pub fn handle_entry(&mut self, document: &mut Document, entry: &IntersectionEntry) -> bool {
        if self.disposed || !entry.is_intersecting {
            return false;
        }
        let Some(watched) = self.watched.iter_mut().find(|w| w.node == entry.target) else {
            return false;
        };
        if watched.revealed {
            return false;
        }

        watched.revealed = true;
        if let Some(step) = self.stagger {
            let index = document.index_in_parent(entry.target).unwrap_or(0);
            let delay = step.as_millis() * index as u128;
            document.set_style(entry.target, "animation-delay", &format!("{delay}ms"));
        }
        document.add_class(entry.target, VISIBLE_CLASS);
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.unobserve(entry.target);
        }
        self.promotions += 1;
        true
    }

    /// Recomputes visibility and reveals what came into view.
    /// Returns the number of elements revealed.
    pub fn check(&mut self, document: &mut Document, viewport: &Viewport) -> usize {
        let Some(watcher) = self.watcher.as_mut() else {
            return 0;
        };
        let released = watcher.release_detached(document);
        if !released.is_empty() {
            debug!("reveal released {} detached element(s)", released.len());
            self.watched.retain(|w| !released.contains(&w.node));
        }
        let entries = watcher.take_records(document, viewport);

        let mut revealed = 0;
        for entry in &entries {
            if self.handle_entry(document, entry) {
                revealed += 1;
            }
        }
        revealed
    }

    /// Stops all observation and forgets every watched element.
    pub fn dispose(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
        }
        self.watched.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.watched.iter().any(|w| w.node == node && w.revealed)
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.watcher.as_ref().is_some_and(|w| w.is_observing(node))
    }

    /// Number of elements still being watched.
    pub fn observed_count(&self) -> usize {
        self.watcher.as_ref().map_or(0, IntersectionWatcher::len)
    }

    pub fn watched(&self) -> &[WatchedElement] {
        &self.watched
    }

    /// Total reveals performed.
    pub fn promotions(&self) -> usize {
        self.promotions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Mutation};
    use crate::environment::Viewport;
    use crate::geometry::{Rect, RootMargin};
    use pagecss::parser::parse_selectors;

    fn options() -> IntersectionOptions {
        IntersectionOptions {
            threshold: 0.1,
            root_margin: RootMargin::bottom(-50.0),
        }
    }

    fn page() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let cards = (0..3)
            .map(|i| {
                doc.insert(
                    body,
                    Element::new("div")
                        .with_class("card")
                        .with_rect(Rect::new(0.0, 600.0 * i as f64, 400.0, 300.0)),
                )
            })
            .collect();
        (doc, cards)
    }

    fn visible_additions(doc: &Document, node: NodeId) -> usize {
        doc.mutations()
            .iter()
            .filter(|m| {
                matches!(m, Mutation::ClassAdded { node: n, class } if *n == node && class == VISIBLE_CLASS)
            })
            .count()
    }

    fn entry(target: NodeId) -> IntersectionEntry {
        IntersectionEntry {
            target,
            ratio: 1.0,
            is_intersecting: true,
        }
    }

    #[test]
    fn repeated_entry_promotes_once() {
        let (mut doc, cards) = page();
        let mut reveal = RevealScheduler::new(options());
        reveal.register(&mut doc, &Environment::default(), cards.clone()).unwrap();

        assert!(reveal.handle_entry(&mut doc, &entry(cards[2])));
        assert!(!reveal.handle_entry(&mut doc, &entry(cards[2])));

        assert_eq!(visible_additions(&doc, cards[2]), 1);
        assert_eq!(reveal.promotions(), 1);
        assert!(reveal.is_revealed(cards[2]));
        assert!(!reveal.is_observing(cards[2]));
    }

    #[test]
    fn reduced_motion_registers_nothing() {
        let (mut doc, cards) = page();
        doc.take_mutations();
        let env = Environment::default().with_reduced_motion(true);
        let mut reveal = RevealScheduler::new(options());

        assert_eq!(reveal.register(&mut doc, &env, cards.clone()).unwrap(), 0);
        assert_eq!(reveal.observed_count(), 0);
        assert_eq!(reveal.check(&mut doc, &env.viewport), 0);
        assert!(!reveal.handle_entry(&mut doc, &entry(cards[0])));
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn mobile_width_registers_nothing() {
        let (mut doc, cards) = page();
        let env = Environment::new(Viewport::new(768.0, 1024.0));
        let mut reveal = RevealScheduler::new(options());
        assert_eq!(reveal.register(&mut doc, &env, cards).unwrap(), 0);
        assert_eq!(reveal.observed_count(), 0);
    }

    #[test]
    fn scroll_in_out_and_back_reveals_once() {
        let (mut doc, cards) = page();
        let env = Environment::default();
        let mut reveal = RevealScheduler::new(options());
        reveal.register(&mut doc, &env, cards.clone()).unwrap();

        // Cards at 0 and 600 are within the first 800px viewport.
        assert_eq!(reveal.check(&mut doc, &env.viewport), 2);
        assert!(!reveal.is_revealed(cards[2]));

        let down = env.viewport.with_scroll(1000.0);
        assert_eq!(reveal.check(&mut doc, &down), 1);
        assert_eq!(reveal.check(&mut doc, &env.viewport), 0);
        assert_eq!(reveal.check(&mut doc, &down), 0);

        for card in cards {
            assert_eq!(visible_additions(&doc, card), 1);
            assert!(doc.has_class(card, PENDING_CLASS));
        }
        assert_eq!(reveal.observed_count(), 0);
    }

    #[test]
    fn dispose_stops_promotions() {
        let (mut doc, cards) = page();
        let env = Environment::default();
        let mut reveal = RevealScheduler::new(options());
        reveal.register(&mut doc, &env, cards.clone()).unwrap();
        reveal.dispose();
        doc.take_mutations();

        assert_eq!(reveal.check(&mut doc, &env.viewport), 0);
        assert!(!reveal.handle_entry(&mut doc, &entry(cards[0])));
        assert_eq!(reveal.register(&mut doc, &env, cards).unwrap(), 0);
        assert!(doc.mutations().is_empty());
        assert!(reveal.watched().is_empty());
    }

    #[test]
    fn unsupported_intersection_is_an_error() {
        let (mut doc, cards) = page();
        let env = Environment::default().with_intersection_support(false);
        let mut reveal = RevealScheduler::new(options());
        let err = reveal.register(&mut doc, &env, cards).unwrap_err();
        assert!(matches!(err, PageFxError::UnsupportedEnvironment(_)));
    }

    #[test]
    fn missing_targets_are_reported() {
        let mut doc = Document::new();
        let mut reveal = RevealScheduler::new(options());
        let selectors = parse_selectors(".card").unwrap();
        let err = reveal
            .register_matching(&mut doc, &Environment::default(), &selectors)
            .unwrap_err();
        assert!(err.is_degradation());
    }

    #[test]
    fn stagger_follows_sibling_position() {
        let (mut doc, cards) = page();
        let env = Environment::default();
        let mut reveal = RevealScheduler::new(options()).with_stagger(Duration::from_millis(100));
        reveal.register(&mut doc, &env, cards.clone()).unwrap();

        reveal.handle_entry(&mut doc, &entry(cards[0]));
        reveal.handle_entry(&mut doc, &entry(cards[2]));
        assert_eq!(doc.style(cards[0], "animation-delay"), Some("0ms"));
        assert_eq!(doc.style(cards[2], "animation-delay"), Some("200ms"));
        assert_eq!(doc.style(cards[1], "animation-delay"), None);
    }

    #[test]
    fn no_stagger_by_default() {
        let (mut doc, cards) = page();
        let mut reveal = RevealScheduler::new(options());
        reveal.register(&mut doc, &Environment::default(), cards.clone()).unwrap();
        reveal.handle_entry(&mut doc, &entry(cards[1]));
        assert_eq!(doc.style(cards[1], "animation-delay"), None);
    }

    #[test]
    fn detached_elements_are_released() {
        let (mut doc, cards) = page();
        let env = Environment::default();
        let mut reveal = RevealScheduler::new(options());
        reveal.register(&mut doc, &env, cards.clone()).unwrap();
        assert_eq!(reveal.check(&mut doc, &env.viewport), 2);
        assert_eq!(reveal.observed_count(), 1);

        // The card below the fold goes away before it was ever seen.
        doc.remove(cards[2]);
        assert_eq!(reveal.check(&mut doc, &env.viewport), 0);
        assert_eq!(reveal.observed_count(), 0);
        assert!(!reveal.is_observing(cards[2]));
        assert_eq!(reveal.watched().len(), 2);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let (mut doc, cards) = page();
        let mut reveal = RevealScheduler::new(options());
        let env = Environment::default();
        assert_eq!(reveal.register(&mut doc, &env, cards.clone()).unwrap(), 3);
        assert_eq!(reveal.register(&mut doc, &env, cards).unwrap(), 0);
        assert_eq!(reveal.watched().len(), 3);
    }
}
