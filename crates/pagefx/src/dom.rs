//! In-memory page document.
//!
//! The `Document` is an arena of element nodes rooted at `html`, with a `body`
//! child created up front. Controllers locate elements with CSS selectors and
//! mutate classes, attributes and inline styles; every effective change is
//! appended to a mutation log the host drains to update its real DOM.
//!
//! Removed nodes stay in the arena (detached) so stale `NodeId`s never alias a
//! different element.

use pagecss::parser::parse_selectors;
use pagecss::{NodeMeta, NodeStates, SelectorList};
use smallvec::SmallVec;

use crate::error::Result;
use crate::geometry::Rect;

/// Stable handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single element.
#[derive(Debug, Clone, Default)]
pub struct Node {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: String,
    value: String,
    rect: Rect,
    states: NodeStates,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn states(&self) -> NodeStates {
        self.states
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn meta(&self) -> NodeMeta<'_> {
        NodeMeta {
            tag: &self.tag,
            id: self.id.as_deref(),
            classes: &self.classes,
            attributes: &self.attributes,
            states: self.states,
        }
    }
}

/// Declarative description of an element to insert, built with `with_*` calls.
///
/// ```
/// use pagefx::dom::{Document, Element};
/// use pagefx::geometry::Rect;
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let card = doc.insert(
///     body,
///     Element::new("div")
///         .with_class("card")
///         .with_rect(Rect::new(0.0, 900.0, 300.0, 200.0)),
/// );
/// assert!(doc.has_class(card, "card"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    node: Node,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            node: Node {
                tag: tag.into(),
                ..Node::default()
            },
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.node.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.node.has_class(&class) {
            self.node.classes.push(class);
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.node.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.node.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.node.value = value.into();
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.node.rect = rect;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// One effective change made to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ClassAdded { node: NodeId, class: String },
    ClassRemoved { node: NodeId, class: String },
    AttributeSet { node: NodeId, name: String, value: String },
    AttributeRemoved { node: NodeId, name: String },
    StyleSet { node: NodeId, property: String, value: String },
    TextSet { node: NodeId, text: String },
    Inserted { parent: NodeId, node: NodeId },
    Removed { node: NodeId },
}

/// Arena-backed element tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    mutations: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with an `html` root and an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            mutations: Vec::new(),
        };
        doc.root = doc.alloc(Element::new("html").node);
        doc.body = doc.alloc(Element::new("body").node);
        doc.attach(doc.root, doc.body);
        doc
    }

    pub fn document_element(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(Node::parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(Element::new(tag).node)
    }

    /// Inserts an element description (and its children) under `parent`.
    pub fn insert(&mut self, parent: NodeId, element: Element) -> NodeId {
        let Element { node, children } = element;
        let id = self.alloc(node);
        self.attach(parent, id);
        self.mutations.push(Mutation::Inserted { parent, node: id });
        for child in children {
            self.insert(id, child);
        }
        id
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        self.detach(child);
        self.attach(parent, child);
        self.mutations.push(Mutation::Inserted {
            parent,
            node: child,
        });
    }

    /// Detaches a node from the tree. Returns false if it was not attached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || self.parent(id).is_none() {
            return false;
        }
        self.detach(id);
        self.mutations.push(Mutation::Removed { node: id });
        true
    }

    /// True when the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|c| *c == id)?;
        let target = index.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        self.children(self.parent(id)?).iter().position(|c| *c == id)
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, -1)
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, 1)
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Depth-first, document-order walk of `scope`'s descendants.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True when `id` matches `selectors`, considering its ancestors.
    pub fn matches(&self, id: NodeId, selectors: &SelectorList) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let ancestors: Vec<NodeMeta<'_>> = self
            .ancestors(id)
            .into_iter()
            .filter_map(|a| self.node(a).map(Node::meta))
            .collect();
        selectors.matches(&node.meta(), &ancestors)
    }

    /// All connected elements matching `selectors`, in document order.
    pub fn query_all(&self, selectors: &SelectorList) -> Vec<NodeId> {
        self.query_all_within(self.root, selectors)
    }

    /// Descendants of `scope` matching `selectors`, in document order.
    pub fn query_all_within(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.matches(*id, selectors))
            .collect()
    }

    pub fn query(&self, selectors: &SelectorList) -> Option<NodeId> {
        self.query_within(self.root, selectors)
    }

    pub fn query_within(&self, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.matches(*id, selectors))
    }

    /// Parses `selector` and returns every match.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        Ok(self.query_all(&parse_selectors(selector)?))
    }

    /// Parses `selector` and returns the first match.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query(&parse_selectors(selector)?))
    }

    /// The node itself or its nearest ancestor matching `selectors`.
    pub fn closest(&self, id: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|candidate| self.matches(*candidate, selectors))
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    /// Adds a class. Returns true if the class was not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.has_class(class) {
            return false;
        }
        node.classes.push(class.to_string());
        self.mutations.push(Mutation::ClassAdded {
            node: id,
            class: class.to_string(),
        });
        true
    }

    /// Removes a class. Returns true if it was present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() == before {
            return false;
        }
        self.mutations.push(Mutation::ClassRemoved {
            node: id,
            class: class.to_string(),
        });
        true
    }

    /// Toggles a class and returns whether it is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class)
        }
    }

    /// Adds the class when `on`, removes it otherwise.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    // =========================================================================
    // Attributes, styles and content
    // =========================================================================

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        match node.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, current)) if current == value => return,
            Some((_, current)) => *current = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
        if name == "id" {
            node.id = Some(value.to_string());
        }
        self.mutations.push(Mutation::AttributeSet {
            node: id,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node_mut(id)?;
        let index = node.attributes.iter().position(|(n, _)| n == name)?;
        let (_, value) = node.attributes.remove(index);
        self.mutations.push(Mutation::AttributeRemoved {
            node: id,
            name: name.to_string(),
        });
        Some(value)
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.style(property))
    }

    /// Sets an inline style property (or CSS custom property).
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        match node.style.iter_mut().find(|(p, _)| p == property) {
            Some((_, current)) if current == value => return,
            Some((_, current)) => *current = value.to_string(),
            None => node.style.push((property.to_string(), value.to_string())),
        }
        self.mutations.push(Mutation::StyleSet {
            node: id,
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.node(id).map(Node::text).unwrap_or("")
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.text == text {
            return;
        }
        node.text = text.to_string();
        self.mutations.push(Mutation::TextSet {
            node: id,
            text: text.to_string(),
        });
    }

    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).map(Node::value).unwrap_or("")
    }

    /// Form control value. Driven by user input, so it is not logged.
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.value = value.to_string();
        }
    }

    pub fn rect(&self, id: NodeId) -> Rect {
        self.node(id).map(Node::rect).unwrap_or_default()
    }

    /// Layout box reported by the host.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.rect = rect;
        }
    }

    pub fn states(&self, id: NodeId) -> NodeStates {
        self.node(id).map(Node::states).unwrap_or_default()
    }

    pub fn set_state(&mut self, id: NodeId, state: NodeStates, on: bool) {
        if let Some(node) = self.node_mut(id) {
            node.states.set(state, on);
        }
    }

    /// The `disabled` attribute doubles as the `:disabled` state.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(id, "disabled", "");
        } else {
            self.remove_attribute(id, "disabled");
        }
        self.set_state(id, NodeStates::DISABLED, disabled);
    }

    // =========================================================================
    // Mutation log
    // =========================================================================

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drains the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }
}
