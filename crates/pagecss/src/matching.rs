//! Selector matching against node metadata.
//!
//! Matching works on borrowed [`NodeMeta`] snapshots so the document model can
//! describe a node without cloning its class or attribute lists:
//!
//! - Type selectors match `tag` (ASCII case-insensitive)
//! - Class selectors match any entry of `classes`
//! - ID selectors match `id`
//! - Attribute selectors check presence, or exact value when one is given
//! - Pseudo-class selectors match `states`
//! - Combinators walk the ancestor chain, nearest parent first

use bitflags::bitflags;

use crate::parser::{Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart};

bitflags! {
    /// Interaction states used for pseudo-class matching.
    ///
    /// # Example
    ///
    /// ```
    /// use pagecss::NodeStates;
    ///
    /// let mut states = NodeStates::empty();
    /// states |= NodeStates::FOCUS;
    ///
    /// assert!(states.contains(NodeStates::FOCUS));
    /// assert!(!states.contains(NodeStates::HOVER));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeStates: u16 {
        /// Node has keyboard focus
        const FOCUS    = 0b0000_0001;
        /// Pointer is over the node
        const HOVER    = 0b0000_0010;
        /// Node is being pressed
        const ACTIVE   = 0b0000_0100;
        /// Node is disabled
        const DISABLED = 0b0000_1000;
    }
}

/// A borrowed description of one element, enough to match selectors.
#[derive(Clone, Copy, Debug)]
pub struct NodeMeta<'a> {
    /// Element tag name, e.g. `div`, `img`.
    pub tag: &'a str,
    pub id: Option<&'a str>,
    pub classes: &'a [String],
    /// Attribute name/value pairs.
    pub attributes: &'a [(String, String)],
    pub states: NodeStates,
}

impl<'a> NodeMeta<'a> {
    /// A bare element with no id, classes, attributes or states.
    pub fn element(tag: &'a str) -> Self {
        Self {
            tag,
            id: None,
            classes: &[],
            attributes: &[],
            states: NodeStates::empty(),
        }
    }

    /// Checks if this node matches a simple selector.
    pub fn matches_selector(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Type(name) => self.tag.eq_ignore_ascii_case(name),
            Selector::Id(id) => self.id == Some(id.as_str()),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::Universal => true,
            Selector::PseudoClass(name) => match name.as_str() {
                "focus" => self.states.contains(NodeStates::FOCUS),
                "hover" => self.states.contains(NodeStates::HOVER),
                "active" => self.states.contains(NodeStates::ACTIVE),
                "disabled" => self.states.contains(NodeStates::DISABLED),
                _ => false,
            },
            Selector::Attribute(name, expected) => self
                .attributes
                .iter()
                .find(|(attr, _)| attr == name)
                .is_some_and(|(_, value)| expected.as_ref().is_none_or(|e| e == value)),
        }
    }

    /// Checks every simple selector of a compound.
    pub fn matches_compound(&self, compound: &CompoundSelector) -> bool {
        compound.selectors.iter().all(|s| self.matches_selector(s))
    }

    /// Checks if this node matches a complex selector given its ancestors.
    /// Ancestors should be ordered from immediate parent to root.
    pub fn matches_complex(&self, complex: &ComplexSelector, ancestors: &[NodeMeta<'_>]) -> bool {
        let Some((subject, rest)) = complex.parts.split_last() else {
            return false;
        };
        self.matches_compound(&subject.compound) && match_ancestors(rest, ancestors)
    }
}

/// Matches the remaining left-hand parts against the ancestor chain,
/// backtracking over descendant combinators.
fn match_ancestors(parts: &[SelectorPart], ancestors: &[NodeMeta<'_>]) -> bool {
    let Some((part, rest)) = parts.split_last() else {
        return true;
    };

    match part.combinator {
        Combinator::Child => ancestors.first().is_some_and(|parent| {
            parent.matches_compound(&part.compound) && match_ancestors(rest, &ancestors[1..])
        }),
        Combinator::Descendant | Combinator::None => {
            (0..ancestors.len()).any(|i| {
                ancestors[i].matches_compound(&part.compound)
                    && match_ancestors(rest, &ancestors[i + 1..])
            })
        }
        // Sibling relationships are not tracked by `NodeMeta`
        Combinator::AdjacentSibling | Combinator::GeneralSibling => false,
    }
}

impl SelectorList {
    /// True when any selector of the list matches the node.
    pub fn matches(&self, node: &NodeMeta<'_>, ancestors: &[NodeMeta<'_>]) -> bool {
        self.selectors
            .iter()
            .any(|complex| node.matches_complex(complex, ancestors))
    }
}
