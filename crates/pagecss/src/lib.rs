//! # pagecss - selectors for the pagefx document
//!
//! A small CSS selector engine used by `pagefx` to locate elements in its
//! in-memory page document. This crate provides:
//!
//! - **Parsing**: Convert selector text such as `.card, .alert` into a
//!   structured [`SelectorList`](parser::SelectorList)
//! - **Matching**: Test a node and its ancestor chain against a selector
//!
//! ## Quick Start
//!
//! ```rust
//! use pagecss::parser::parse_selectors;
//! use pagecss::{NodeMeta, NodeStates};
//!
//! let list = parse_selectors(".stats-section .col, img[data-src]").expect("valid selector");
//! assert_eq!(list.selectors.len(), 2);
//!
//! let classes = vec!["col".to_string()];
//! let col = NodeMeta {
//!     tag: "div",
//!     id: None,
//!     classes: &classes,
//!     attributes: &[],
//!     states: NodeStates::empty(),
//! };
//! let section_classes = vec!["stats-section".to_string()];
//! let section = NodeMeta {
//!     classes: &section_classes,
//!     ..NodeMeta::element("section")
//! };
//!
//! assert!(list.matches(&col, &[section]));
//! ```
//!
//! ## Supported Selectors
//!
//! - Type selectors: `img`, `label`, `form` (matched case-insensitively)
//! - Class selectors: `.card`, `.dropdown-menu`
//! - ID selectors: `#navbar`
//! - Universal selector: `*`
//! - Attribute selectors: `[title]`, `[type=submit]`, `[type="submit"]`
//! - Pseudo-classes: `:focus`, `:hover`, `:active`, `:disabled`
//! - Compound selectors: `.dropdown-menu.show`, `button[type=submit]`
//! - Descendant and child combinators: `.stats-section .col`, `ul > li`
//! - Selector lists: `.card, .alert`
//!
//! Sibling combinators (`+`, `~`) parse but never match.

pub mod error;
pub mod matching;
pub mod parser;

pub use error::PcssError;
pub use matching::{NodeMeta, NodeStates};
pub use parser::{SelectorList, parse_selectors};
