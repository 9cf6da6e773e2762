//! Selector parsing and the selector data structures.
//!
//! - [`parse_selectors`]: Main entry point, parses a complete selector list
//! - [`parse_selector_list`]: nom parser, leaves unconsumed input to the caller
//! - Selector types: [`Selector`], [`CompoundSelector`], [`ComplexSelector`]
//!
//! ## Example
//!
//! ```rust
//! use pagecss::parser::{parse_selectors, Selector};
//!
//! let list = parse_selectors(".card").unwrap();
//! assert_eq!(
//!     list.selectors[0].parts[0].compound.selectors[0],
//!     Selector::Class("card".to_string())
//! );
//! ```

pub mod selectors;
pub mod types;
pub mod values;

pub use crate::parser::types::{
    Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart,
    Specificity,
};

use crate::PcssError;
use crate::parser::selectors::parse_complex_selector;

use nom::{
    IResult,
    character::complete::{char, multispace0},
    multi::many0,
    sequence::{preceded, tuple},
};

/// Parses a complete selector list, rejecting any trailing input.
pub fn parse_selectors(source: &str) -> Result<SelectorList, PcssError> {
    let (remaining, list) =
        parse_selector_list(source).map_err(|e| PcssError::InvalidSyntax(e.to_string()))?;

    if !remaining.trim().is_empty() {
        return Err(PcssError::InvalidSyntax(format!(
            "Unexpected tokens at end of selector: {}",
            remaining.trim()
        )));
    }

    Ok(list)
}

/// Parses a comma-separated list of selectors (e.g., ".card, .alert").
pub fn parse_selector_list(input: &str) -> IResult<&str, SelectorList> {
    let (input, _) = multispace0(input)?;
    let (input, first) = parse_complex_selector(input)?;
    let (input, rest) = many0(preceded(
        tuple((multispace0, char(','), multispace0)),
        parse_complex_selector,
    ))(input)?;

    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, SelectorList::new(selectors)))
}
