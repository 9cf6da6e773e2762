//! Identifier and attribute value parsing shared by the selector parsers.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    sequence::delimited,
};

/// Parses a CSS identifier (alphanumeric characters, dashes, and underscores).
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parses an attribute value: a bare identifier or a single/double quoted string.
pub fn parse_attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        parse_ident,
    ))(input)
}
