//! nom parsers for the CSS fragments the document model understands
//!
//! Colors (`#rgb`, `#rrggbb`, `rgb()`, `rgba()`, a few keywords), box shadows
//! and compound selector lists. The parsers are generic over the nom error
//! type; callers run them with [`parse_all`] and map failures onto
//! [`CoreError`](crate::CoreError) themselves.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1, u8 as dec_u8},
    combinator::{all_consuming, map, map_opt, opt, value},
    error::{ErrorKind, ParseError as NomParseError},
    multi::{many0, separated_list1},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};
use smallvec::SmallVec;

use crate::color::Color;
use crate::selector::Selector;
use crate::style::Shadow;

/// Run `parser` over the whole of `input` (surrounding whitespace allowed)
pub(crate) fn parse_all<'a, O, F>(parser: F, input: &'a str) -> Option<O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, nom::error::Error<&'a str>>,
{
    all_consuming(delimited(multispace0, parser, multispace0))(input)
        .finish()
        .ok()
        .map(|(_, output)| output)
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse a comma with optional whitespace either side
fn comma<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, char, E> {
    delimited(multispace0, char(','), multispace0)(input)
}

// ============================================================================
// Colors
// ============================================================================

pub(crate) fn color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    alt((hex_color, rgba_color, rgb_color, named_color))(input)
}

/// Parse hex color: #RGB or #RRGGBB
fn hex_color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    let (rest, _) = char('#')(input)?;
    let (rest, hex) = take_while1(|c: char| c.is_ascii_hexdigit())(rest)?;

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => {
            return Err(nom::Err::Error(E::from_error_kind(
                input,
                ErrorKind::LengthValue,
            )))
        }
    };
    let value = u32::from_str_radix(&expanded, 16)
        .map_err(|_| nom::Err::Error(E::from_error_kind(input, ErrorKind::HexDigit)))?;

    Ok((rest, Color::from_hex(value)))
}

/// Parse rgba(r, g, b, a) with 8-bit channels and a fractional alpha
fn rgba_color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    let (input, _) = tag_no_case("rgba")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (r, _, g, _, b, _, a)) = delimited(
        char('('),
        delimited(
            multispace0,
            tuple((dec_u8, comma, dec_u8, comma, dec_u8, comma, float)),
            multispace0,
        ),
        char(')'),
    )(input)?;

    Ok((input, Color::rgba8(r, g, b, a)))
}

/// Parse rgb(r, g, b)
fn rgb_color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (r, _, g, _, b)) = delimited(
        char('('),
        delimited(
            multispace0,
            tuple((dec_u8, comma, dec_u8, comma, dec_u8)),
            multispace0,
        ),
        char(')'),
    )(input)?;

    Ok((input, Color::rgba8(r, g, b, 1.0)))
}

fn named_color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    alt((
        value(Color::WHITE, tag_no_case("white")),
        value(Color::BLACK, tag_no_case("black")),
        value(Color::TRANSPARENT, tag_no_case("transparent")),
    ))(input)
}

// ============================================================================
// Shadows
// ============================================================================

/// Parse `none` or `<x> <y> <blur> <color>`
pub(crate) fn shadow<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Shadow, E> {
    alt((value(Shadow::None, tag_no_case("none")), drop_shadow))(input)
}

fn drop_shadow<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Shadow, E> {
    let (input, (offset_x, _, offset_y, _, blur, _, color)) = tuple((
        length_px,
        multispace1,
        length_px,
        multispace1,
        length_px,
        multispace1,
        color,
    ))(input)?;

    Ok((
        input,
        Shadow::Drop {
            offset_x,
            offset_y,
            blur,
            color,
        },
    ))
}

/// A length with an optional `px` unit
fn length_px<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, f32, E> {
    let (input, length) = float(input)?;
    let (input, _) = opt(tag_no_case("px"))(input)?;
    Ok((input, length))
}

// ============================================================================
// Selectors
// ============================================================================

#[derive(Clone, Copy)]
enum Part<'a> {
    Class(&'a str),
    Id(&'a str),
}

/// Parse a compound selector: an optional tag followed by `.class`/`#id` parts
pub(crate) fn compound_selector<'a, E: NomParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Selector, E> {
    map_opt(
        tuple((
            opt(identifier),
            many0(alt((
                map(preceded(char('.'), identifier), Part::Class),
                map(preceded(char('#'), identifier), Part::Id),
            ))),
        )),
        |(tag, parts)| build_selector(tag, parts),
    )(input)
}

/// Parse a comma-separated list of compound selectors
pub(crate) fn selector_list<'a, E: NomParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, SmallVec<[Selector; 3]>, E> {
    map(separated_list1(comma, compound_selector), SmallVec::from_vec)(input)
}

fn build_selector(tag: Option<&str>, parts: Vec<Part<'_>>) -> Option<Selector> {
    if tag.is_none() && parts.is_empty() {
        return None;
    }

    let mut selector = Selector {
        tag: tag.map(str::to_ascii_lowercase),
        ..Selector::default()
    };
    for part in parts {
        match part {
            Part::Class(name) => selector.classes.push(name.to_string()),
            Part::Id(name) if selector.id.is_none() => selector.id = Some(name.to_string()),
            Part::Id(_) => return None,
        }
    }
    Some(selector)
}
