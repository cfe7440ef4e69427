//! Parser for codepoint set specifications
//!
//! A specification is a whitespace separated list of hex codepoints and
//! inclusive ranges, e.g. `6F0..6F3 6F7..6F9 2212`. This is the notation used
//! by the embedded character tables and by the diff category configuration.

use std::collections::HashSet;

use nom::{
    bytes::complete::tag,
    character::complete::{hex_digit1, multispace0, multispace1},
    combinator::{all_consuming, map_res, opt},
    multi::separated_list0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use thiserror::Error;

const MAX_CP: u32 = 0x10FFFF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodepointSpecError {
    #[error("invalid codepoint spec near {0:?}")]
    Syntax(String),
    #[error("inverted codepoint range {0:X}..{1:X}")]
    InvertedRange(u32, u32),
    #[error("codepoint {0:X} is out of range")]
    OutOfRange(u32),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Item {
    Single(u32),
    Range(u32, u32),
}

fn codepoint(input: &str) -> IResult<&str, u32> {
    map_res(hex_digit1, |s: &str| u32::from_str_radix(s, 16))(input)
}

fn item(input: &str) -> IResult<&str, Item> {
    let (input, (first, last)) = pair(codepoint, opt(preceded(tag(".."), codepoint)))(input)?;
    let item = match last {
        Some(last) => Item::Range(first, last),
        None => Item::Single(first),
    };
    Ok((input, item))
}

fn items(input: &str) -> IResult<&str, Vec<Item>> {
    delimited(multispace0, separated_list0(multispace1, item), multispace0)(input)
}

/// Expand a specification into its codepoints, in the order written.
///
/// Duplicates are kept; use [`CodepointSet`] when set semantics are needed.
pub fn parse_cps(spec: &str) -> Result<Vec<u32>, CodepointSpecError> {
    let (_, items) = all_consuming(items)(spec).map_err(|e| {
        let rest = match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input.to_string(),
            nom::Err::Incomplete(_) => String::new(),
        };
        CodepointSpecError::Syntax(rest)
    })?;
    let mut cps = Vec::new();
    for item in items {
        match item {
            Item::Single(cp) => {
                if cp > MAX_CP {
                    return Err(CodepointSpecError::OutOfRange(cp));
                }
                cps.push(cp);
            }
            Item::Range(a, b) => {
                if b > MAX_CP {
                    return Err(CodepointSpecError::OutOfRange(b));
                }
                if a > b {
                    return Err(CodepointSpecError::InvertedRange(a, b));
                }
                cps.extend(a..=b);
            }
        }
    }
    Ok(cps)
}

/// An ordered set of codepoints: iteration follows the specification order,
/// membership tests are hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodepointSet {
    ordered: Vec<u32>,
    lookup: HashSet<u32>,
}

impl CodepointSet {
    pub fn from_spec(spec: &str) -> Result<Self, CodepointSpecError> {
        Ok(parse_cps(spec)?.into_iter().collect())
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.lookup.contains(&cp)
    }

    /// True if any of `cps` is a member.
    pub fn intersects(&self, cps: &[u32]) -> bool {
        cps.iter().any(|&cp| self.contains(cp))
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ordered.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl FromIterator<u32> for CodepointSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = CodepointSet::default();
        for cp in iter {
            if set.lookup.insert(cp) {
                set.ordered.push(cp);
            }
        }
        set
    }
}
