//! Sub-classification of the different-norm bucket
//!
//! A record is explained by the codepoints normalization removed from it.
//! When exactly one configured category owns one of those codepoints the
//! record goes there; otherwise it is tested as an emoji presentation fix
//! and finally falls through to the catch-all.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use labelnorm::cps::explode_cp;
use labelnorm::token::flatten_cps;
use labelnorm::{CodepointSet, CodepointSpecError, Token, Tokenize};
use nom::{
    bytes::complete::is_not,
    character::complete::char,
    combinator::{all_consuming, map, rest},
    sequence::separated_pair,
    IResult,
};
use thiserror::Error;
use tracing::{debug, warn};

pub const UNNORMALIZED_EMOJI: &str = "Unnormalized Emoji";
pub const EVERYTHING_ELSE: &str = "Everything Else";

pub const DEFAULT_CATEGORIES: &str = include_str!("../data/diff-categories.txt");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryConfigError {
    #[error("line {line}: expected `name = codepoints`")]
    Syntax { line: usize },
    #[error("line {line}: {source}")]
    Codepoints {
        line: usize,
        #[source]
        source: CodepointSpecError,
    },
    #[error("line {line}: category {name:?} has no codepoints")]
    Empty { line: usize, name: String },
    #[error("line {line}: duplicate category {name:?}")]
    Duplicate { line: usize, name: String },
}

/// A configured codepoint category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCategory {
    pub name: String,
    pub set: CodepointSet,
}

fn category_line(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(map(is_not("="), str::trim), char('='), rest)(input)
}

/// Parse a category file: one `name = codepoints` per line, `#` comments.
pub fn parse_categories(text: &str) -> Result<Vec<CharCategory>, CategoryConfigError> {
    let mut categories: Vec<CharCategory> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (_, (name, spec)) = all_consuming(category_line)(trimmed).map_err(|_| CategoryConfigError::Syntax { line })?;
        if name.is_empty() {
            return Err(CategoryConfigError::Syntax { line });
        }
        let set = CodepointSet::from_spec(spec).map_err(|source| CategoryConfigError::Codepoints { line, source })?;
        if set.is_empty() {
            return Err(CategoryConfigError::Empty {
                line,
                name: name.to_string(),
            });
        }
        if categories.iter().any(|c| c.name == name) {
            return Err(CategoryConfigError::Duplicate {
                line,
                name: name.to_string(),
            });
        }
        categories.push(CharCategory {
            name: name.to_string(),
            set,
        });
    }
    Ok(categories)
}

pub fn default_categories() -> Result<Vec<CharCategory>, CategoryConfigError> {
    parse_categories(DEFAULT_CATEGORIES)
}

pub fn read_categories(path: &Path) -> Result<Vec<CharCategory>> {
    let text = fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;
    parse_categories(&text).with_context(|| format!("in {}", path.display()))
}

/// A different-norm record with the tokenization of its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub label: String,
    pub norm: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKind {
    Codepoints(CodepointSet),
    Emoji,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub kind: CategoryKind,
    pub entries: Vec<DiffEntry>,
}

impl Category {
    fn new(name: &str, kind: CategoryKind) -> Self {
        Self {
            name: name.to_string(),
            slug: slug(name),
            kind,
            entries: Vec::new(),
        }
    }

    pub fn set(&self) -> Option<&CodepointSet> {
        match &self.kind {
            CategoryKind::Codepoints(set) => Some(set),
            _ => None,
        }
    }
}

/// Lowercased, spaces replaced by `_`.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Unique codepoints of `label`, first-seen order, that `norm` lacks.
pub fn complement(label: &str, norm: &str) -> Vec<u32> {
    let normed = CodepointSet::from_iter(explode_cp(norm));
    explode_cp(label).into_iter().unique().filter(|&cp| !normed.contains(cp)).collect()
}

/// Emoji tokens all changed and the output is exactly the tokens' resolution.
fn is_unnormalized_emoji(tokens: &[Token], norm: &str) -> bool {
    let mut emoji = tokens.iter().filter(|t| t.is_emoji()).peekable();
    emoji.peek().is_some() && emoji.all(Token::is_changed) && explode_cp(norm) == flatten_cps(tokens)
}

/// Partition different-norm records into categories.
///
/// The result holds only non-empty categories, sorted by descending size;
/// equal sizes keep configuration order, with the emoji and catch-all
/// categories last.
pub fn categorize<'a, I, T>(records: I, tokenizer: &T, chars: &[CharCategory]) -> Vec<Category>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
    T: Tokenize + ?Sized,
{
    let mut categories: Vec<Category> = chars
        .iter()
        .map(|c| Category::new(&c.name, CategoryKind::Codepoints(c.set.clone())))
        .collect();
    let emoji = categories.len();
    categories.push(Category::new(UNNORMALIZED_EMOJI, CategoryKind::Emoji));
    let other = categories.len();
    categories.push(Category::new(EVERYTHING_ELSE, CategoryKind::Other));

    for (label, norm) in records {
        let tokens = tokenizer.tokenize(label);
        let removed = complement(label, norm);
        let matched = chars
            .iter()
            .positions(|c| c.set.intersects(&removed))
            .collect::<Vec<_>>();
        let index = match matched.as_slice() {
            [only] => *only,
            _ if is_unnormalized_emoji(&tokens, norm) => emoji,
            _ => other,
        };
        categories[index].entries.push(DiffEntry {
            label: label.to_string(),
            norm: norm.to_string(),
            tokens,
        });
    }

    let unexplained = &categories[other].entries;
    if !unexplained.is_empty() {
        warn!(count = unexplained.len(), "different-norm labels outside every category");
        for entry in unexplained {
            debug!(label = %entry.label, norm = %entry.norm, "uncategorized");
        }
    }

    categories.retain(|c| !c.entries.is_empty());
    categories.sort_by(|a, b| b.entries.len().cmp(&a.entries.len()));
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelnorm::Normalizer;
    use pretty_assertions::assert_eq;

    fn names(categories: &[Category]) -> Vec<(&str, usize)> {
        categories.iter().map(|c| (c.name.as_str(), c.entries.len())).collect()
    }

    #[test]
    fn test_default_categories() {
        let cats = default_categories().expect("embedded categories parse");
        assert_eq!(cats.len(), 12);
        assert_eq!(cats[0].name, "Arabic");
        assert_eq!(cats[1].name, "Hyphen");
        assert!(cats[1].set.contains(0x2013));
        assert_eq!(cats[11].name, "[IDNA] Demoji");
        assert_eq!(cats[11].set.len(), 20);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_categories("# ok\nno equals here"),
            Err(CategoryConfigError::Syntax { line: 2 })
        );
        assert_eq!(parse_categories(" = 2D"), Err(CategoryConfigError::Syntax { line: 1 }));
        assert!(matches!(
            parse_categories("A = 2D..2C"),
            Err(CategoryConfigError::Codepoints { line: 1, .. })
        ));
        assert!(matches!(parse_categories("A = "), Err(CategoryConfigError::Empty { line: 1, .. })));
        assert!(matches!(
            parse_categories("A = 2D\nA = 2E"),
            Err(CategoryConfigError::Duplicate { line: 2, .. })
        ));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("[IDNA] Circled Digit"), "[idna]_circled_digit");
        assert_eq!(slug(EVERYTHING_ELSE), "everything_else");
    }

    #[test]
    fn test_complement() {
        assert_eq!(complement("a\u{2013}\u{2013}b", "a-b"), vec![0x2013]);
        assert_eq!(complement("ab", "ab"), Vec::<u32>::new());
    }

    #[test]
    fn test_hyphen_lands_in_hyphen() {
        let cats = default_categories().expect("categories");
        let out = categorize([("a\u{2013}b", "a-b")], &Normalizer::new(), &cats);
        assert_eq!(names(&out), vec![("Hyphen", 1)]);
        assert_eq!(out[0].slug, "hyphen");
        assert_eq!(out[0].entries[0].tokens.len(), 3);
    }

    #[test]
    fn test_multiple_sets_fall_through() {
        let cats = default_categories().expect("categories");
        let out = categorize([("\u{2013}\u{2460}", "-1")], &Normalizer::new(), &cats);
        assert_eq!(names(&out), vec![(EVERYTHING_ELSE, 1)]);
    }

    #[test]
    fn test_unnormalized_emoji() {
        let cats = default_categories().expect("categories");
        let out = categorize([("\u{2764}\u{FE0F}a", "\u{2764}a")], &Normalizer::new(), &cats);
        assert_eq!(names(&out), vec![(UNNORMALIZED_EMOJI, 1)]);
    }

    #[test]
    fn test_sorted_by_size() {
        let cats = default_categories().expect("categories");
        let records = [
            ("\u{2460}", "1"),
            ("a\u{2013}", "a-"),
            ("b\u{2014}", "b-"),
            ("x\u{2122}", "xtm"),
        ];
        let out = categorize(records, &Normalizer::new(), &cats);
        assert_eq!(
            names(&out),
            vec![("Hyphen", 2), ("[IDNA] Circled Digit", 1), ("[IDNA] Demoji", 1)]
        );
    }

    #[test]
    fn test_categories_partition_input() {
        let cats = default_categories().expect("categories");
        let records = [
            ("a\u{2013}", "a-"),
            ("\u{2013}\u{2460}", "-1"),
            ("\u{2764}\u{FE0F}", "\u{2764}"),
            ("zz", "zy"),
        ];
        let out = categorize(records, &Normalizer::new(), &cats);
        let total: usize = out.iter().map(|c| c.entries.len()).sum();
        assert_eq!(total, records.len());
    }
}
