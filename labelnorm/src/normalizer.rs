//! Reference label normalizer
//!
//! A compact UTS-46 style pipeline: each grapheme is either an emoji sequence
//! or a run of individually mapped codepoints, mapped runs are NFC-composed,
//! and the result is validated against the label rules (underscores, label
//! extensions, placement, non-spacing marks, script mixtures and whole-script
//! confusables).

use itertools::Itertools;
use unicode_segmentation::UnicodeSegmentation;

use crate::cps::{explode_cp, is_mark, nfc_cps, nfd_cps, quoted_cp, str_from_cps};
use crate::error::{ErrorKind, NormError};
use crate::tables::{self, Script, FENCED, HYPHEN, UNDERSCORE};
use crate::token::{flatten_cps, Token};
use crate::{Normalize, Tokenize};

/// Limit of non-spacing marks on one base character.
pub const NSM_MAX: usize = 4;

#[derive(Debug, Clone)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    fn validate(&self, tokens: &[Token], cps: &[u32]) -> Result<(), NormError> {
        if cps.is_empty() {
            return Err(NormError::new(ErrorKind::EmptyLabel));
        }
        check_underscore(cps)?;
        check_label_extension(cps)?;
        check_placement(tokens, cps)?;
        self.check_nsm(cps)?;
        let scripts = label_scripts(cps);
        check_mixture(&scripts)?;
        check_whole_script(&scripts, cps)
    }

    fn check_nsm(&self, cps: &[u32]) -> Result<(), NormError> {
        let decomposed = nfd_cps(cps);
        let mut i = 0;
        while i < decomposed.len() {
            if !is_mark(decomposed[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < decomposed.len() && is_mark(decomposed[i]) {
                i += 1;
            }
            let marks = &decomposed[start..i];
            if let Some(dup) = marks.iter().duplicates().next() {
                return Err(NormError::with_detail(ErrorKind::DuplicateNsm, quoted_cp(*dup)));
            }
            if marks.len() > NSM_MAX {
                let base = start.saturating_sub(1);
                return Err(NormError::with_detail(
                    ErrorKind::ExcessiveNsm,
                    format!("\"{}\" ({}/{})", str_from_cps(&decomposed[base..i]), marks.len(), NSM_MAX),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenize for Normalizer {
    fn tokenize(&self, label: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for grapheme in label.graphemes(true) {
            let cps = explode_cp(grapheme);
            let n = emoji_prefix_len(&cps);
            if n > 0 {
                let input = cps[..n].to_vec();
                let resolved = input.iter().copied().filter(|&cp| !matches!(cp, 0xFE0E | 0xFE0F)).collect();
                tokens.push(Token::Emoji { input, cps: resolved });
            }
            tokens.extend(cps[n..].iter().map(|&cp| map_cp(cp)));
        }
        merge_valid(compose_runs(tokens))
    }
}

impl Normalize for Normalizer {
    fn normalize(&self, label: &str) -> Result<String, NormError> {
        if label.is_empty() {
            return Err(NormError::new(ErrorKind::EmptyLabel));
        }
        let tokens = self.tokenize(label);
        if let Some(cp) = tokens.iter().find_map(|t| match t {
            Token::Disallowed { cp } => Some(*cp),
            _ => None,
        }) {
            return Err(NormError::with_detail(ErrorKind::DisallowedCharacter, quoted_cp(cp)));
        }
        let cps = flatten_cps(&tokens);
        self.validate(&tokens, &cps)?;
        Ok(str_from_cps(&cps))
    }
}

fn emoji_prefix_len(cps: &[u32]) -> usize {
    let Some(&first) = cps.first() else {
        return 0;
    };
    let keycap = matches!(first, 0x23 | 0x2A | 0x30..=0x39) && cps.contains(&0x20E3);
    if !keycap && !tables::EMOJI.contains(first) {
        return 0;
    }
    1 + cps[1..]
        .iter()
        .take_while(|&&cp| tables::EMOJI.contains(cp) || tables::EMOJI_COMPONENTS.contains(cp))
        .count()
}

fn is_valid(cp: u32) -> bool {
    matches!(cp, 0x24 | HYPHEN | UNDERSCORE)
        || FENCED.contains(cp)
        || is_mark(cp)
        || char::from_u32(cp).is_some_and(char::is_alphanumeric)
}

fn map_cp(cp: u32) -> Token {
    if tables::IGNORED.contains(cp) {
        return Token::Ignored { cp };
    }
    if let Some(cps) = tables::mapped(cp) {
        return Token::Mapped { cp, cps };
    }
    if let Some(c) = char::from_u32(cp) {
        let lower: Vec<u32> = c.to_lowercase().map(u32::from).collect();
        if lower != [cp] {
            return Token::Mapped { cp, cps: lower };
        }
    }
    if is_valid(cp) {
        Token::Valid { cps: vec![cp] }
    } else {
        Token::Disallowed { cp }
    }
}

/// Split the token stream into segments that start at a non-mark and
/// NFC-compose each one; a segment that changes becomes a single `Nfc` token.
fn compose_runs(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut segment: Vec<Token> = Vec::new();
    for token in tokens {
        match token {
            Token::Emoji { .. } | Token::Disallowed { .. } => {
                flush_segment(&mut segment, &mut out);
                out.push(token);
            }
            _ => {
                let starter = token.cps().first().is_some_and(|&cp| !is_mark(cp));
                if starter {
                    flush_segment(&mut segment, &mut out);
                }
                segment.push(token);
            }
        }
    }
    flush_segment(&mut segment, &mut out);
    out
}

fn flush_segment(segment: &mut Vec<Token>, out: &mut Vec<Token>) {
    if segment.is_empty() {
        return;
    }
    let mapped = flatten_cps(segment);
    let composed = nfc_cps(&mapped);
    if composed == mapped {
        out.append(segment);
    } else {
        let input = segment.iter().flat_map(|t| t.input().iter().copied()).collect();
        segment.clear();
        out.push(Token::Nfc { input, cps: composed });
    }
}

fn merge_valid(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let (Some(Token::Valid { cps: prev }), Token::Valid { cps }) = (out.last_mut(), &token) {
            prev.extend_from_slice(cps);
            continue;
        }
        out.push(token);
    }
    out
}

fn check_underscore(cps: &[u32]) -> Result<(), NormError> {
    let leading = cps.iter().take_while(|&&cp| cp == UNDERSCORE).count();
    if cps[leading..].contains(&UNDERSCORE) {
        return Err(NormError::new(ErrorKind::UnderscorePlacement));
    }
    Ok(())
}

fn check_label_extension(cps: &[u32]) -> Result<(), NormError> {
    if cps.len() >= 4 && cps[2] == HYPHEN && cps[3] == HYPHEN && cps.iter().all(|&cp| cp < 0x80) {
        return Err(NormError::with_detail(
            ErrorKind::InvalidLabelExtension,
            format!("\"{}\"", str_from_cps(&cps[..4])),
        ));
    }
    Ok(())
}

fn check_placement(tokens: &[Token], cps: &[u32]) -> Result<(), NormError> {
    let placement = |detail: String| Err(NormError::with_detail(ErrorKind::IllegalPlacement, detail));
    if is_mark(cps[0]) {
        return placement("leading combining mark".to_string());
    }
    for (a, b) in tokens.iter().filter(|t| !t.cps().is_empty()).tuple_windows() {
        if a.is_emoji() && b.cps().first().is_some_and(|&cp| is_mark(cp)) {
            return placement("emoji + combining mark".to_string());
        }
    }
    if FENCED.contains(cps[0]) {
        return placement(format!("leading fenced: {}", str_from_cps(&cps[..1])));
    }
    if let Some(&last) = cps.last() {
        if FENCED.contains(last) {
            return placement(format!("trailing fenced: {}", str_from_cps(&[last])));
        }
    }
    if let Some((a, b)) = cps.iter().tuple_windows().find(|&(a, b)| FENCED.contains(*a) && FENCED.contains(*b)) {
        return placement(format!("consecutive fenced: {}", str_from_cps(&[*a, *b])));
    }
    Ok(())
}

/// Scripts of the label in first-seen order.
fn label_scripts(cps: &[u32]) -> Vec<Script> {
    cps.iter().filter_map(|&cp| tables::script_of(cp)).unique().collect()
}

fn check_mixture(scripts: &[Script]) -> Result<(), NormError> {
    let within = |allowed: &[Script]| scripts.iter().all(|s| allowed.contains(s));
    if scripts.len() <= 1 || within(&[Script::Han, Script::Kana]) || within(&[Script::Han, Script::Hangul]) {
        return Ok(());
    }
    Err(NormError::with_detail(
        ErrorKind::IllegalMixture,
        scripts.iter().map(|s| s.name()).join("/"),
    ))
}

fn check_whole_script(scripts: &[Script], cps: &[u32]) -> Result<(), NormError> {
    let lookalikes = match scripts {
        [Script::Cyrillic] => &*tables::CYRILLIC_LATIN,
        [Script::Greek] => &*tables::GREEK_LATIN,
        _ => return Ok(()),
    };
    let confusable = cps
        .iter()
        .filter(|&&cp| tables::script_of(cp).is_some())
        .all(|&cp| lookalikes.contains(cp));
    if confusable {
        return Err(NormError::with_detail(
            ErrorKind::WholeScriptConfusable,
            format!("{}/{}", scripts[0].name(), Script::Latin.name()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn norm(label: &str) -> Result<String, NormError> {
        Normalizer::new().normalize(label)
    }

    fn kind(label: &str) -> ErrorKind {
        norm(label).expect_err("label should fail").kind
    }

    #[test]
    fn test_identity_and_case() {
        assert_eq!(norm("foo"), Ok("foo".to_string()));
        assert_eq!(norm("FOO"), Ok("foo".to_string()));
        assert_eq!(norm("caf\u{E9}"), Ok("caf\u{E9}".to_string()));
    }

    #[test]
    fn test_mappings() {
        assert_eq!(norm("a\u{2013}b"), Ok("a-b".to_string()));
        assert_eq!(norm("\u{2460}\u{2461}"), Ok("12".to_string()));
        assert_eq!(norm("don't"), Ok("don\u{2019}t".to_string()));
        assert_eq!(norm("\u{FF21}bc"), Ok("abc".to_string()));
    }

    #[test]
    fn test_ignored() {
        assert_eq!(norm("a\u{AD}b"), Ok("ab".to_string()));
    }

    #[test]
    fn test_nfc_composition() {
        assert_eq!(norm("cafe\u{301}"), Ok("caf\u{E9}".to_string()));
        let tokens = Normalizer::new().tokenize("cafe\u{301}");
        assert_eq!(
            tokens,
            vec![
                Token::Valid { cps: vec![0x63, 0x61, 0x66] },
                Token::Nfc { input: vec![0x65, 0x301], cps: vec![0xE9] },
            ]
        );
    }

    #[test]
    fn test_emoji_tokens() {
        assert_eq!(norm("\u{2764}\u{FE0F}"), Ok("\u{2764}".to_string()));
        let tokens = Normalizer::new().tokenize("a\u{2764}\u{FE0F}");
        assert_eq!(
            tokens,
            vec![
                Token::Valid { cps: vec![0x61] },
                Token::Emoji { input: vec![0x2764, 0xFE0F], cps: vec![0x2764] },
            ]
        );
        assert_eq!(norm("\u{1F4A9}"), Ok("\u{1F4A9}".to_string()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(kind(""), ErrorKind::EmptyLabel);
        assert_eq!(kind("\u{200B}"), ErrorKind::EmptyLabel);
    }

    #[test]
    fn test_disallowed() {
        let err = norm("a b").expect_err("space is disallowed");
        assert_eq!(err.kind, ErrorKind::DisallowedCharacter);
        assert_eq!(err.detail.as_deref(), Some("{20}"));
        let err = norm("a!b").expect_err("bang is disallowed");
        assert_eq!(err.to_string(), "disallowed character: \"!\" {21}");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(norm("__ab"), Ok("__ab".to_string()));
        let err = norm("a_b").expect_err("inner underscore");
        assert_eq!(err, NormError::new(ErrorKind::UnderscorePlacement));
    }

    #[test]
    fn test_label_extension() {
        assert_eq!(kind("xn--abc"), ErrorKind::InvalidLabelExtension);
        assert_eq!(norm("a--b"), Ok("a--b".to_string()));
    }

    #[test]
    fn test_placement() {
        let detail = |label: &str| norm(label).expect_err("placement").detail.unwrap_or_default();
        assert_eq!(detail("\u{301}a"), "leading combining mark");
        assert_eq!(detail("'a"), "leading fenced: \u{2019}");
        assert_eq!(detail("a'"), "trailing fenced: \u{2019}");
        assert_eq!(detail("a''b"), "consecutive fenced: \u{2019}\u{2019}");
        assert_eq!(detail("\u{1F4A9}\u{301}"), "emoji + combining mark");
    }

    #[test]
    fn test_nsm() {
        assert_eq!(kind("a\u{301}\u{301}"), ErrorKind::DuplicateNsm);
        assert_eq!(kind("a\u{300}\u{301}\u{302}\u{303}\u{304}"), ErrorKind::ExcessiveNsm);
        assert!(norm("a\u{300}\u{301}").is_ok());
    }

    #[test]
    fn test_mixture() {
        let err = norm("a\u{434}").expect_err("latin + cyrillic");
        assert_eq!(err.to_string(), "illegal mixture: Latin/Cyrillic");
        assert!(norm("\u{65E5}\u{672C}\u{3054}").is_ok());
    }

    #[test]
    fn test_whole_script_confusable() {
        let err = norm("\u{440}\u{43E}\u{435}").expect_err("looks latin");
        assert_eq!(err.to_string(), "whole-script confusable: Cyrillic/Latin");
        assert!(norm("\u{434}\u{430}").is_ok());
    }
}
