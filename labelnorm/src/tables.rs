//! Character data for the reference normalizer
//!
//! These tables are deliberately small: they cover the characters that the
//! breakdown reports care about (hyphen look-alikes, circled and negative
//! circled digits, IDNA demoji symbols, fullwidth ASCII, a compact emoji
//! repertoire and the common Latin look-alikes in Cyrillic and Greek). They
//! are not a substitute for the Unicode data files.

use once_cell::sync::Lazy;

use crate::cps::explode_cp;
use crate::cpspec::CodepointSet;

pub const HYPHEN: u32 = 0x2D;
pub const UNDERSCORE: u32 = 0x5F;

const IGNORED_SPEC: &str = "AD 200B..200D 2060 FEFF FE0E FE0F";

/// Allowed inside a label but never at its edges or twice in a row.
const FENCED_SPEC: &str = "B7 2019 2027 2044";

/// Presentation selectors and joiners that may appear inside an emoji sequence.
const EMOJI_COMPONENT_SPEC: &str = "200D 20E3 FE0E FE0F E0020..E007F";

const EMOJI_SPEC: &str = "
    A9 AE 203C 2049 231A 231B 2328 23CF 23E9..23F3 23F8..23FA 25AA 25AB 25B6 25C0 25FB..25FE
    2600..2604 260E 2611 2614 2615 2618 261D 2620 2622 2623 2626 262A 262E 262F 2638..263A
    2640 2642 2648..2653 265F 2660 2663 2665 2666 2668 267B 267E 267F 2692..2697 2699 269B
    269C 26A0 26A1 26A7 26AA 26AB 26B0 26B1 26BD 26BE 26C4 26C5 26C8 26CE 26CF 26D1 26D3
    26D4 26E9 26EA 26F0..26F5 26F7..26FA 26FD 2702 2705 2708..270D 270F 2712 2714 2716 271D
    2721 2728 2733 2734 2744 2747 274C 274E 2753..2755 2757 2763 2764 2795..2797 27A1 27B0
    27BF 2934 2935 2B05..2B07 2B1B 2B1C 2B50 2B55 3030 303D 1F004 1F0CF 1F170 1F171 1F17E
    1F17F 1F18E 1F191..1F19A 1F1E6..1F1FF 1F300..1F5FF 1F600..1F64F 1F680..1F6FF
    1F7E0..1F7EB 1F90C..1F9FF 1FA70..1FAFF
";

/// Cyrillic letters that read as Latin.
const CYRILLIC_LATIN_SPEC: &str = "430 435 43E 440 441 443 445 455 456 458 4BB 4CF 501 51B 51D";

/// Greek letters that read as Latin.
const GREEK_LATIN_SPEC: &str = "3B1 3B9 3BA 3BD 3BF 3C1 3C5 3C7";

fn table(spec: &str) -> CodepointSet {
    CodepointSet::from_spec(spec).expect("embedded codepoint table is well-formed")
}

pub static IGNORED: Lazy<CodepointSet> = Lazy::new(|| table(IGNORED_SPEC));
pub static FENCED: Lazy<CodepointSet> = Lazy::new(|| table(FENCED_SPEC));
pub static EMOJI: Lazy<CodepointSet> = Lazy::new(|| table(EMOJI_SPEC));
pub static EMOJI_COMPONENTS: Lazy<CodepointSet> = Lazy::new(|| table(EMOJI_COMPONENT_SPEC));
pub static CYRILLIC_LATIN: Lazy<CodepointSet> = Lazy::new(|| table(CYRILLIC_LATIN_SPEC));
pub static GREEK_LATIN: Lazy<CodepointSet> = Lazy::new(|| table(GREEK_LATIN_SPEC));

fn digits(n: u32) -> Vec<u32> {
    explode_cp(&n.to_string())
}

fn letter(offset: u32) -> Vec<u32> {
    vec![0x61 + offset]
}

/// Explicit replacements, applied before case folding.
pub fn mapped(cp: u32) -> Option<Vec<u32>> {
    let cps = match cp {
        0x27 => vec![0x2019],
        0x2010..=0x2015 | 0x2043 | 0x2212 | 0x23AF | 0x23E4 | 0x2E3A | 0x2E3B | 0xFE58 => vec![HYPHEN],
        // extended arabic-indic digits that share a shape with arabic-indic
        0x6F0..=0x6F3 | 0x6F7..=0x6F9 => vec![cp - 0x6F0 + 0x660],
        0x2460..=0x2473 => digits(cp - 0x2460 + 1),
        0x24EA | 0x24FF | 0x1F10B | 0x1F10C => vec![0x30],
        0x24EB..=0x24F4 => digits(cp - 0x24EB + 11),
        0x24F5..=0x24FE => digits(cp - 0x24F5 + 1),
        0x2776..=0x277F => digits(cp - 0x2776 + 1),
        0x2780..=0x2789 => digits(cp - 0x2780 + 1),
        0x278A..=0x2793 => digits(cp - 0x278A + 1),
        0x24B6..=0x24CF => letter(cp - 0x24B6),
        0x24D0..=0x24E9 => letter(cp - 0x24D0),
        0x1F150..=0x1F169 => letter(cp - 0x1F150),
        0xFF10..=0xFF19 => vec![cp - 0xFF10 + 0x30],
        0xFF21..=0xFF3A => letter(cp - 0xFF21),
        0xFF41..=0xFF5A => letter(cp - 0xFF41),
        0x2122 => vec![0x74, 0x6D],
        0x2139 => vec![0x69],
        0x3297 => vec![0x795D],
        0x3299 => vec![0x79D8],
        0x1F201 => vec![0x30B3, 0x30B3],
        0x1F202 => vec![0x30B5],
        0x1F21A => vec![0x7121],
        0x1F22F => vec![0x6307],
        0x1F232 => vec![0x7981],
        0x1F233 => vec![0x7A7A],
        0x1F234 => vec![0x5408],
        0x1F235 => vec![0x6E80],
        0x1F236 => vec![0x6709],
        0x1F237 => vec![0x6708],
        0x1F238 => vec![0x7533],
        0x1F239 => vec![0x5272],
        0x1F23A => vec![0x55B6],
        0x1F250 => vec![0x5F97],
        0x1F251 => vec![0x53EF],
        _ => return None,
    };
    Some(cps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Greek,
    Cyrillic,
    Armenian,
    Hebrew,
    Arabic,
    Devanagari,
    Thai,
    Hangul,
    Kana,
    Han,
}

impl Script {
    pub fn name(self) -> &'static str {
        match self {
            Script::Latin => "Latin",
            Script::Greek => "Greek",
            Script::Cyrillic => "Cyrillic",
            Script::Armenian => "Armenian",
            Script::Hebrew => "Hebrew",
            Script::Arabic => "Arabic",
            Script::Devanagari => "Devanagari",
            Script::Thai => "Thai",
            Script::Hangul => "Hangul",
            Script::Kana => "Kana",
            Script::Han => "Han",
        }
    }
}

const SCRIPT_RANGES: &[(u32, u32, Script)] = &[
    (0x41, 0x5A, Script::Latin),
    (0x61, 0x7A, Script::Latin),
    (0xC0, 0x24F, Script::Latin),
    (0x1E00, 0x1EFF, Script::Latin),
    (0x370, 0x3FF, Script::Greek),
    (0x1F00, 0x1FFF, Script::Greek),
    (0x400, 0x52F, Script::Cyrillic),
    (0x530, 0x58F, Script::Armenian),
    (0x590, 0x5FF, Script::Hebrew),
    (0x600, 0x6FF, Script::Arabic),
    (0x750, 0x77F, Script::Arabic),
    (0x900, 0x97F, Script::Devanagari),
    (0xE00, 0xE7F, Script::Thai),
    (0x1100, 0x11FF, Script::Hangul),
    (0x3130, 0x318F, Script::Hangul),
    (0xAC00, 0xD7AF, Script::Hangul),
    (0x3040, 0x30FF, Script::Kana),
    (0x3400, 0x4DBF, Script::Han),
    (0x4E00, 0x9FFF, Script::Han),
];

/// The script of a codepoint, or `None` for script-neutral characters
/// (digits, punctuation, marks, emoji).
pub fn script_of(cp: u32) -> Option<Script> {
    if crate::cps::is_mark(cp) || matches!(cp, 0x660..=0x669 | 0x6F0..=0x6F9) {
        return None;
    }
    SCRIPT_RANGES
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&cp))
        .map(|(_, _, script)| *script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_parse() {
        assert!(IGNORED.contains(0xFE0F));
        assert!(FENCED.contains(0x2019));
        assert!(EMOJI.contains(0x1F4A9));
        assert!(EMOJI.contains(0x2764));
        assert!(!EMOJI.contains(0x2122));
        assert!(EMOJI_COMPONENTS.contains(0x200D));
        assert!(CYRILLIC_LATIN.contains(0x430));
        assert!(GREEK_LATIN.contains(0x3BF));
    }

    #[test]
    fn test_hyphen_variants() {
        for cp in [0x2010, 0x2013, 0x2212, 0xFE58, 0x2E3B] {
            assert_eq!(mapped(cp), Some(vec![HYPHEN]), "{cp:X}");
        }
    }

    #[test]
    fn test_circled_digits() {
        assert_eq!(mapped(0x2460), Some(vec![0x31]));
        assert_eq!(mapped(0x2469), Some(vec![0x31, 0x30]));
        assert_eq!(mapped(0x24EB), Some(vec![0x31, 0x31]));
        assert_eq!(mapped(0x24F4), Some(vec![0x32, 0x30]));
        assert_eq!(mapped(0x1F10B), Some(vec![0x30]));
        assert_eq!(mapped(0x278A), Some(vec![0x31]));
    }

    #[test]
    fn test_letters_and_demoji() {
        assert_eq!(mapped(0x24D0), Some(vec![0x61]));
        assert_eq!(mapped(0x24C2), Some(vec![0x6D]));
        assert_eq!(mapped(0x1F169), Some(vec![0x7A]));
        assert_eq!(mapped(0x2122), Some(vec![0x74, 0x6D]));
        assert_eq!(mapped(0x61), None);
    }

    #[test]
    fn test_arabic_digits() {
        assert_eq!(mapped(0x6F1), Some(vec![0x661]));
        assert_eq!(mapped(0x6F9), Some(vec![0x669]));
        assert_eq!(mapped(0x6F4), None);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(script_of(0x61), Some(Script::Latin));
        assert_eq!(script_of(0x430), Some(Script::Cyrillic));
        assert_eq!(script_of(0x4E2D), Some(Script::Han));
        assert_eq!(script_of(0x31), None);
        assert_eq!(script_of(0x301), None);
        assert_eq!(script_of(0x661), None);
    }
}
