//! Codepoint utilities
//!
//! Labels are handled as sequences of `u32` codepoints wherever a comparison
//! or a set operation is needed. This module converts between strings and
//! codepoints, applies NFC/NFD to codepoint runs, and formats codepoints for
//! display in reports and error details.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Dotted circle, used as a visible base when displaying a lone combining mark.
const DOTTED_CIRCLE: char = '\u{25CC}';

/// Split a string into its codepoints.
pub fn explode_cp(s: &str) -> Vec<u32> {
    s.chars().map(u32::from).collect()
}

/// Build a string from codepoints, skipping anything that is not a scalar value.
pub fn str_from_cps(cps: &[u32]) -> String {
    cps.iter().filter_map(|&cp| char::from_u32(cp)).collect()
}

/// Uppercase hex, at least two digits (`2D`, `2013`, `1F10B`).
pub fn hex_cp(cp: u32) -> String {
    format!("{cp:02X}")
}

/// Hex codepoints joined by single spaces.
pub fn hex_seq(cps: &[u32]) -> String {
    cps.iter().map(|&cp| hex_cp(cp)).collect::<Vec<_>>().join(" ")
}

/// True for codepoints that should never be shown raw: controls, whitespace,
/// bidi/format characters and variation selectors.
pub fn should_escape(cp: u32) -> bool {
    match char::from_u32(cp) {
        None => true,
        Some(c) => {
            c.is_control()
                || c.is_whitespace()
                || matches!(cp, 0xAD | 0x200B..=0x200F | 0x2028..=0x202E | 0x2060..=0x206F | 0xFE00..=0xFE0F | 0xFEFF)
        }
    }
}

/// True if the codepoint is a combining mark.
pub fn is_mark(cp: u32) -> bool {
    char::from_u32(cp).map(is_combining_mark).unwrap_or(false)
}

/// Displayable form of a single codepoint.
///
/// Combining marks are drawn on a dotted circle and escaped codepoints are
/// replaced by their `{HEX}` form.
pub fn safe_str(cp: u32) -> String {
    if should_escape(cp) {
        return format!("{{{}}}", hex_cp(cp));
    }
    let mut out = String::new();
    if is_mark(cp) {
        out.push(DOTTED_CIRCLE);
    }
    out.extend(char::from_u32(cp));
    out
}

/// Quoted form used inside error details: `"x" {78}`, or just `{200B}` for
/// codepoints that must not be shown raw.
pub fn quoted_cp(cp: u32) -> String {
    if should_escape(cp) {
        format!("{{{}}}", hex_cp(cp))
    } else {
        format!("\"{}\" {{{}}}", safe_str(cp), hex_cp(cp))
    }
}

/// NFC-compose a run of codepoints.
pub fn nfc_cps(cps: &[u32]) -> Vec<u32> {
    explode_cp(&str_from_cps(cps).nfc().collect::<String>())
}

/// NFD-decompose a run of codepoints.
pub fn nfd_cps(cps: &[u32]) -> Vec<u32> {
    explode_cp(&str_from_cps(cps).nfd().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explode_and_rebuild() {
        let cps = explode_cp("a💩");
        assert_eq!(cps, vec![0x61, 0x1F4A9]);
        assert_eq!(str_from_cps(&cps), "a💩");
    }

    #[test]
    fn test_str_from_cps_skips_surrogates() {
        assert_eq!(str_from_cps(&[0x61, 0xD800, 0x62]), "ab");
    }

    #[test]
    fn test_hex_cp_padding() {
        assert_eq!(hex_cp(0x5), "05");
        assert_eq!(hex_cp(0x2D), "2D");
        assert_eq!(hex_cp(0x1F10B), "1F10B");
        assert_eq!(hex_seq(&[0x61, 0x2013]), "61 2013");
    }

    #[test]
    fn test_safe_str() {
        assert_eq!(safe_str(0x61), "a");
        assert_eq!(safe_str(0x301), "\u{25CC}\u{301}");
        assert_eq!(safe_str(0x200B), "{200B}");
    }

    #[test]
    fn test_quoted_cp() {
        assert_eq!(quoted_cp(0x21), "\"!\" {21}");
        assert_eq!(quoted_cp(0x20), "{20}");
    }

    #[test]
    fn test_nfc_and_nfd() {
        // e + combining acute composes to é
        assert_eq!(nfc_cps(&[0x65, 0x301]), vec![0xE9]);
        assert_eq!(nfd_cps(&[0xE9]), vec![0x65, 0x301]);
        assert_eq!(nfc_cps(&[0x61, 0x62]), vec![0x61, 0x62]);
    }
}
