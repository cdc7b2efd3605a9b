use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Coarse root-collation groups: whitespace, punctuation, symbols, digits,
/// then letters.
fn char_class(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_alphabetic() {
        4
    } else if c.is_numeric() {
        3
    } else if matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~') {
        2
    } else if c.is_ascii_punctuation() || ('\u{2010}'..='\u{205E}').contains(&c) {
        1
    } else if c.is_control() {
        0
    } else {
        2
    }
}

fn primary(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_class(c), c))
}

fn secondary(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn tertiary(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd().map(char::is_uppercase)
}

/// Locale-aware string comparison.
///
/// Base characters decide first (grouped as whitespace, punctuation, symbols,
/// digits, letters), then accents, then case (lowercase first). Raw
/// code points break any remaining tie so the result is a total order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| secondary(a).cmp(secondary(b)))
        .then_with(|| tertiary(a).cmp(tertiary(b)))
        .then_with(|| a.cmp(b))
}
