use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};

use crate::model::{RawTriviaItem, TriviaItem};

// Longest HTML5 entity name is 31 chars ("CounterClockwiseContourIntegral").
const MAX_ENTITY_LEN: usize = 40;

// Names a browser also accepts without the trailing semicolon.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

// Numeric references 0x80..=0x9F name windows-1252 characters; 0 keeps the
// code point as is.
const C1_REPLACEMENTS: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

fn resolve_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or_else(|| resolve_html5_entity(name))
}

/// Maps a numeric reference to the character a browser shows for it.
fn numeric_char(code: u32) -> char {
    match code {
        0 | 0xD800..=0xDFFF => char::REPLACEMENT_CHARACTER,
        0x80..=0x9F => {
            let mapped = C1_REPLACEMENTS[(code - 0x80) as usize];
            char::from_u32(if mapped == 0 { code } else { mapped })
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        }
        _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

/// Decodes a `&#...` reference at the start of `s`. The semicolon is
/// optional; at least one digit is not.
fn numeric_reference(s: &str) -> Option<(char, usize)> {
    let body = s.strip_prefix("&#")?;
    let (radix, digits, prefix_len) = match body.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => (16, hex, 3),
        None => (10, body, 2),
    };
    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }
    // Anything past the last valid code point only needs to stay out of range.
    let code = digits[..len].chars().fold(0u32, |acc, c| {
        let digit = c.to_digit(radix).unwrap_or(0);
        acc.saturating_mul(radix).saturating_add(digit).min(0x11_0000)
    });
    let semicolon = usize::from(digits[len..].starts_with(';'));
    Some((numeric_char(code), prefix_len + len + semicolon))
}

/// Decodes a named reference at the start of `s`: a full `&name;` match
/// first, otherwise the longest legacy name that prefixes the run.
fn named_reference(s: &str) -> Option<(&'static str, usize)> {
    let body = s.strip_prefix('&')?;
    let run = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if run == 0 {
        return None;
    }
    if run <= MAX_ENTITY_LEN && body[run..].starts_with(';') {
        if let Some(text) = resolve_entity(&body[..run]) {
            return Some((text, run + 2));
        }
    }
    LEGACY_NAMES
        .iter()
        .filter(|name| body[..run].starts_with(**name))
        .max_by_key(|name| name.len())
        .and_then(|name| resolve_entity(name).map(|text| (text, name.len() + 1)))
}

/// Resolves HTML named and numeric character references in `raw` the way a
/// browser does for text content.
///
/// The input is treated as text, never as markup: tags stay literal and
/// anything that is not a known reference (`Q&A`, `&nope;`) is copied through
/// unchanged.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        if let Some((ch, len)) = numeric_reference(rest) {
            out.push(ch);
            rest = &rest[len..];
        } else if let Some((text, len)) = named_reference(rest) {
            out.push_str(text);
            rest = &rest[len..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_owned(raw: &str) -> String {
    decode_entities(raw).into_owned()
}

/// Maps a wire record to its display form.
pub fn decode_item(raw: &RawTriviaItem) -> TriviaItem {
    TriviaItem {
        category: decode_owned(&raw.category),
        kind: raw.kind.clone(),
        difficulty: raw.difficulty.clone(),
        question: decode_owned(&raw.question),
        correct_answer: decode_owned(&raw.correct_answer),
        incorrect_answers: raw
            .incorrect_answers
            .iter()
            .map(|a| decode_owned(a))
            .collect(),
    }
}

pub fn decode_items(raw: &[RawTriviaItem]) -> Vec<TriviaItem> {
    raw.iter().map(decode_item).collect()
}
