//! Text helpers for building and parsing shell-like command lines.
//!
//! These are plain value-in/value-out functions. The synchronization
//! primitives do not depend on them.

use std::cmp::Ordering;

/// Quote characters recognized by the `_ex` variants.
const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Returns `true` for a space or a tab.
pub fn is_tab_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns `true` for a space, tab, vertical tab or form feed.
///
/// Line breaks are not included: they terminate a command line.
pub fn is_any_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}')
}

/// Strips leading spaces and tabs.
pub fn trim_leading_tab_spaces(s: &str) -> &str {
    s.trim_start_matches(is_tab_space)
}

/// Strips trailing spaces and tabs.
pub fn trim_trailing_tab_spaces(s: &str) -> &str {
    s.trim_end_matches(is_tab_space)
}

/// Strips leading characters matched by [`is_any_space`].
pub fn trim_leading_any_spaces(s: &str) -> &str {
    s.trim_start_matches(is_any_space)
}

/// Strips trailing characters matched by [`is_any_space`].
pub fn trim_trailing_any_spaces(s: &str) -> &str {
    s.trim_end_matches(is_any_space)
}

/// Converts `a`-`z` to `A`-`Z`, leaving every other character unchanged.
pub fn latin_upper(c: char) -> char {
    c.to_ascii_uppercase()
}

/// Converts `A`-`Z` to `a`-`z`, leaving every other character unchanged.
pub fn latin_lower(c: char) -> char {
    c.to_ascii_lowercase()
}

/// Lowercases the whole string, Unicode-aware.
///
/// Unlike [`latin_lower`], non-ASCII letters are converted too.
pub fn to_lower(s: &str) -> String {
    s.to_lowercase()
}

/// Uppercases the whole string, Unicode-aware.
pub fn to_upper(s: &str) -> String {
    s.to_uppercase()
}

/// Compares two strings case-insensitively.
pub fn cmp_no_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Wraps `s` in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

/// Removes one surrounding pair of double quotes, if present.
pub fn unquote(s: &str) -> &str {
    if is_quoted(s) { &s[1..s.len() - 1] } else { s }
}

/// Removes one surrounding pair of `"`, `'` or `` ` ``, if present.
pub fn unquote_ex(s: &str) -> &str {
    if is_quoted_ex(s) { &s[1..s.len() - 1] } else { s }
}

/// Returns `true` if `s` starts and ends with a double quote.
pub fn is_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

/// Returns `true` if `s` starts and ends with the same quote character.
pub fn is_quoted_ex(s: &str) -> bool {
    match s.chars().next() {
        Some(q) if QUOTES.contains(&q) => s.len() >= 2 && s.ends_with(q),
        _ => false,
    }
}

/// Returns `true` if `s` neither starts nor ends with a double quote.
pub fn is_not_quoted(s: &str) -> bool {
    !s.starts_with('"') && !s.ends_with('"')
}

/// Returns `true` if `s` neither starts nor ends with any quote character.
pub fn is_not_quoted_ex(s: &str) -> bool {
    !s.starts_with(&QUOTES[..]) && !s.ends_with(&QUOTES[..])
}

/// Escapes backslashes, tabs, line breaks and double quotes.
///
/// `\` becomes `\\`, TAB `\t`, CR `\r`, LF `\n` and `"` becomes `\"`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }

    out
}

/// Reverses [`escape`], also turning `\?` into `?`.
///
/// Unknown sequences and a trailing lone backslash are kept verbatim.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('?') => out.push('?'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Renders an address as `0x...`, used to tell plugin instances apart in logs.
pub fn instance_string<T: ?Sized>(instance: *const T) -> String {
    format!("{instance:p}")
}

/// Encodes `s` as UTF-16 code units, the form wide OS APIs expect.
///
/// No terminating nul is appended.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Decodes UTF-16 code units into a `String`.
///
/// Decoding stops at the first nul unit, if any. Unpaired surrogates
/// become U+FFFD. Only UTF-8 and UTF-16 are supported; legacy ANSI
/// code pages are not.
pub fn from_wide(units: &[u16]) -> String {
    let len = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..len])
}
