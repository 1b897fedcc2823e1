//! Terminal column measurement for strings that carry ANSI SGR sequences and
//! symbol/emoji code points.
//!
//! Symbol width is a heuristic, not a wcwidth table: every code point in
//! U+2000–U+2BFF or U+1F000–U+1FFFF is counted as `emoji_width` columns. The
//! ranges sweep in arrows, box glyphs and other non-emoji symbols too, which
//! is accepted; most terminals that render the statusline draw them wide.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Columns assumed for a symbol/emoji code point when nothing else is configured.
pub const DEFAULT_EMOJI_WIDTH: usize = 2;

static SGR_RE: OnceLock<Regex> = OnceLock::new();

// Parameters are restricted to digits and `;` so an unterminated sequence can
// never consume the visible text that follows it.
fn sgr_re() -> &'static Regex {
    SGR_RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap())
}

/// Remove every ANSI SGR sequence (`ESC [ ... m`).
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    sgr_re().replace_all(s, "")
}

fn is_zero_width(c: char) -> bool {
    matches!(
        c,
        '\u{FE00}'..='\u{FE0F}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}

fn is_wide_symbol(c: char) -> bool {
    matches!(c, '\u{2000}'..='\u{2BFF}' | '\u{1F000}'..='\u{1FFFF}')
}

/// Printable width of `s` in terminal columns.
///
/// SGR sequences and zero-width marks contribute nothing, symbol/emoji code
/// points contribute `emoji_width`, everything else one column.
pub fn visible_width(s: &str, emoji_width: usize) -> usize {
    strip_ansi(s)
        .chars()
        .filter(|c| !is_zero_width(*c))
        .map(|c| if is_wide_symbol(c) { emoji_width } else { 1 })
        .sum()
}

/// Append spaces until `s` is `target` columns wide. Never truncates.
pub fn pad_right(s: &str, target: usize, emoji_width: usize) -> String {
    let width = visible_width(s, emoji_width);
    if width >= target {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(target - width))
}

/// Prepend spaces until `s` is `target` columns wide. Never truncates.
pub fn pad_left(s: &str, target: usize, emoji_width: usize) -> String {
    let width = visible_width(s, emoji_width);
    if width >= target {
        return s.to_string();
    }
    format!("{}{s}", " ".repeat(target - width))
}
