//! Character-safe truncation.
//!
//! Prompt excerpts and fallback values are bounded by a count of Unicode
//! scalar values, never by bytes, so a multi-byte character is never split.

/// Return the first `max_chars` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
