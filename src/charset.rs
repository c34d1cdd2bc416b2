/// Returns true if `ch` may appear in a lexicon entry.
///
/// The allowed set is ASCII letters and digits, ASCII punctuation, and
/// whitespace. Whitespace follows the Unicode White_Space property, plus the
/// ASCII information separators (U+001C..=U+001F).
pub fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_ascii_punctuation() || is_whitespace(ch)
}

/// Unicode White_Space plus the ASCII information separators.
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Strips leading and trailing [`is_whitespace`] characters.
pub fn trim(text: &str) -> &str {
    text.trim_matches(is_whitespace)
}

/// A word is clean iff every character passes [`is_allowed`]. Empty words are clean.
pub fn is_clean(word: &str) -> bool {
    word.chars().all(is_allowed)
}

/// The opposite of [`is_clean`].
pub fn is_strange(word: &str) -> bool {
    !is_clean(word)
}
