//! Text canonicalization shared by the dispatcher and every parser.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercases, folds diacritics, collapses whitespace runs and trims.
///
/// Total: any input produces a (possibly empty) string.
///
/// ```
/// use dimclass_core::normalize;
///
/// assert_eq!(normalize("  Județul   BISTRIȚA-Năsăud "), "judetul bistrita-nasaud");
/// ```
pub fn normalize(text: &str) -> String {
    let folded = fold_diacritics(text).to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces every letter carrying a combining mark by its base letter.
///
/// Covers both the comma-below (ș, ț) and cedilla (ş, ţ) Romanian forms.
pub fn fold_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Tests whether `phrase` occurs in `text` on word boundaries.
///
/// Both arguments are expected to be normalized. A word boundary is the
/// start or end of the text or any character that is not alphanumeric.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// Tests whether any word of `text` starts with `prefix`.
pub fn has_word_starting_with(text: &str, prefix: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| !word.is_empty() && word.starts_with(prefix))
}
