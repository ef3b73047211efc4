// crates/citydex-core/src/text.rs

//! Text folding for index keys and queries.
//!
//! Matching in this crate is *case-folded prefix*: a stored name matches a
//! query iff its folded form textually starts with the folded query. Folding
//! is Unicode lowercasing only — diacritics survive, so `"São"` folds to
//! `"são"` and a query typed as `"sao"` will not match it. Transliteration
//! would change match semantics, not just presentation, so it is deliberately
//! not performed here.

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// # Examples
///
/// ```
/// use citydex_core::text::fold_key;
///
/// assert_eq!(fold_key("New York"), "new york");
/// assert_eq!(fold_key("SÃO PAULO"), "são paulo");
/// ```
pub fn fold_key(s: &str) -> String {
    s.to_lowercase()
}

/// Whether the first character of `s` is alphabetic.
///
/// Used by the catalog sort rule: letter-initial names order before names
/// starting with digits, symbols or emoji.
pub fn starts_with_letter(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_alphabetic)
}
