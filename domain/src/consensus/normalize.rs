//! Response text normalization

/// Normalize a response for comparison.
///
/// Lowercases, drops punctuation and symbols (anything that is not
/// alphanumeric, `_` or whitespace), trims, and collapses whitespace runs to
/// a single space.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
