/// Lowercases and trims text for case-insensitive comparison.
pub(crate) fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes text for fuzzy comparison: lowercase, non-alphanumerics to spaces.
pub(crate) fn normalize_text(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("FORM-00001 | Mesa (madeira)"), "form 00001 mesa madeira");
        assert_eq!(normalize_text("  Cadeira  giratória "), "cadeira giratória");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("  Código "), "código");
    }
}
