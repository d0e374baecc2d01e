// src/core/sanitize.rs

/// Drop one leading and one trailing `"` (each independently).
pub fn strip_quote_pair(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

/// Trim, then strip a single pair of surrounding quotes.
pub fn clean_cell(s: &str) -> String {
    s!(strip_quote_pair(s.trim()))
}

/// Case- and whitespace-insensitive key fragment.
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Keep ASCII word chars (`[A-Za-z0-9_]`), whitespace and hyphens.
pub fn keep_slug_chars(s: &str) -> String {
    s.chars()
        .filter(|&ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch.is_whitespace())
        .collect()
}

/// Collapse runs of whitespace, `_` and `-` into one `-`, then trim `-` at both ends.
pub fn hyphenate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            if !in_run { out.push('-'); in_run = true; }
        } else { out.push(ch); in_run = false; }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quote_pair_variants() {
        assert_eq!(strip_quote_pair("\"Austin\""), "Austin");
        assert_eq!(strip_quote_pair("\"open"), "open");
        assert_eq!(strip_quote_pair("plain"), "plain");
        assert_eq!(strip_quote_pair("\""), "");
        assert_eq!(strip_quote_pair("\"\"x\"\""), "\"x\"");
    }

    #[test]
    fn hyphenate_collapses_mixed_runs() {
        assert_eq!(hyphenate("  a _- b--c__ "), "a-b-c");
        assert_eq!(hyphenate("---"), "");
    }

    #[test]
    fn keep_slug_chars_drops_punct_and_non_ascii() {
        assert_eq!(keep_slug_chars("Joe's Café & Co."), "Joes Caf  Co");
    }
}
