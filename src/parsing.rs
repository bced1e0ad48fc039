//! Free-text participant list parsing.

/// Split user input into trimmed, non-empty labels.
///
/// Commas take priority over newlines: when the text has any comma, newlines
/// are left inside the labels. Input without either separator is a single
/// label.
pub fn parse_labels(text: &str) -> Vec<String> {
    let separator = if text.contains(',') {
        ','
    } else if text.contains('\n') {
        '\n'
    } else {
        let single = text.trim();
        return if single.is_empty() {
            Vec::new()
        } else {
            vec![single.to_string()]
        };
    };

    text.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commas() {
        assert_eq!(parse_labels("Pho, Bun Bo"), vec!["Pho", "Bun Bo"]);
        assert_eq!(parse_labels(" a ,, b , "), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_newlines() {
        assert_eq!(parse_labels("Pho\nBun Bo\n\n"), vec!["Pho", "Bun Bo"]);
    }

    #[test]
    fn test_commas_win_over_newlines() {
        assert_eq!(
            parse_labels("Pho, Bun Bo\nCom Tam"),
            vec!["Pho", "Bun Bo\nCom Tam"]
        );
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(parse_labels("  Banh Mi  "), vec!["Banh Mi"]);
        assert!(parse_labels("   ").is_empty());
        assert!(parse_labels("").is_empty());
    }
}
