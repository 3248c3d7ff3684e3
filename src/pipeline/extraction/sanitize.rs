/// Sanitize extracted text before passing downstream.
/// Strips control characters, trims every line and drops blank lines.
/// Printable characters are kept verbatim so flagged sentences can be
/// matched back to the source.
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "Claim: the\x00 moon";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x00'));
        assert_eq!(clean, "Claim: the moon");
    }

    #[test]
    fn strips_control_characters() {
        let raw = "Dose: 500mg\x01\x02\x03\nDate: 2024-01-15";
        let clean = sanitize_extracted_text(raw);
        assert!(!clean.contains('\x01'));
        assert!(clean.contains("500mg"));
        assert!(clean.contains("2024-01-15"));
    }

    #[test]
    fn preserves_punctuation_and_symbols() {
        let raw = "Price: $4.99 (≈ €4.60) — 100% “guaranteed”!";
        assert_eq!(sanitize_extracted_text(raw), raw);
    }

    #[test]
    fn collapses_blank_lines() {
        let raw = "Line one\n\n\n\nLine two\n\n\nLine three";
        assert_eq!(sanitize_extracted_text(raw), "Line one\nLine two\nLine three");
    }

    #[test]
    fn normalizes_crlf() {
        assert_eq!(sanitize_extracted_text("one\r\ntwo\r\n"), "one\ntwo");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_extracted_text(""), "");
        assert_eq!(sanitize_extracted_text(" \n \t \n"), "");
    }
}
