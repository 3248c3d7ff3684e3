/// Number of leading document sentences used as a fallback summary.
const FALLBACK_SUMMARY_SENTENCES: usize = 3;

/// Character cap for the fallback summary of unpunctuated documents.
const FALLBACK_SUMMARY_CHARS: usize = 200;

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into sentence-like units on whitespace that directly follows
/// `.`, `!` or `?`. Pieces are trimmed and empty pieces dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (idx, c) in text.char_indices() {
        if c.is_whitespace() && prev.is_some_and(is_terminal) {
            push_trimmed(&mut sentences, &text[start..idx]);
            start = idx;
        }
        prev = Some(c);
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Summary derived from the document alone, used whenever the model's own
/// summary is missing or untrusted: the first three sentences, or the first
/// 200 characters when the document has no sentence-terminal punctuation.
pub fn fallback_summary(document: &str) -> String {
    let trimmed = document.trim();
    if !trimmed.chars().any(is_terminal) {
        return trimmed.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    }

    split_sentences(trimmed)
        .into_iter()
        .take(FALLBACK_SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ")
}
