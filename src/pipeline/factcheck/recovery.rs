use std::sync::LazyLock;

use regex::Regex;

use super::types::RiskLevel;

/// Confidence used when the model's reply carries no readable score.
pub const RECOVERY_DEFAULT_CONFIDENCE: u8 = 50;

/// Minimum length (characters) for a recovered line to count as a sentence.
const MIN_SENTENCE_CHARS: usize = 5;

/// "Fake sentences" section: everything after the label up to the next
/// line that opens with a risk/confidence label, or end of text. Bulleted
/// lines never terminate the section.
static FAKE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ims)fake[\s_-]*sentences[\s:*]*(.*?)(?:^[\s*#>]*(?:risk(?:[\s_-]*level)?|confidence(?:[\s_-]*(?:score|level))?)[\s*]*[:=]|\z)",
    )
    .unwrap()
});

/// `Risk Level: High` as a label opening its own line.
static RISK_LINE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^[\s*#>]*risk(?:[\s_-]*level)?[\s*]*[:=]["'\s*-]*([A-Za-z]+)"#).unwrap()
});

/// Looser form, used only when no line-anchored label carries a valid level.
static RISK_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\brisk(?:[\s_-]*level)?\b["'\s:=*-]*([A-Za-z]+)"#).unwrap()
});

static CONFIDENCE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bconfidence(?:[\s_-]*(?:score|level))?\b["'\s:=*-]*(\d+)"#).unwrap()
});

static LIST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,3}[.)]\s+").unwrap());

/// Fields salvaged from a reply that contained no parseable JSON object.
/// Each field is defaulted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredFields {
    pub fake_sentences: Vec<String>,
    pub risk_level: RiskLevel,
    pub confidence: u8,
}

impl Default for RecoveredFields {
    fn default() -> Self {
        Self {
            fake_sentences: Vec::new(),
            risk_level: RiskLevel::Low,
            confidence: RECOVERY_DEFAULT_CONFIDENCE,
        }
    }
}

/// Recover labeled fields from free-form model output.
///
/// Only the three narrowly labeled fields are trusted. The summary is never
/// taken from here; callers derive it from the source document.
pub fn recover_fields(raw: &str) -> RecoveredFields {
    RecoveredFields {
        fake_sentences: recover_fake_sentences(raw),
        risk_level: recover_risk_level(raw).unwrap_or_default(),
        confidence: recover_confidence(raw).unwrap_or(RECOVERY_DEFAULT_CONFIDENCE),
    }
}

fn recover_fake_sentences(raw: &str) -> Vec<String> {
    let Some(section) = FAKE_SECTION.captures(raw).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    section
        .as_str()
        .lines()
        .map(clean_line)
        .filter(|line| line.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

fn recover_risk_level(raw: &str) -> Option<RiskLevel> {
    // "risk" also shows up in prose and in flagged sentences; a label on its
    // own line wins over any mention inside running text.
    first_valid_level(&RISK_LINE_LABEL, raw).or_else(|| first_valid_level(&RISK_LABEL, raw))
}

fn first_valid_level(pattern: &Regex, raw: &str) -> Option<RiskLevel> {
    pattern
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .find_map(|m| RiskLevel::parse_label(m.as_str()))
}

fn recover_confidence(raw: &str) -> Option<u8> {
    let digits = CONFIDENCE_LABEL.captures(raw)?.get(1)?.as_str();
    Some(clamp_digits(digits))
}

/// Clamp a run of ASCII digits into `0..=100`. Runs too long for `u64` are
/// necessarily above the ceiling.
fn clamp_digits(digits: &str) -> u8 {
    digits.parse::<u64>().map(|v| v.min(100) as u8).unwrap_or(100)
}

fn is_leading_noise(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '-' | '*' | '•' | '·' | '>' | '"' | '\'' | '`' | '[' | '(' | '\u{201C}' | '\u{2018}'
        )
}

fn is_trailing_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`' | ',' | ']' | '\u{201D}' | '\u{2019}')
}

/// Strip bullets, quotes, brackets and list numbering around one line.
fn clean_line(line: &str) -> String {
    let line = line.trim_start_matches(is_leading_noise);
    let line = match LIST_NUMBER.find(line) {
        Some(m) => line[m.end()..].trim_start_matches(is_leading_noise),
        None => line,
    };
    line.trim_end_matches(is_trailing_noise).to_string()
}
