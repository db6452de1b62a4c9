//! Best-effort rubric extraction from the coach's free-text scoring reply.
//!
//! The evaluation prompt asks the model to emit five lines of the form
//! `Label: N/20`, but the reply is natural language and the format drifts:
//! markdown bold around the label, a bilingual alias in parentheses, a
//! full-width colon, a missing `/20` suffix.  [`RubricScores::parse`]
//! tolerates all of that and returns `None` whenever fewer than five valid
//! scores are found — partial score sets are discarded outright.
//!
//! This is a known-lossy boundary, not a hardened contract: a parse miss
//! is an expected, normal outcome and the session simply carries no
//! scores.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum points per rubric dimension.
pub const MAX_SCORE: u8 = 20;

// ---------------------------------------------------------------------------
// RubricScores
// ---------------------------------------------------------------------------

/// The five-dimension 0–20 evaluation of a practised pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubricScores {
    /// How much of the delivery was the student's own phrasing.
    pub originality: u8,
    /// Clarity of English pronunciation, incl. technical terms.
    pub pronunciation: u8,
    /// Intonation, pacing and emphasis.
    pub engaging_tone: u8,
    /// Logical structure and completeness of the content.
    pub content_delivery: u8,
    /// Staying within the three-minute window at a steady pace.
    pub time_management: u8,
}

impl RubricScores {
    /// Sum across all five dimensions (0–100).
    pub fn total(&self) -> u16 {
        self.originality as u16
            + self.pronunciation as u16
            + self.engaging_tone as u16
            + self.content_delivery as u16
            + self.time_management as u16
    }

    /// Scan `text` for all five labelled scores.
    ///
    /// Returns `Some` only when every label is found with an integer in
    /// `0..=20`; otherwise `None`.  Pure: the same input always yields the
    /// same output, and this function never panics or errors.
    pub fn parse(text: &str) -> Option<RubricScores> {
        let patterns = score_patterns();
        let scores = RubricScores {
            originality: extract_score(text, &patterns.originality)?,
            pronunciation: extract_score(text, &patterns.pronunciation)?,
            engaging_tone: extract_score(text, &patterns.engaging_tone)?,
            content_delivery: extract_score(text, &patterns.content_delivery)?,
            time_management: extract_score(text, &patterns.time_management)?,
        };
        Some(scores)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// One compiled pattern per rubric dimension.
struct ScorePatterns {
    originality: Regex,
    pronunciation: Regex,
    engaging_tone: Regex,
    content_delivery: Regex,
    time_management: Regex,
}

/// Static storage for the compiled patterns (initialized once).
static SCORE_PATTERNS: OnceLock<ScorePatterns> = OnceLock::new();

/// Returns the compiled patterns, building them on first access.
fn score_patterns() -> &'static ScorePatterns {
    SCORE_PATTERNS.get_or_init(|| ScorePatterns {
        originality: score_regex("originality"),
        pronunciation: score_regex("pronunciation"),
        engaging_tone: score_regex(r"engaging[ \t]+tone"),
        content_delivery: score_regex(r"content[ \t]+delivery"),
        time_management: score_regex(r"time[ \t]+management"),
    })
}

/// Compile the `label … : N` pattern for one dimension.
///
/// Tolerated around the label: trailing markdown bold (`**Label**`), a
/// parenthesised alias (ASCII or full-width), whitespace.  Tolerated
/// around the number: brackets, a `/20` suffix, ASCII or full-width colon.
fn score_regex(label: &str) -> Regex {
    let pattern = format!(
        r"(?i){label}\*{{0,2}}\s*(?:\([^)]*\)|（[^）]*）)?\s*[:：]\s*\[?(\d{{1,3}})\]?\s*(?:/\s*20)?"
    );
    // The patterns are fixed at compile time; a failure here is a bug, not
    // an input condition.
    Regex::new(&pattern).expect("rubric score pattern must compile")
}

/// Run one dimension's pattern over `text` and return the score when it
/// is a valid integer in `0..=MAX_SCORE`.
fn extract_score(text: &str, re: &Regex) -> Option<u8> {
    let captures = re.captures(text)?;
    let value: u8 = captures.get(1)?.as_str().parse().ok()?;
    if value > MAX_SCORE {
        return None;
    }
    Some(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
