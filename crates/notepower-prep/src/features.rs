//! Lexical title features, quality score, and difficulty classification.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::{Hook, TitlePattern};

/// Character counts by script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharTypes {
    pub hiragana: usize,
    pub katakana: usize,
    pub kanji: usize,
    pub number: usize,
    pub alphabet: usize,
    pub symbol: usize,
}

impl CharTypes {
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut t = Self::default();
        for c in text.chars() {
            match c {
                '\u{3040}'..='\u{309F}' => t.hiragana += 1,
                '\u{30A0}'..='\u{30FF}' => t.katakana += 1,
                '\u{4E00}'..='\u{9FFF}' => t.kanji += 1,
                c if c.is_numeric() => t.number += 1,
                c if c.is_alphabetic() => t.alphabet += 1,
                _ => t.symbol += 1,
            }
        }
        t
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.hiragana + self.katakana + self.kanji + self.number + self.alphabet + self.symbol
    }
}

/// Flags and counts extracted from a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFeatures {
    /// Length in characters.
    pub length: usize,
    pub has_brackets: bool,
    pub has_numbers: bool,
    pub has_emoji: bool,
    pub has_question: bool,
    pub has_exclamation: bool,
    pub has_pipe: bool,
    pub word_count: usize,
    pub has_money_term: bool,
    pub has_action_verb: bool,
    pub char_types: CharTypes,
}

static BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[【】「」『』\[\]]").expect("valid regex"));
static NUMBERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E6}-\x{1F1FF}\x{2702}-\x{27B0}\x{1F910}-\x{1F9FF}\x{1FA70}-\x{1FAF6}]",
    )
    .expect("valid regex")
});
static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"稼|万円|収益|月収|副業|収入").expect("valid regex"));
static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"やってみた|してみた|試した|始め|挑戦").expect("valid regex"));

#[must_use]
pub fn extract_features(title: &str) -> TitleFeatures {
    TitleFeatures {
        length: title.chars().count(),
        has_brackets: BRACKETS_RE.is_match(title),
        has_numbers: NUMBERS_RE.is_match(title),
        has_emoji: EMOJI_RE.is_match(title),
        has_question: title.contains(['?', '？']),
        has_exclamation: title.contains(['!', '！']),
        has_pipe: title.contains(['|', '｜']),
        word_count: title.split_whitespace().count(),
        has_money_term: MONEY_RE.is_match(title),
        has_action_verb: ACTION_RE.is_match(title),
        char_types: CharTypes::of(title),
    }
}

/// Heuristic title quality in `[0, 1]`.
///
/// Starts at 0.5; rewards 15–40 character titles, detected patterns and
/// hooks (each capped), and a kanji share between 20% and 50%. Very short
/// or very long titles lose 0.1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quality_score(features: &TitleFeatures, patterns: &[TitlePattern], hooks: &[Hook]) -> f64 {
    let mut score = 0.5;

    let length = features.length;
    if (15..=40).contains(&length) {
        score += 0.1;
    } else if !(10..=60).contains(&length) {
        score -= 0.1;
    }

    score += (patterns.len() as f64 * 0.05).min(0.15);
    score += (hooks.len() as f64 * 0.05).min(0.2);

    let total = features.char_types.total();
    if total > 0 {
        let kanji_ratio = features.char_types.kanji as f64 / total as f64;
        if (0.2..=0.5).contains(&kanji_ratio) {
            score += 0.05;
        }
    }

    score.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Power score at which a title counts as hard to reproduce.
pub const HIGH_POWER_SCORE: f64 = 3.0;

/// Classifies how hard a title is to reproduce.
///
/// Complexity starts at the pattern count, gains one point above 30
/// characters and another above 50, and two points for a power score of at
/// least [`HIGH_POWER_SCORE`]. Up to 2 is easy, up to 4 medium, else hard.
#[must_use]
pub fn classify_difficulty(pattern_count: usize, title_chars: usize, power_score: f64) -> Difficulty {
    let mut complexity = pattern_count;
    if title_chars > 30 {
        complexity += 1;
    }
    if title_chars > 50 {
        complexity += 1;
    }
    if power_score >= HIGH_POWER_SCORE {
        complexity += 2;
    }

    match complexity {
        0..=2 => Difficulty::Easy,
        3..=4 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}
