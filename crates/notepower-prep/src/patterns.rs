//! Title pattern and hook detection.
//!
//! Each pattern is an independent regular expression. A title may match any
//! number of them; results are reported in the fixed order of
//! [`TitlePattern::ALL`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePattern {
    Question,
    NumberList,
    HowTo,
    Experience,
    Confession,
    Negative,
    Transformation,
    Emotional,
}

impl TitlePattern {
    pub const ALL: [Self; 8] = [
        Self::Question,
        Self::NumberList,
        Self::HowTo,
        Self::Experience,
        Self::Confession,
        Self::Negative,
        Self::Transformation,
        Self::Emotional,
    ];

    /// Identifier used in output files and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::NumberList => "number_list",
            Self::HowTo => "how_to",
            Self::Experience => "experience",
            Self::Confession => "confession",
            Self::Negative => "negative",
            Self::Transformation => "transformation",
            Self::Emotional => "emotional",
        }
    }

    /// Japanese name used inside instruction text.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Question => "疑問形",
            Self::NumberList => "数字リスト",
            Self::HowTo => "ハウツー",
            Self::Experience => "体験談",
            Self::Confession => "告白系",
            Self::Negative => "ネガティブフック",
            Self::Transformation => "変化・成長",
            Self::Emotional => "感情的",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Self::Question => r"[？?]$|^なぜ|^どうして|^どう|とは？",
            Self::NumberList => r"^\d+つ|^\d+選|^\d+個|TOP\d+|\d+つの",
            Self::HowTo => r"^〜の方法|する方法|のやり方|の始め方|のコツ",
            Self::Experience => r"してみた|やってみた|を試した|体験記",
            Self::Confession => r"した話|という話|って話|の話$",
            Self::Negative => r"^やめた|辞めた|しない|捨てた|やらない",
            Self::Transformation => r"から|になった|に変わった|できるように",
            Self::Emotional => r"[！!]{2,}|本当に|マジで|ガチで|めちゃくちゃ",
        }
    }
}

/// A named predicate over title text.
pub struct PatternMatcher {
    pub pattern: TitlePattern,
    regex: Regex,
}

impl PatternMatcher {
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        self.regex.is_match(title)
    }
}

static MATCHERS: LazyLock<Vec<PatternMatcher>> = LazyLock::new(|| {
    TitlePattern::ALL
        .iter()
        .map(|&pattern| PatternMatcher {
            pattern,
            regex: Regex::new(pattern.source()).expect("valid regex"),
        })
        .collect()
});

/// The built-in matchers, in report order.
#[must_use]
pub fn default_matchers() -> &'static [PatternMatcher] {
    &MATCHERS
}

/// Every pattern in `matchers` that `title` satisfies.
#[must_use]
pub fn detect_patterns_with(matchers: &[PatternMatcher], title: &str) -> Vec<TitlePattern> {
    matchers
        .iter()
        .filter(|m| m.matches(title))
        .map(|m| m.pattern)
        .collect()
}

#[must_use]
pub fn detect_patterns(title: &str) -> Vec<TitlePattern> {
    detect_patterns_with(default_matchers(), title)
}

/// Attention hooks a title uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    UsesNumbers,
    UsesBrackets,
    EmotionalLanguage,
    NegativeHook,
    ShowsTransformation,
    Exclusivity,
}

impl Hook {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UsesNumbers => "uses_numbers",
            Self::UsesBrackets => "uses_brackets",
            Self::EmotionalLanguage => "emotional_language",
            Self::NegativeHook => "negative_hook",
            Self::ShowsTransformation => "shows_transformation",
            Self::Exclusivity => "exclusivity",
        }
    }
}

const EMOTIONAL_WORDS: &[&str] = &["本当に", "マジで", "ガチで", "めちゃくちゃ", "超", "最強", "神"];
const NEGATIVE_WORDS: &[&str] = &["やめた", "辞めた", "しない", "捨てた", "やらない", "失敗"];

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));
static BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[【】「」『』]").expect("valid regex"));
static TRANSFORMATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"になった|できた|変わった|達成").expect("valid regex"));
static EXCLUSIVITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"だけ|のみ|限定|秘密").expect("valid regex"));

/// Hooks present in `title`, in declaration order of [`Hook`].
#[must_use]
pub fn detect_hooks(title: &str) -> Vec<Hook> {
    let mut hooks = Vec::new();
    if DIGITS_RE.is_match(title) {
        hooks.push(Hook::UsesNumbers);
    }
    if BRACKETS_RE.is_match(title) {
        hooks.push(Hook::UsesBrackets);
    }
    if EMOTIONAL_WORDS.iter().any(|w| title.contains(w)) {
        hooks.push(Hook::EmotionalLanguage);
    }
    if NEGATIVE_WORDS.iter().any(|w| title.contains(w)) {
        hooks.push(Hook::NegativeHook);
    }
    if TRANSFORMATION_RE.is_match(title) {
        hooks.push(Hook::ShowsTransformation);
    }
    if EXCLUSIVITY_RE.is_match(title) {
        hooks.push(Hook::Exclusivity);
    }
    hooks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_form_detected_by_suffix_or_prefix() {
        assert!(detect_patterns("副業って本当に稼げるの？").contains(&TitlePattern::Question));
        assert!(detect_patterns("なぜ朝活は続かないのか").contains(&TitlePattern::Question));
    }

    #[test]
    fn number_list_and_how_to() {
        let p = detect_patterns("5つの習慣化のコツ");
        assert!(p.contains(&TitlePattern::NumberList));
        assert!(p.contains(&TitlePattern::HowTo));
    }

    #[test]
    fn title_may_match_no_pattern() {
        assert!(detect_patterns("日記").is_empty());
    }

    #[test]
    fn title_may_match_several_patterns_in_fixed_order() {
        let p = detect_patterns("仕事を辞めたという話。本当に人生が変わった");
        assert_eq!(
            p,
            vec![
                TitlePattern::Confession,
                TitlePattern::Negative,
                TitlePattern::Emotional
            ]
        );
    }

    #[test]
    fn custom_matcher_list_is_respected() {
        let only_emotional: Vec<PatternMatcher> = default_matchers()
            .iter()
            .filter(|m| m.pattern == TitlePattern::Emotional)
            .map(|m| PatternMatcher {
                pattern: m.pattern,
                regex: m.regex.clone(),
            })
            .collect();
        assert_eq!(
            detect_patterns_with(&only_emotional, "やってみた!!"),
            vec![TitlePattern::Emotional]
        );
    }

    #[test]
    fn pattern_names_serialize_snake_case() {
        let json = serde_json::to_string(&TitlePattern::NumberList).unwrap();
        assert_eq!(json, "\"number_list\"");
        assert_eq!(TitlePattern::HowTo.as_str(), "how_to");
    }

    #[test]
    fn hooks_are_reported_in_fixed_order() {
        let hooks = detect_hooks("【限定】3ヶ月で月10万円を達成した最強の方法");
        assert_eq!(
            hooks,
            vec![
                Hook::UsesNumbers,
                Hook::UsesBrackets,
                Hook::EmotionalLanguage,
                Hook::ShowsTransformation,
                Hook::Exclusivity
            ]
        );
    }

    #[test]
    fn negative_hook_from_failure_word() {
        assert_eq!(detect_hooks("失敗だらけの一年"), vec![Hook::NegativeHook]);
    }
}
