//! Instruction and evaluation example synthesis.

use serde::{Deserialize, Serialize};

use crate::clean::{CleanedRecord, Label};
use crate::features::{Difficulty, TitleFeatures};
use crate::patterns::{Hook, TitlePattern};

/// Number of detected patterns named in the pattern-style instruction.
const NAMED_PATTERNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleMetadata {
    pub power_score: f64,
    pub engagement_rate: f64,
    pub virality_score: f64,
    pub patterns: Vec<TitlePattern>,
    pub hooks: Vec<Hook>,
    pub difficulty: Difficulty,
    pub quality_score: f64,
    pub features: TitleFeatures,
}

impl ExampleMetadata {
    fn of(record: &CleanedRecord) -> Self {
        Self {
            power_score: record.power_score,
            engagement_rate: record.engagement_rate,
            virality_score: record.virality_score,
            patterns: record.patterns.clone(),
            hooks: record.hooks.clone(),
            difficulty: record.difficulty,
            quality_score: record.quality_score,
            features: record.features.clone(),
        }
    }
}

/// A generation-style training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionExample {
    pub instruction: String,
    pub input: String,
    pub output: String,
    pub metadata: ExampleMetadata,
}

/// Builds the instruction variants for one record: a baseline pair, a
/// pattern-naming pair when any pattern was detected, and an advanced pair for
/// medium or hard titles.
#[must_use]
pub fn synthesize(record: &CleanedRecord) -> Vec<InstructionExample> {
    let metadata = ExampleMetadata::of(record);
    let category = record.category.as_str();
    let mut variants = Vec::with_capacity(3);

    variants.push(InstructionExample {
        instruction: format!(
            "以下のテーマに関する、読者を惹きつけるnote記事のタイトルを考えてください。\nテーマ: {category}"
        ),
        input: String::new(),
        output: record.title.clone(),
        metadata: metadata.clone(),
    });

    if !record.patterns.is_empty() {
        let named = record
            .patterns
            .iter()
            .take(NAMED_PATTERNS)
            .map(|p| p.display_name())
            .collect::<Vec<_>>()
            .join("・");
        variants.push(InstructionExample {
            instruction: format!("「{named}」のパターンを使った、バズるnote記事のタイトルを作成してください。"),
            input: format!("カテゴリ: {category}"),
            output: record.title.clone(),
            metadata: metadata.clone(),
        });
    }

    if matches!(record.difficulty, Difficulty::Medium | Difficulty::Hard) {
        let patterns = join_ids(record.patterns.iter().map(|p| p.as_str()));
        let hooks = join_ids(record.hooks.iter().map(|h| h.as_str()));
        variants.push(InstructionExample {
            instruction: "高いエンゲージメントを獲得した実績のあるタイトルパターンを参考に、同様の効果が期待できるタイトルを生成してください。".to_string(),
            input: format!("分野: {category}\n成功パターン: {patterns}\nフック要素: {hooks}"),
            output: record.title.clone(),
            metadata,
        });
    }

    variants
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}

/// Instruction examples for every `success` record, in input order.
#[must_use]
pub fn synthesize_all(records: &[CleanedRecord]) -> Vec<InstructionExample> {
    records
        .iter()
        .filter(|r| r.is_success())
        .flat_map(synthesize)
        .collect()
}

/// A prompt/completion example asking the model to rate a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationExample {
    pub id: String,
    pub title: String,
    pub label: Label,
    pub power_score: f64,
    pub likes: u64,
    pub followers: u64,
    pub prompt: String,
    pub completion: String,
}

impl EvaluationExample {
    #[must_use]
    pub fn from_record(record: &CleanedRecord) -> Self {
        let verdict = match record.label {
            Label::Success => "高エンゲージメント",
            Label::Normal => "標準",
        };
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            label: record.label,
            power_score: record.power_score,
            likes: record.likes,
            followers: record.followers,
            prompt: format!(
                "以下の条件でnote記事のタイトルを評価してください。\nタイトル: {}\n\n評価:",
                record.title
            ),
            completion: format!(" {verdict}（スコア: {:.2}）", record.power_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use notepower_core::{ArticleRecord, Scores};

    use super::*;

    fn cleaned(title: &str, power: f64) -> CleanedRecord {
        let record = ArticleRecord {
            note_id: "1".to_string(),
            key: "n1".to_string(),
            title: title.to_string(),
            body_preview: String::new(),
            user_id: "taro".to_string(),
            user_nickname: String::new(),
            follower_count: 100,
            like_count: 100,
            comment_count: 0,
            price: 0,
            is_paid: false,
            published_at: String::new(),
            url: String::new(),
            category: "career".to_string(),
            keyword: "転職".to_string(),
            scores: Scores {
                power_score: power,
                engagement_rate: power,
                virality_score: 1.0,
            },
        };
        CleanedRecord::from_record(&record, 1.0)
    }

    #[test]
    fn plain_easy_title_yields_only_baseline() {
        let examples = synthesize(&cleaned("日記", 1.2));
        assert_eq!(examples.len(), 1);
        assert_eq!(
            examples[0].instruction,
            "以下のテーマに関する、読者を惹きつけるnote記事のタイトルを考えてください。\nテーマ: career"
        );
        assert!(examples[0].input.is_empty());
        assert_eq!(examples[0].output, "日記");
    }

    #[test]
    fn pattern_pair_names_at_most_two_patterns() {
        let r = cleaned("仕事を辞めたという話。本当に人生が変わった", 1.2);
        assert_eq!(r.patterns.len(), 3);
        let examples = synthesize(&r);
        assert_eq!(
            examples[1].instruction,
            "「告白系・ネガティブフック」のパターンを使った、バズるnote記事のタイトルを作成してください。"
        );
        assert_eq!(examples[1].input, "カテゴリ: career");
    }

    #[test]
    fn medium_title_gets_advanced_pair() {
        let r = cleaned("なぜ私は会社を辞めたのか？", 3.5);
        assert_eq!(r.difficulty, Difficulty::Medium);
        let examples = synthesize(&r);
        assert_eq!(examples.len(), 3);
        assert_eq!(
            examples[2].input,
            "分野: career\n成功パターン: question, negative\nフック要素: negative_hook"
        );
        assert!((examples[2].metadata.power_score - 3.5).abs() < 1e-9);
    }

    #[test]
    fn only_success_records_become_instructions() {
        let records = vec![cleaned("日記", 1.5), cleaned("メモ", 0.2)];
        let examples = synthesize_all(&records);
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].output, "日記");
    }

    #[test]
    fn evaluation_completion_reflects_label_and_score() {
        let hit = EvaluationExample::from_record(&cleaned("日記", 1.234));
        assert_eq!(hit.completion, " 高エンゲージメント（スコア: 1.23）");
        assert_eq!(
            hit.prompt,
            "以下の条件でnote記事のタイトルを評価してください。\nタイトル: 日記\n\n評価:"
        );

        let miss = EvaluationExample::from_record(&cleaned("日記", 0.5));
        assert_eq!(miss.completion, " 標準（スコア: 0.50）");
        assert_eq!(miss.label, Label::Normal);
    }
}
