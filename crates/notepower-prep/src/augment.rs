//! Synthetic title generation and instruction evolution.
//!
//! Every random choice goes through the caller's [`Rng`], so a seeded
//! generator reproduces a run exactly.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clean::CleanedRecord;
use crate::patterns::TitlePattern;
use crate::synth::{ExampleMetadata, InstructionExample};

/// Floor for the per-pattern synthetic target.
pub const MIN_PATTERN_TARGET: usize = 50;

/// Generations of evolution applied to each instruction example.
pub const EVOLUTION_GENERATIONS: u32 = 2;

/// Category assigned to template-generated titles.
pub const SYNTHETIC_CATEGORY: &str = "synthetic";

/// Title templates per pattern. Emotional titles have none.
#[must_use]
pub fn templates_for(pattern: TitlePattern) -> &'static [&'static str] {
    match pattern {
        TitlePattern::Question => &[
            "なぜ{keyword}で{result}できたのか？",
            "{keyword}って{question}なの？",
            "どうして{action}すると{result}になるのか",
            "{keyword}で悩んでいませんか？",
        ],
        TitlePattern::NumberList => &[
            "{keyword}で成功する{num}つの方法",
            "【{num}選】{keyword}のおすすめ{category}",
            "{keyword}を始める前に知っておくべき{num}つのこと",
            "{action}するための{num}ステップ",
        ],
        TitlePattern::HowTo => &[
            "{keyword}の始め方【初心者向け】",
            "{action}する方法を徹底解説",
            "誰でもできる{keyword}のコツ",
            "{keyword}を成功させる具体的な手順",
        ],
        TitlePattern::Experience => &[
            "{period}{action}してみた結果",
            "{keyword}を{period}続けてわかったこと",
            "【体験記】{action}したら{result}になった",
            "{keyword}に挑戦して{num}ヶ月が経ちました",
        ],
        TitlePattern::Confession => &[
            "{action}した話",
            "{keyword}で{result}になった話",
            "私が{action}を決意した理由",
            "{keyword}について本音で語る",
        ],
        TitlePattern::Negative => &[
            "{keyword}をやめたら{result}になった",
            "なぜ私は{action}をしないのか",
            "{keyword}で失敗した{num}つの原因",
            "{action}しない方がいい理由",
        ],
        TitlePattern::Transformation => &[
            "{before}から{after}に変わった方法",
            "{keyword}で人生が変わった",
            "{period}で{result}を達成した全記録",
            "ダメダメだった私が{result}できるようになるまで",
        ],
        TitlePattern::Emotional => &[],
    }
}

/// Placeholder vocabulary, filled in this order.
const VOCABULARY: &[(&str, &[&str])] = &[
    (
        "{keyword}",
        &[
            "副業", "投資", "英語学習", "プログラミング", "ブログ", "YouTube", "転職", "起業",
            "フリーランス", "資産形成", "読書", "筋トレ", "瞑想", "朝活", "時短術", "ミニマリスト",
            "自己投資", "習慣化",
        ],
    ),
    (
        "{action}",
        &[
            "始める", "やめる", "続ける", "挑戦する", "学ぶ", "実践する", "変える", "捨てる",
            "手放す", "取り入れる", "見直す",
        ],
    ),
    (
        "{result}",
        &[
            "成功", "収益化", "月10万円", "自由な時間", "心の余裕", "フォロワー1000人", "PV10倍",
            "人生が変わる", "スキルアップ",
        ],
    ),
    ("{period}", &["1週間", "1ヶ月", "3ヶ月", "半年", "1年", "100日"]),
    ("{num}", &["3", "5", "7", "10", "12", "15", "20", "30", "50", "100"]),
    ("{before}", &["会社員", "初心者", "素人", "ゼロ", "マイナス"]),
    ("{after}", &["フリーランス", "プロ", "専門家", "月収100万", "独立"]),
    ("{question}", &["本当", "効果的", "意味がある", "必要", "おすすめ"]),
    ("{category}", &["ツール", "方法", "書籍", "サービス", "アプリ"]),
];

/// Replaces each placeholder occurrence with an independently chosen word.
pub fn fill_template<R: Rng + ?Sized>(template: &str, rng: &mut R) -> String {
    let mut out = template.to_string();
    for (placeholder, words) in VOCABULARY {
        while let Some(pos) = out.find(placeholder) {
            let Some(word) = words.choose(rng) else {
                break;
            };
            out.replace_range(pos..pos + placeholder.len(), word);
        }
    }
    out
}

/// Up to `count` distinct titles drawn from the pattern's templates.
pub fn generate_template_variations<R: Rng + ?Sized>(
    pattern: TitlePattern,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let templates = templates_for(pattern);
    let mut variations: Vec<String> = Vec::new();
    for _ in 0..count {
        let Some(template) = templates.choose(rng) else {
            break;
        };
        let title = fill_template(template, rng);
        if !variations.contains(&title) {
            variations.push(title);
        }
    }
    variations
}

static ENDS_WITH_SHITA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)した$").expect("valid regex"));
static BRACKET_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【.*?】").expect("valid regex"));
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));

const BRACKET_TAGS: &[&str] = &["保存版", "完全ガイド", "初心者向け", "2026年版"];
const LIST_COUNTS: &[&str] = &["3", "5", "7"];
/// Positive phrasings and their negative rewrites; the first match wins.
const NEGATIVE_REWRITES: &[(&str, &str)] = &[
    ("した", "しなかった"),
    ("できた", "やめた"),
    ("成功", "失敗から学んだ"),
    ("達成", "見直した"),
];
/// Minimum characters left after stripping bracket tags.
const MIN_STRIPPED_CHARS: usize = 5;

/// Rule-based rewrites of an existing title.
pub fn transform_title<R: Rng + ?Sized>(title: &str, rng: &mut R) -> Vec<String> {
    let mut out = Vec::new();

    if !title.ends_with(['？', '?']) {
        let question = ENDS_WITH_SHITA_RE.replace(title, "${1}したって本当？");
        if question != title {
            out.push(question.into_owned());
        }
    }

    if title.contains('【') {
        let stripped = BRACKET_TAG_RE.replace_all(title, "");
        let stripped = stripped.trim();
        if stripped.chars().count() > MIN_STRIPPED_CHARS {
            out.push(stripped.to_string());
        }
    } else if let Some(tag) = BRACKET_TAGS.choose(rng) {
        out.push(format!("【{tag}】{title}"));
    }

    if !DIGIT_RE.is_match(title) {
        if let Some(n) = LIST_COUNTS.choose(rng) {
            out.push(format!("{n}つの理由：{title}"));
        }
    }

    if let Some((pos, neg)) = NEGATIVE_REWRITES
        .iter()
        .find(|(pos, _)| title.contains(*pos))
    {
        out.push(title.replace(*pos, neg));
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionKind {
    Depth,
    Breadth,
    Constraints,
}

impl EvolutionKind {
    pub const ALL: [Self; 3] = [Self::Depth, Self::Breadth, Self::Constraints];

    fn additions(self) -> &'static [&'static str] {
        match self {
            Self::Depth => &[
                "特に、読者の感情を動かす要素を含めてください。",
                "SEOを意識しつつも、クリック率を高める工夫を入れてください。",
                "タイトルの最初の5文字で読者の注意を引くことを意識してください。",
                "具体的な数字や期間を含めると効果的です。",
                "読者が「自分ごと」として捉えられる表現を使ってください。",
            ],
            Self::Breadth => &[
                "また、同じテーマで異なるアプローチのタイトル案も3つ考えてください。",
                "このタイトルを「疑問形」「体験談形」「ハウツー形」の3パターンで作成してください。",
                "初心者向けと上級者向けの2バージョンを作成してください。",
            ],
            Self::Constraints => &[
                "ただし、30文字以内で収めてください。",
                "ただし、疑問形は使わないでください。",
                "ただし、数字を必ず1つ含めてください。",
                "ただし、ネガティブな表現から始めてください。",
                "ただし、括弧【】を効果的に使ってください。",
            ],
        }
    }
}

/// An instruction example after one or more rounds of evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolvedInstruction {
    pub instruction: String,
    pub input: String,
    pub output: String,
    pub metadata: ExampleMetadata,
    pub evolution_type: EvolutionKind,
    pub generation: u32,
}

/// Appends one randomly chosen requirement to the instruction text.
pub fn evolve<R: Rng + ?Sized>(instruction: &str, kind: EvolutionKind, rng: &mut R) -> String {
    match kind.additions().choose(rng) {
        Some(addition) => format!("{instruction} {addition}"),
        None => instruction.to_string(),
    }
}

/// Evolves `example` for `generations` rounds, each building on the last.
pub fn evolve_generations<R: Rng + ?Sized>(
    example: &InstructionExample,
    generations: u32,
    rng: &mut R,
) -> Vec<EvolvedInstruction> {
    let mut out: Vec<EvolvedInstruction> = Vec::with_capacity(generations as usize);
    let mut instruction = example.instruction.clone();
    for generation in 1..=generations {
        let kind = *EvolutionKind::ALL
            .choose(rng)
            .unwrap_or(&EvolutionKind::Depth);
        instruction = evolve(&instruction, kind, rng);
        out.push(EvolvedInstruction {
            instruction: instruction.clone(),
            input: example.input.clone(),
            output: example.output.clone(),
            metadata: example.metadata.clone(),
            evolution_type: kind,
            generation,
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSource {
    Original,
    Template,
    Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedTitle {
    pub title: String,
    pub category: String,
    pub power_score: f64,
    pub source: TitleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<TitlePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Augmentation {
    /// Original titles followed by unique synthetic ones.
    pub titles: Vec<AugmentedTitle>,
    pub evolved: Vec<EvolvedInstruction>,
    pub originals: usize,
    pub templated: usize,
    pub transformed: usize,
}

/// Synthetic title target for a pattern seen `count` times.
#[must_use]
pub fn pattern_target(count: usize) -> usize {
    MIN_PATTERN_TARGET.max(count * 2)
}

/// Builds the augmented title set and evolved instructions.
///
/// Synthetic titles never repeat each other or an original title.
pub fn augment<R: Rng + ?Sized>(
    records: &[CleanedRecord],
    instructions: &[InstructionExample],
    rng: &mut R,
) -> Augmentation {
    let mut result = Augmentation {
        originals: records.len(),
        ..Augmentation::default()
    };
    let mut seen: HashSet<String> = HashSet::new();

    for r in records {
        seen.insert(r.title.clone());
        result.titles.push(AugmentedTitle {
            title: r.title.clone(),
            category: r.category.clone(),
            power_score: r.power_score,
            source: TitleSource::Original,
            pattern: None,
            original_title: None,
        });
    }

    let mut pattern_counts: BTreeMap<TitlePattern, usize> = BTreeMap::new();
    for p in records.iter().flat_map(|r| r.patterns.iter()) {
        *pattern_counts.entry(*p).or_insert(0) += 1;
    }

    for (pattern, count) in pattern_counts {
        let needed = pattern_target(count) - count;
        for title in generate_template_variations(pattern, needed, rng) {
            if seen.insert(title.clone()) {
                result.templated += 1;
                result.titles.push(AugmentedTitle {
                    title,
                    category: SYNTHETIC_CATEGORY.to_string(),
                    power_score: 0.0,
                    source: TitleSource::Template,
                    pattern: Some(pattern),
                    original_title: None,
                });
            }
        }
    }

    for r in records {
        for title in transform_title(&r.title, rng) {
            if seen.insert(title.clone()) {
                result.transformed += 1;
                result.titles.push(AugmentedTitle {
                    title,
                    category: r.category.clone(),
                    power_score: 0.0,
                    source: TitleSource::Transform,
                    pattern: None,
                    original_title: Some(r.title.clone()),
                });
            }
        }
    }

    for example in instructions {
        result
            .evolved
            .extend(evolve_generations(example, EVOLUTION_GENERATIONS, rng));
    }

    tracing::info!(
        originals = result.originals,
        templated = result.templated,
        transformed = result.transformed,
        evolved = result.evolved.len(),
        "augmentation complete"
    );

    result
}

#[cfg(test)]
#[path = "augment_test.rs"]
mod tests;
