use notepower_core::{ArticleRecord, Scores};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::synth::synthesize;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn cleaned(title: &str, power: f64) -> CleanedRecord {
    let record = ArticleRecord {
        note_id: title.to_string(),
        key: title.to_string(),
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
fn fill_template_replaces_every_placeholder() {
    let mut rng = rng();
    for pattern in TitlePattern::ALL {
        for template in templates_for(pattern) {
            let filled = fill_template(template, &mut rng);
            assert!(!filled.contains('{'), "unfilled placeholder in {filled}");
        }
    }
}

#[test]
fn repeated_placeholders_are_filled_independently() {
    let filled = fill_template("{num}-{num}", &mut rng());
    assert!(!filled.contains("{num}"));
    assert_eq!(filled.matches('-').count(), 1);
}

#[test]
fn template_variations_are_distinct_and_bounded() {
    let variations = generate_template_variations(TitlePattern::NumberList, 30, &mut rng());
    assert!(!variations.is_empty());
    assert!(variations.len() <= 30);
    let unique: HashSet<&String> = variations.iter().collect();
    assert_eq!(unique.len(), variations.len());
}

#[test]
fn emotional_pattern_has_no_templates() {
    assert!(generate_template_variations(TitlePattern::Emotional, 10, &mut rng()).is_empty());
}

#[test]
fn pattern_target_tops_up_to_fifty_or_double() {
    assert_eq!(pattern_target(3), 50);
    assert_eq!(pattern_target(40), 80);
}

#[test]
fn transform_applies_every_rule_to_a_plain_title() {
    let out = transform_title("副業で成功した", &mut rng());
    assert_eq!(out.len(), 4);
    assert_eq!(out[0], "副業で成功したって本当？");
    assert!(out[1].starts_with('【') && out[1].ends_with("】副業で成功した"));
    assert!(out[2].ends_with("つの理由：副業で成功した"));
    assert_eq!(out[3], "副業で成功しなかった");
}

#[test]
fn transform_strips_brackets_and_rewrites_achievement() {
    let out = transform_title("【保存版】3ヶ月で月10万円を達成", &mut rng());
    assert_eq!(
        out,
        vec![
            "3ヶ月で月10万円を達成".to_string(),
            "【保存版】3ヶ月で月10万円を見直した".to_string()
        ]
    );
}

#[test]
fn short_title_keeps_brackets() {
    let out = transform_title("【短い】あいう", &mut rng());
    assert_eq!(out.len(), 1);
    assert!(out[0].ends_with("つの理由：【短い】あいう"));
}

#[test]
fn evolution_builds_on_previous_generation() {
    let examples = synthesize(&cleaned("日記", 1.5));
    let evolved = evolve_generations(&examples[0], EVOLUTION_GENERATIONS, &mut rng());
    assert_eq!(evolved.len(), 2);
    assert_eq!(evolved[0].generation, 1);
    assert_eq!(evolved[1].generation, 2);
    assert!(evolved[0].instruction.starts_with(&examples[0].instruction));
    assert!(evolved[1].instruction.starts_with(&evolved[0].instruction));
    assert!(evolved[1].instruction.len() > evolved[0].instruction.len());
    assert_eq!(evolved[1].output, "日記");
}

#[test]
fn augment_keeps_originals_first_and_dedups_synthetic_titles() {
    let records = vec![
        cleaned("副業で成功した", 1.5),
        cleaned("なぜ朝活は続かないのか？", 0.4),
    ];
    let instructions: Vec<_> = records.iter().flat_map(synthesize).collect();
    let result = augment(&records, &instructions, &mut rng());

    assert_eq!(result.originals, 2);
    assert_eq!(result.titles[0].source, TitleSource::Original);
    assert_eq!(result.titles[1].title, "なぜ朝活は続かないのか？");
    assert!(result.templated > 0);
    assert!(result.transformed > 0);
    assert_eq!(
        result.titles.len(),
        result.originals + result.templated + result.transformed
    );

    let unique: HashSet<&str> = result.titles.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(unique.len(), result.titles.len());

    assert!(result
        .titles
        .iter()
        .filter(|t| t.source == TitleSource::Template)
        .all(|t| t.category == SYNTHETIC_CATEGORY && t.pattern.is_some()));
    assert!(result
        .titles
        .iter()
        .filter(|t| t.source == TitleSource::Transform)
        .all(|t| t.original_title.is_some()));
    assert_eq!(result.evolved.len(), instructions.len() * 2);
}

#[test]
fn augment_is_reproducible_with_a_seed() {
    let records = vec![cleaned("3つの習慣で人生が変わった話", 2.0)];
    let instructions: Vec<_> = records.iter().flat_map(synthesize).collect();
    let a = augment(&records, &instructions, &mut rng());
    let b = augment(&records, &instructions, &mut rng());
    assert_eq!(a, b);
}

#[test]
fn augmented_title_omits_absent_fields() {
    let title = AugmentedTitle {
        title: "x".to_string(),
        category: "c".to_string(),
        power_score: 0.0,
        source: TitleSource::Template,
        pattern: Some(TitlePattern::HowTo),
        original_title: None,
    };
    let value = serde_json::to_value(&title).unwrap();
    assert_eq!(value["source"], "template");
    assert_eq!(value["pattern"], "how_to");
    assert!(value.get("original_title").is_none());
}
