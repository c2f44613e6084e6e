//! Cleaning, feature extraction, example synthesis, and augmentation over
//! the raw record store.
//!
//! Everything here is pure computation; callers own file I/O.

pub mod augment;
pub mod clean;
pub mod error;
pub mod features;
pub mod patterns;
pub mod report;
pub mod stats;
pub mod synth;

use notepower_core::ArticleRecord;

pub use augment::{augment, transform_title, Augmentation, AugmentedTitle, EvolvedInstruction};
pub use clean::{clean, CleanConfig, CleanReport, CleanedRecord, Label};
pub use error::PrepError;
pub use features::{classify_difficulty, extract_features, Difficulty, TitleFeatures};
pub use patterns::{detect_hooks, detect_patterns, Hook, TitlePattern};
pub use report::QualityReport;
pub use stats::DatasetStats;
pub use synth::{synthesize, synthesize_all, EvaluationExample, InstructionExample};

/// Outputs of one preparation pass.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub cleaned: Vec<CleanedRecord>,
    pub evaluation: Vec<EvaluationExample>,
    pub instructions: Vec<InstructionExample>,
    pub report: QualityReport,
}

/// Cleans `raw`, analyses every surviving title, and builds the evaluation
/// and instruction examples plus the quality report.
#[must_use]
pub fn prepare(raw: Vec<ArticleRecord>, config: &CleanConfig) -> Prepared {
    let stats = DatasetStats::of(&raw);
    let (kept, cleaning) = clean(raw, config);

    let cleaned: Vec<CleanedRecord> = kept
        .iter()
        .map(|r| CleanedRecord::from_record(r, config.success_threshold))
        .collect();
    let evaluation = cleaned.iter().map(EvaluationExample::from_record).collect();
    let instructions = synthesize_all(&cleaned);
    let report = QualityReport::build(stats, cleaning, &cleaned, instructions.len());

    tracing::info!(
        cleaned = cleaned.len(),
        success = report.summary.success,
        instructions = instructions.len(),
        "training data prepared"
    );

    Prepared {
        cleaned,
        evaluation,
        instructions,
        report,
    }
}
