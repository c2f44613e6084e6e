//! `prepare`, `augment`, and `export` commands over the stored records.

use std::path::{Path, PathBuf};

use notepower_core::AppConfig;
use notepower_prep::{augment, prepare, CleanConfig, CleanedRecord, InstructionExample};
use notepower_store::{export_csv, read_jsonl, read_records, write_json_atomic, write_jsonl};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub(crate) const CLEANED_FILE: &str = "cleaned.jsonl";
pub(crate) const EVALUATION_FILE: &str = "evaluation.jsonl";
pub(crate) const INSTRUCTIONS_FILE: &str = "instructions.jsonl";
pub(crate) const REPORT_FILE: &str = "quality_report.json";
pub(crate) const AUGMENTED_TITLES_FILE: &str = "augmented_titles.jsonl";
pub(crate) const EVOLVED_FILE: &str = "evolved_instructions.jsonl";

#[derive(Debug, Clone, Default)]
pub(crate) struct PrepareOptions {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub min_likes: Option<u64>,
    pub success_threshold: Option<f64>,
    pub outlier_threshold: Option<f64>,
}

/// Cleaning settings: configured values with command-line overrides.
///
/// # Errors
///
/// Returns an error if the exclusion patterns fail to compile.
pub(crate) fn clean_config(
    config: &AppConfig,
    options: &PrepareOptions,
) -> anyhow::Result<CleanConfig> {
    Ok(CleanConfig::with_thresholds(
        options.min_likes.unwrap_or(config.clean_min_likes),
        options.success_threshold.unwrap_or(config.success_threshold),
        options.outlier_threshold.unwrap_or(config.outlier_threshold),
    )?)
}

fn read_raw(path: &Path) -> anyhow::Result<Vec<notepower_core::ArticleRecord>> {
    if !path.exists() {
        anyhow::bail!(
            "record store {} not found; run `notepower collect` first",
            path.display()
        );
    }
    Ok(read_records(path)?)
}

/// Cleans the raw store and writes the prepared files.
///
/// # Errors
///
/// Returns an error if the raw store is missing or unreadable, or if any
/// output file cannot be written.
pub(crate) fn run_prepare(config: &AppConfig, options: &PrepareOptions) -> anyhow::Result<()> {
    let input = options
        .input
        .clone()
        .unwrap_or_else(|| config.raw_store_path());
    let out_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.processed_dir());
    let clean = clean_config(config, options)?;

    let raw = read_raw(&input)?;
    if raw.is_empty() {
        println!("{} holds no records; nothing to prepare", input.display());
        return Ok(());
    }

    let prepared = prepare(raw, &clean);
    write_jsonl(&out_dir.join(CLEANED_FILE), &prepared.cleaned)?;
    write_jsonl(&out_dir.join(EVALUATION_FILE), &prepared.evaluation)?;
    write_jsonl(&out_dir.join(INSTRUCTIONS_FILE), &prepared.instructions)?;
    write_json_atomic(&out_dir.join(REPORT_FILE), &prepared.report)?;

    let summary = &prepared.report.summary;
    let cleaning = &prepared.report.cleaning;
    println!(
        "cleaned {} -> {} records ({:.1}% kept)",
        cleaning.original, cleaning.final_count, cleaning.retention_rate
    );
    for step in &cleaning.steps {
        println!(
            "  {}: removed {}, {} remaining",
            step.step, step.removed, step.remaining
        );
    }
    if let Some(outliers) = &cleaning.outliers {
        println!(
            "  {} outliers above power score {} (kept)",
            outliers.count, outliers.threshold
        );
    }
    println!(
        "labels: {} success, {} normal; {} instruction examples",
        summary.success, summary.normal, summary.instruction_examples
    );
    println!("wrote prepared files to {}", out_dir.display());
    Ok(())
}

/// Builds synthetic titles and evolved instructions from prepared files.
///
/// # Errors
///
/// Returns an error if the prepared files are missing or unreadable, or if
/// the outputs cannot be written.
pub(crate) fn run_augment(
    config: &AppConfig,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let input_dir = input_dir.unwrap_or_else(|| config.processed_dir());
    let out_dir = output_dir.unwrap_or_else(|| config.augmented_dir());

    let cleaned_path = input_dir.join(CLEANED_FILE);
    if !cleaned_path.exists() {
        anyhow::bail!(
            "{} not found; run `notepower prepare` first",
            cleaned_path.display()
        );
    }
    let cleaned: Vec<CleanedRecord> = read_jsonl(&cleaned_path)?;
    let instructions_path = input_dir.join(INSTRUCTIONS_FILE);
    let instructions: Vec<InstructionExample> = if instructions_path.exists() {
        read_jsonl(&instructions_path)?
    } else {
        Vec::new()
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let result = augment(&cleaned, &instructions, &mut rng);

    write_jsonl(&out_dir.join(AUGMENTED_TITLES_FILE), &result.titles)?;
    write_jsonl(&out_dir.join(EVOLVED_FILE), &result.evolved)?;

    println!(
        "titles: {} original + {} template + {} transformed = {}",
        result.originals,
        result.templated,
        result.transformed,
        result.titles.len()
    );
    println!("evolved instructions: {}", result.evolved.len());
    println!("wrote augmented files to {}", out_dir.display());
    Ok(())
}

/// Writes the raw store as CSV.
///
/// # Errors
///
/// Returns an error if the raw store is missing or unreadable, or if the CSV
/// cannot be written.
pub(crate) fn run_export(
    config: &AppConfig,
    input: Option<PathBuf>,
    output: &Path,
) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| config.raw_store_path());
    let records = read_raw(&input)?;
    let written = export_csv(output, &records)?;
    println!("exported {written} records to {}", output.display());
    Ok(())
}
