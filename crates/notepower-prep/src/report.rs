//! Dataset quality report written alongside the prepared files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clean::{CleanReport, CleanedRecord};
use crate::stats::DatasetStats;

/// Titles listed in [`QualityReport::top_titles`].
pub const TOP_TITLES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub raw_records: usize,
    pub cleaned_records: usize,
    pub success: usize,
    pub normal: usize,
    pub evaluation_examples: usize,
    pub instruction_examples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTitle {
    pub title: String,
    pub category: String,
    pub power_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub summary: ReportSummary,
    pub cleaning: CleanReport,
    pub categories: BTreeMap<String, usize>,
    pub patterns: BTreeMap<String, usize>,
    pub difficulties: BTreeMap<String, usize>,
    pub stats: DatasetStats,
    pub top_titles: Vec<TopTitle>,
}

impl QualityReport {
    #[must_use]
    pub fn build(
        stats: DatasetStats,
        cleaning: CleanReport,
        cleaned: &[CleanedRecord],
        instruction_examples: usize,
    ) -> Self {
        let success = cleaned.iter().filter(|r| r.is_success()).count();

        let mut categories = BTreeMap::new();
        let mut patterns = BTreeMap::new();
        let mut difficulties = BTreeMap::new();
        for r in cleaned {
            *categories.entry(r.category.clone()).or_insert(0) += 1;
            for p in &r.patterns {
                *patterns.entry(p.as_str().to_string()).or_insert(0) += 1;
            }
            *difficulties
                .entry(r.difficulty.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut ranked: Vec<&CleanedRecord> = cleaned.iter().collect();
        ranked.sort_by(|a, b| b.power_score.total_cmp(&a.power_score));
        let top_titles = ranked
            .into_iter()
            .take(TOP_TITLES)
            .map(|r| TopTitle {
                title: r.title.clone(),
                category: r.category.clone(),
                power_score: r.power_score,
            })
            .collect();

        Self {
            summary: ReportSummary {
                raw_records: stats.total_records,
                cleaned_records: cleaned.len(),
                success,
                normal: cleaned.len() - success,
                evaluation_examples: cleaned.len(),
                instruction_examples,
            },
            cleaning,
            categories,
            patterns,
            difficulties,
            stats,
            top_titles,
        }
    }
}
