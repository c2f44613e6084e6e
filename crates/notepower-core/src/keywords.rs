use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One category of search keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

/// The keyword catalogue file: an ordered list of categories.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordCatalog {
    pub categories: Vec<KeywordCategory>,
}

/// A single search unit: a keyword together with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub category: String,
    pub keyword: String,
}

impl KeywordEntry {
    /// Label recorded in the progress state, `category:keyword`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.category, self.keyword)
    }

    /// Splits a `category:keyword` label back into its parts.
    ///
    /// Returns `None` for labels without a separator.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let (category, keyword) = label.split_once(':')?;
        Some(Self {
            category: category.to_string(),
            keyword: keyword.to_string(),
        })
    }
}

impl KeywordCatalog {
    /// Flattens the catalogue into search order, optionally restricted to one
    /// category and/or one keyword.
    ///
    /// Keywords repeated across categories are kept once, under the first
    /// category that lists them.
    #[must_use]
    pub fn entries(&self, category: Option<&str>, keyword: Option<&str>) -> Vec<KeywordEntry> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cat in &self.categories {
            if category.is_some_and(|c| c != cat.name) {
                continue;
            }
            for kw in &cat.keywords {
                if keyword.is_some_and(|k| k != kw) {
                    continue;
                }
                if seen.insert(kw.as_str()) {
                    out.push(KeywordEntry {
                        category: cat.name.clone(),
                        keyword: kw.clone(),
                    });
                }
            }
        }
        out
    }
}

/// Load and validate the keyword catalogue from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<KeywordCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: KeywordCatalog = serde_yaml::from_str(&content)?;
    validate_keywords(&catalog)?;
    Ok(catalog)
}

fn validate_keywords(catalog: &KeywordCatalog) -> Result<(), ConfigError> {
    if catalog.categories.is_empty() {
        return Err(ConfigError::Validation(
            "keyword catalogue has no categories".to_string(),
        ));
    }

    let mut seen_categories = HashSet::new();
    for cat in &catalog.categories {
        let name = cat.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if name.contains(':') {
            return Err(ConfigError::Validation(format!(
                "category name '{name}' must not contain ':'"
            )));
        }
        if !seen_categories.insert(name.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{name}'"
            )));
        }

        let mut seen_keywords = HashSet::new();
        for kw in &cat.keywords {
            if kw.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' has an empty keyword"
                )));
            }
            if !seen_keywords.insert(kw.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate keyword '{kw}' in category '{name}'"
                )));
            }
        }
    }

    Ok(())
}
