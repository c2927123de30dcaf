// ⚙️ Pipeline Configuration - Rules as Data
// Endpoint, filters and output locations. Defaults reproduce the fixed run.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "https://politigraph.wevis.info/graphql";
pub const DEFAULT_CLASSIFICATION: &str = "HOUSE_OF_REPRESENTATIVE";
pub const DEFAULT_TERM: i64 = 26;

/// Absence / leave marker recorded when a member did not vote
pub const DEFAULT_ABSENCE_OPTION: &str = "ลา / ขาดลงมติ";

/// "Total votes cast" column of the summary table
pub const DEFAULT_TOTAL_COLUMN: &str = "รวมลงมติ";

/// Candidate-name options dropped before tallying
pub const DEFAULT_EXCLUDED_OPTIONS: [&str; 2] = ["นายชัยเกษม นิติสิริ", "นายอนุทิน ชาญวีรกูล"];

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_classification() -> String {
    DEFAULT_CLASSIFICATION.to_string()
}

fn default_term() -> i64 {
    DEFAULT_TERM
}

fn default_excluded_options() -> Vec<String> {
    DEFAULT_EXCLUDED_OPTIONS.iter().map(|s| s.to_string()).collect()
}

fn default_absence_option() -> String {
    DEFAULT_ABSENCE_OPTION.to_string()
}

fn default_total_column() -> String {
    DEFAULT_TOTAL_COLUMN.to_string()
}

fn default_summary_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_detail_path() -> PathBuf {
    PathBuf::from("bill.json")
}

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// GraphQL endpoint receiving the single POST
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Organization classification sent as `where.classification_EQ`
    #[serde(default = "default_classification")]
    pub classification: String,

    /// Legislative term kept after flattening
    #[serde(default = "default_term")]
    pub term: i64,

    /// Vote options dropped before flattening (exact match)
    #[serde(default = "default_excluded_options")]
    pub excluded_options: Vec<String>,

    /// Column left out of the "total votes cast" sum
    #[serde(default = "default_absence_option")]
    pub absence_option: String,

    #[serde(default = "default_total_column")]
    pub total_column: String,

    /// Per-person tally (`data.json`)
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,

    /// Per-vote detail listing (`bill.json`)
    #[serde(default = "default_detail_path")]
    pub detail_path: PathBuf,

    /// Optional per-province rollup of the summary table
    #[serde(default)]
    pub province_path: Option<PathBuf>,

    /// Optional CSV copy of the summary table
    #[serde(default)]
    pub summary_csv_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            endpoint: default_endpoint(),
            classification: default_classification(),
            term: default_term(),
            excluded_options: default_excluded_options(),
            absence_option: default_absence_option(),
            total_column: default_total_column(),
            summary_path: default_summary_path(),
            detail_path: default_detail_path(),
            province_path: None,
            summary_csv_path: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Config file when given, built-in defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn is_excluded(&self, option: &str) -> bool {
        self.excluded_options.iter().any(|o| o == option)
    }

    /// Variables object sent alongside the people query
    pub fn query_variables(&self) -> serde_json::Value {
        serde_json::json!({
            "where": {
                "classification_EQ": self.classification
            }
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
