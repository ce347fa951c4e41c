use serde::{Deserialize, Serialize};

use crate::scoring::{ScoreParams, Weights};

/// Contents of `config.yaml`.
///
/// Example YAML:
/// ```yaml
/// judge_key: Judge
/// entry_key: Project Name
/// sum_field: sum
/// normalize_fields: false
/// delimiter: ","
/// weights:
///   Progress: 1
///   Design: 1
///   Quality of Video: 0.5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Column naming the judge (default: "Judge")
    #[serde(default = "default_judge_key")]
    pub judge_key: String,

    /// Column naming the scored entry (default: "Project Name")
    #[serde(default = "default_entry_key")]
    pub entry_key: String,

    /// Field the combined score is stored in (default: "sum")
    #[serde(default = "default_sum_field")]
    pub sum_field: String,

    /// Z-score every criterion per judge before weighting (default: false)
    #[serde(default)]
    pub normalize_fields: bool,

    /// Single-character field delimiter of the input file (default: ",")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Criterion column -> weight. Unlisted columns are not scored.
    #[serde(default)]
    pub weights: Weights,
}

fn default_judge_key() -> String {
    "Judge".to_string()
}

fn default_entry_key() -> String {
    "Project Name".to_string()
}

fn default_sum_field() -> String {
    "sum".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge_key: default_judge_key(),
            entry_key: default_entry_key(),
            sum_field: default_sum_field(),
            normalize_fields: false,
            delimiter: default_delimiter(),
            weights: Weights::new(),
        }
    }
}

impl Config {
    pub fn score_params(&self) -> ScoreParams {
        ScoreParams {
            weights: self.weights.clone(),
            judge_key: self.judge_key.clone(),
            entry_key: self.entry_key.clone(),
            sum_field: self.sum_field.clone(),
            normalize_fields: self.normalize_fields,
        }
    }

    /// The delimiter as the single byte the reader expects.
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => anyhow::bail!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ),
        }
    }
}
