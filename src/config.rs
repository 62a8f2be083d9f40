use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chunk::DEFAULT_CHUNK_SIZE;
use crate::error::{CutError, Result};

pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);
pub const DEFAULT_OUTPUT_PATH: &str = "output.json";

/// Parameters of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// One ILP trial per chunk size; the best result is kept.
    pub chunk_sizes: Vec<usize>,
    /// Wall-clock deadline shared by all ILP trials.
    #[serde(rename = "time_budget_secs", with = "secs")]
    pub time_budget: Duration,
    /// Write the roll plans to `output_path` after a successful run.
    pub emit_output: bool,
    pub output_path: PathBuf,
    /// Order slots by non-increasing piece count in the model.
    pub symmetry_breaking: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chunk_sizes: vec![DEFAULT_CHUNK_SIZE],
            time_budget: DEFAULT_TIME_BUDGET,
            emit_output: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            symmetry_breaking: true,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        match self.chunk_sizes.iter().find(|&&c| c == 0) {
            Some(&c) => Err(CutError::InvalidChunkSize(c)),
            None => Ok(()),
        }
    }

    /// Chunk sizes to try, falling back to the default when none are set.
    pub fn trial_sizes(&self) -> Vec<usize> {
        let mut sizes = self.chunk_sizes.clone();
        sizes.sort_unstable();
        sizes.dedup();
        if sizes.is_empty() {
            sizes.push(DEFAULT_CHUNK_SIZE);
        }
        sizes
    }
}

mod secs {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.chunk_sizes, vec![8]);
        assert_eq!(cfg.time_budget, Duration::from_secs(30));
        assert!(cfg.emit_output);
        assert!(cfg.symmetry_breaking);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: RunConfig =
            serde_json::from_str(r#"{"chunk_sizes": [4, 8], "time_budget_secs": 2.5}"#).unwrap();
        assert_eq!(cfg.chunk_sizes, vec![4, 8]);
        assert_eq!(cfg.time_budget, Duration::from_millis(2500));
        assert!(cfg.emit_output);
    }

    #[test]
    fn test_negative_budget_rejected() {
        assert!(serde_json::from_str::<RunConfig>(r#"{"time_budget_secs": -1}"#).is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let cfg = RunConfig {
            chunk_sizes: vec![8, 0],
            ..RunConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CutError::InvalidChunkSize(0))));
    }

    #[test]
    fn test_trial_sizes_drop_repeats() {
        let cfg = RunConfig {
            chunk_sizes: vec![8, 4, 8],
            ..RunConfig::default()
        };
        assert_eq!(cfg.trial_sizes(), vec![4, 8]);
    }

    #[test]
    fn test_huge_budget_accepted() {
        let cfg: RunConfig = serde_json::from_str(r#"{"time_budget_secs": 1e19}"#).unwrap();
        assert!(cfg.time_budget > Duration::from_secs(1 << 60));
    }

    #[test]
    fn test_trial_sizes_never_empty() {
        let cfg = RunConfig {
            chunk_sizes: vec![],
            ..RunConfig::default()
        };
        assert_eq!(cfg.trial_sizes(), vec![8]);
    }
}
