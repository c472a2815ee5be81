//! Analysis configuration.
//!
//! Loaded from a JSON file, or built from a data directory with defaults.
//! In tests, use AnalysisConfig::default_test().

use crate::{profile::AGE_SENTINEL, segment::DemographicSegment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the three input files (JSON lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    pub portfolio:  PathBuf,
    pub transcript: PathBuf,
    pub profile:    PathBuf,
}

impl DataPaths {
    /// `portfolio.json`, `transcript.json` and `profile.json` under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            portfolio:  dir.join("portfolio.json"),
            transcript: dir.join("transcript.json"),
            profile:    dir.join("profile.json"),
        }
    }
}

/// Where per-customer timelines are read from during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineBackend {
    #[default]
    Memory,
    Sqlite,
}

impl std::str::FromStr for TimelineBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(anyhow::anyhow!("unknown timeline backend '{other}' (expected memory|sqlite)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub data: DataPaths,
    #[serde(default)]
    pub segment: DemographicSegment,
    #[serde(default = "default_age_sentinel")]
    pub age_sentinel: u32,
    #[serde(default)]
    pub timeline_backend: TimelineBackend,
    /// SQLite path for the `sqlite` backend.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_age_sentinel() -> u32 {
    AGE_SENTINEL
}

fn default_store_path() -> String {
    ":memory:".to_string()
}

impl AnalysisConfig {
    /// Load from a JSON config file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Defaults, reading the input files from `data_dir`.
    pub fn default_for(data_dir: &str) -> Self {
        Self {
            data:             DataPaths::in_dir(data_dir),
            segment:          DemographicSegment::default(),
            age_sentinel:     AGE_SENTINEL,
            timeline_backend: TimelineBackend::Memory,
            store_path:       default_store_path(),
        }
    }

    /// Config with hardcoded defaults for use in tests. The data paths
    /// point nowhere; tests hand datasets to the pipeline directly.
    pub fn default_test() -> Self {
        Self::default_for("./test-data")
    }

    pub fn with_backend(mut self, backend: TimelineBackend) -> Self {
        self.timeline_backend = backend;
        self
    }
}
