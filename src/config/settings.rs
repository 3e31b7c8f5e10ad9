// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Metroflow
//!
//! Handles loading and saving settings from ~/.metroflow/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings structure, stored in ~/.metroflow/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Data provider configurations
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Input/output directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Chart rendering settings
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Configuration for the data providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// ZHVI metro wide CSV endpoint
    #[serde(default = "default_zhvi_url")]
    pub zhvi_url: String,

    /// Census PEP components-of-change endpoint (Vintage 2019)
    #[serde(default = "default_census_url")]
    pub census_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Directory layout for fetched data and generated artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where fetched/tidied data lands (relative to the working directory)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where charts and text summaries land
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Chart rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart width in pixels
    #[serde(default = "default_chart_width")]
    pub width: u32,

    /// Chart height in pixels
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            zhvi_url: default_zhvi_url(),
            census_url: default_census_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

fn default_zhvi_url() -> String {
    "https://files.zillowstatic.com/research/public_csvs/zhvi/Metro_zhvi_uc_sfrcondo_tier_0.33_0.67_sm_sa_month.csv"
        .to_string()
}

fn default_census_url() -> String {
    "https://api.census.gov/data/2019/pep/components".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    800
}

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::metroflow_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &PathBuf) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the default path.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the metroflow home directory (~/.metroflow or $METROFLOW_HOME).
    pub fn metroflow_home() -> PathBuf {
        if let Ok(home) = std::env::var("METROFLOW_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".metroflow")
    }

    /// Get the user-global cohort overrides file.
    pub fn cohorts_path() -> PathBuf {
        Self::metroflow_home().join("cohorts.toml")
    }

    /// Ensure the home directory exists.
    pub fn ensure_directories() -> crate::error::Result<()> {
        std::fs::create_dir_all(Self::metroflow_home())?;
        Ok(())
    }

    /// Cache file for the raw ZHVI download, under the data dir.
    pub fn zhvi_cache_path(&self) -> PathBuf {
        self.paths.data_dir.join("zhvi_metro_raw.csv")
    }

    /// Default location of the tidy migration table.
    pub fn migration_csv_path(&self) -> PathBuf {
        self.paths.data_dir.join("migration_history_2011_2019.csv")
    }
}
