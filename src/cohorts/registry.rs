// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Cohort registry
//!
//! Handles loading cohorts from built-in and filesystem sources.
//!
//! Precedence, highest first:
//! 1. `./.metroflow/cohorts.toml` - project-local overrides
//! 2. `~/.metroflow/cohorts.toml` - user-global overrides
//! 3. built-in definitions embedded in the binary
//!
//! Overrides replace whole cohorts keyed by `key`; unknown keys add cohorts.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::Cohort;
use crate::config::Settings;
use crate::error::{MetroflowError, Result};

const BUILTIN_COHORTS: &str = include_str!("builtin.toml");

#[derive(Debug, Deserialize)]
struct CohortFile {
    #[serde(default)]
    cohort: Vec<Cohort>,
}

/// Registry of known cohorts, in definition order
#[derive(Debug, Clone)]
pub struct CohortRegistry {
    cohorts: Vec<Cohort>,
}

impl CohortRegistry {
    /// Load the registry: built-ins, then user and project overrides.
    pub fn load() -> Result<Self> {
        let project_path = std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(".metroflow").join("cohorts.toml"));

        Self::load_with_paths(Some(Settings::cohorts_path()), project_path)
    }

    /// Load with explicit override paths (for testing).
    pub fn load_with_paths(
        user_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut registry = Self::builtin()?;

        if let Some(path) = user_path {
            registry.apply_overrides(&path)?;
        }
        if let Some(path) = project_path {
            registry.apply_overrides(&path)?;
        }

        registry.validate()?;
        Ok(registry)
    }

    /// The built-in cohort set only.
    pub fn builtin() -> Result<Self> {
        let file: CohortFile = toml::from_str(BUILTIN_COHORTS)
            .map_err(|e| MetroflowError::Cohort(format!("Built-in cohorts are invalid: {}", e)))?;
        Ok(Self {
            cohorts: file.cohort,
        })
    }

    /// Merge a TOML override file into the registry, if it exists.
    fn apply_overrides(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)?;
        let file: CohortFile = toml::from_str(&content).map_err(|e| {
            MetroflowError::Cohort(format!(
                "Failed to parse cohort file {}: {}",
                path.display(),
                e
            ))
        })?;

        for cohort in file.cohort {
            match self.cohorts.iter_mut().find(|c| c.key == cohort.key) {
                Some(existing) => *existing = cohort,
                None => self.cohorts.push(cohort),
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for cohort in &self.cohorts {
            if cohort.metros.is_empty() {
                return Err(MetroflowError::Cohort(format!(
                    "Cohort '{}' has no metros",
                    cohort.key
                )));
            }
        }
        Ok(())
    }

    /// Iterate cohorts in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Cohort> {
        self.cohorts.iter()
    }

    /// Look up a cohort by key.
    pub fn get(&self, key: &str) -> Option<&Cohort> {
        self.cohorts.iter().find(|c| c.key == key)
    }

    /// Look up a cohort by key, erroring when absent.
    pub fn require(&self, key: &str) -> Result<&Cohort> {
        self.get(key)
            .ok_or_else(|| MetroflowError::Cohort(format!("Cohort not found: {}", key)))
    }

    /// Number of cohorts.
    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}
