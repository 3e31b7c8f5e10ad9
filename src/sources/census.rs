// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Census PEP provider
//!
//! Fetches net migration rates from the Vintage 2019 Population Estimates
//! components-of-change endpoint. The API returns a JSON array of arrays:
//! the first row is the header, every cell is a string or null.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Result, SourceError};

/// Geography clause selecting every metro/micro statistical area.
const MSA_GEOGRAPHY: &str = "metropolitan statistical area/micropolitan statistical area:*";

/// One usable row of the components table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentsRow {
    /// Full MSA name, e.g. "Portland-South Portland, ME Metro Area"
    pub name: String,
    /// Net migration per 1,000 residents
    pub net_migration_rate: f64,
    /// Vintage period code; 3 = 2011 through 11 = 2019
    pub period_code: u32,
}

/// Map a Vintage 2019 period code to its calendar year.
pub fn period_year(code: u32) -> Option<i32> {
    if (3..=11).contains(&code) {
        Some(2008 + code as i32)
    } else {
        None
    }
}

/// HTTP client for the components endpoint
pub struct CensusClient {
    client: Client,
    url: String,
}

impl CensusClient {
    /// Create a client from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_url(
            settings.sources.census_url.clone(),
            settings.sources.timeout_secs,
        )
    }

    /// Create a client with an explicit URL (used by tests).
    pub fn with_url(url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, url })
    }

    /// Fetch and parse NAME, RNETMIG and PERIOD_CODE for all MSAs.
    pub async fn fetch_components(&self) -> Result<Vec<ComponentsRow>> {
        info!(target: "metroflow.census", "Fetching Census components from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("get", "NAME,RNETMIG,PERIOD_CODE"),
                ("for", MSA_GEOGRAPHY),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            }
            .into());
        }

        let raw: Vec<Vec<Option<String>>> = response.json().await?;
        parse_components(&raw)
    }
}

/// Parse the array-of-arrays payload.
///
/// Rows with a null name or a non-numeric RNETMIG/PERIOD_CODE are dropped,
/// matching the coerce-to-numeric-then-drop treatment of the source data.
pub fn parse_components(raw: &[Vec<Option<String>>]) -> Result<Vec<ComponentsRow>> {
    let header = raw
        .first()
        .ok_or_else(|| SourceError::InvalidResponse("empty components payload".to_string()))?;

    let col = |name: &str| -> Result<usize> {
        header
            .iter()
            .position(|h| h.as_deref() == Some(name))
            .ok_or_else(|| SourceError::MissingColumn(name.to_string()).into())
    };
    let name_idx = col("NAME")?;
    let rate_idx = col("RNETMIG")?;
    let period_idx = col("PERIOD_CODE")?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for cells in &raw[1..] {
        let name = cells.get(name_idx).and_then(|c| c.as_deref());
        let rate = cells
            .get(rate_idx)
            .and_then(|c| c.as_deref())
            .and_then(|c| c.parse::<f64>().ok());
        let period = cells
            .get(period_idx)
            .and_then(|c| c.as_deref())
            .and_then(|c| c.parse::<u32>().ok());

        match (name, rate, period) {
            (Some(name), Some(net_migration_rate), Some(period_code)) => {
                rows.push(ComponentsRow {
                    name: name.to_string(),
                    net_migration_rate,
                    period_code,
                });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(target: "metroflow.census", "Dropped {} non-numeric component rows", dropped);
    }
    Ok(rows)
}
