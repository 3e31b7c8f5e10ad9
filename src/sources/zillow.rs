// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Zillow ZHVI provider
//!
//! Fetches and parses the metro-level ZHVI wide CSV: one row per region,
//! five id columns, then one column per month-end date.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{MetroflowError, Result, SourceError};

/// Columns that identify a region rather than carry a monthly value.
const ID_COLUMNS: [&str; 5] = [
    "RegionID",
    "SizeRank",
    "RegionName",
    "RegionType",
    "StateName",
];

/// One region row of the wide table; `values` runs parallel to `ZhviTable::dates`.
#[derive(Debug, Clone)]
pub struct ZhviRegion {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The parsed wide table.
#[derive(Debug, Clone)]
pub struct ZhviTable {
    /// Month-end dates, in file order
    pub dates: Vec<NaiveDate>,
    pub regions: Vec<ZhviRegion>,
}

impl ZhviTable {
    /// Parse the wide CSV body.
    ///
    /// Date columns are recognized by their header parsing as YYYY-MM-DD, so
    /// column reordering or new id columns do not break the melt. Blank and
    /// unparseable cells become `None`.
    pub fn parse_csv(body: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());
        let headers = reader.headers()?.clone();

        let region_idx = headers
            .iter()
            .position(|h| h == "RegionName")
            .ok_or_else(|| SourceError::MissingColumn("RegionName".to_string()))?;

        let mut dates = Vec::new();
        let mut date_idxs = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if ID_COLUMNS.contains(&header) {
                continue;
            }
            if let Ok(date) = NaiveDate::parse_from_str(header, "%Y-%m-%d") {
                dates.push(date);
                date_idxs.push(idx);
            }
        }

        if dates.is_empty() {
            return Err(SourceError::InvalidResponse(
                "ZHVI table has no date columns".to_string(),
            )
            .into());
        }

        let mut regions = Vec::new();
        for record in reader.records() {
            let record = record?;
            let name = match record.get(region_idx) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };

            let values = date_idxs
                .iter()
                .map(|&idx| record.get(idx).and_then(|cell| cell.parse::<f64>().ok()))
                .collect();

            regions.push(ZhviRegion { name, values });
        }

        debug!(
            target: "metroflow.zillow",
            "Parsed ZHVI table: {} regions x {} months",
            regions.len(),
            dates.len()
        );

        Ok(Self { dates, regions })
    }

    /// All region names, in file order.
    pub fn region_names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }
}

/// HTTP client for the ZHVI endpoint
pub struct ZillowClient {
    client: Client,
    url: String,
}

impl ZillowClient {
    /// Create a client from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_url(
            settings.sources.zhvi_url.clone(),
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

    /// Download the raw CSV body, with a progress bar on the byte stream.
    pub async fn fetch_raw(&self) -> Result<String> {
        info!(target: "metroflow.zillow", "Fetching ZHVI index from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            }
            .into());
        }

        let bar = match response.content_length() {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        bar.set_message("Downloading ZHVI index");

        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            bar.inc(chunk.len() as u64);
        }
        bar.finish_and_clear();

        if body.is_empty() {
            return Err(SourceError::EmptyBody(self.url.clone()).into());
        }

        String::from_utf8(body)
            .map_err(|e| SourceError::InvalidResponse(format!("ZHVI body is not UTF-8: {}", e)).into())
    }

    /// Load the table, going through the local cache.
    ///
    /// Online: fetch, refresh the cache, parse. Offline: parse the cached
    /// copy, erroring when none exists.
    pub async fn load(&self, cache_path: &Path, offline: bool) -> Result<ZhviTable> {
        if offline {
            if !cache_path.exists() {
                return Err(MetroflowError::InvalidInput(format!(
                    "--offline requested but no cached ZHVI copy at {}",
                    cache_path.display()
                )));
            }
            info!(
                target: "metroflow.zillow",
                "Using cached ZHVI copy at {}",
                cache_path.display()
            );
            let body = std::fs::read_to_string(cache_path)?;
            return ZhviTable::parse_csv(&body);
        }

        let body = self.fetch_raw().await?;
        if let Some(parent) = cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(cache_path, &body)?;
        ZhviTable::parse_csv(&body)
    }
}
