// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Metroflow
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Metroflow operations
#[derive(Error, Debug)]
pub enum MetroflowError {
    /// Data-provider errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cohort definition errors
    #[error("Cohort error: {0}")]
    Cohort(String),

    /// A pipeline stage produced no usable rows
    #[error("Data error: {0}")]
    Data(String),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(String),

    /// Regression errors
    #[error("Regression error: {0}")]
    Regression(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Data-provider specific error types
#[derive(Error, Debug)]
pub enum SourceError {
    /// The provider returned a non-success status
    #[error("Provider returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The provider returned an empty body
    #[error("Empty response from {0}")]
    EmptyBody(String),

    /// The response did not have the expected shape
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// A required column is missing from the source table
    #[error("Missing column in source table: {0}")]
    MissingColumn(String),

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),
}

/// Result type alias for Metroflow operations
pub type Result<T> = std::result::Result<T, MetroflowError>;

impl From<toml::de::Error> for MetroflowError {
    fn from(err: toml::de::Error) -> Self {
        MetroflowError::Toml(err.to_string())
    }
}

impl From<linregress::Error> for MetroflowError {
    fn from(err: linregress::Error) -> Self {
        MetroflowError::Regression(err.to_string())
    }
}
