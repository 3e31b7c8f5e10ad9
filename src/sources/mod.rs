// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Data providers
//!
//! HTTP clients and parsers for the public datasets: the Zillow ZHVI metro
//! index (wide CSV) and the Census PEP components-of-change endpoint (JSON).

pub mod census;
pub mod zillow;

pub use census::{CensusClient, ComponentsRow};
pub use zillow::{ZhviRegion, ZhviTable, ZillowClient};
