// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Report rendering
//!
//! Chart output via plotters and the plain-text summaries.

pub mod chart;
pub mod summary;
