// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Region name reconciliation
//!
//! The cohort list, the ZHVI index and the Census API each spell metro names
//! differently. This is a best-effort lookup over a few dozen names: exact
//! match first, then a couple of hardcoded special cases. Deliberately not a
//! general fuzzy matcher.

use tracing::{debug, warn};

/// Resolve a cohort metro ("City, ST") against the ZHVI RegionName column.
///
/// Exact match wins. "Bend, OR" is listed as "Bend-Redmond, OR" in the index,
/// so it falls back to containment on both parts.
pub fn resolve_zillow_region(metro: &str, available: &[String]) -> Option<String> {
    if let Some(found) = available.iter().find(|r| r.as_str() == metro) {
        return Some(found.clone());
    }

    if metro == "Bend, OR" {
        if let Some(found) = available
            .iter()
            .find(|r| r.contains("Bend") && r.contains("OR"))
        {
            debug!(target: "metroflow.match", "Fuzzy match: '{}' -> '{}'", metro, found);
            return Some(found.clone());
        }
    }

    warn!(target: "metroflow.match", "Could not find region for '{}'", metro);
    None
}

/// Decide whether a Census MSA name belongs to a cohort city.
///
/// Census names look like "San Francisco-Oakland-Hayward, CA Metro Area";
/// containment on the simple city name is enough except for two collisions:
/// - "Portland" means Portland-South Portland, ME (not Portland, OR)
/// - "Washington" means Washington-Arlington-Alexandria, DC-VA-MD-WV
pub fn census_name_matches(city: &str, census_name: &str) -> bool {
    if !census_name.to_lowercase().contains(&city.to_lowercase()) {
        return false;
    }

    match city {
        "Portland" => census_name.contains("ME"),
        "Washington" => census_name.contains("DC"),
        _ => true,
    }
}
