//! Threshold table and weight classification.
//!
//! The table maps upper bounds to level labels and is always consulted in
//! ascending bound order. In the monitor configuration it is written as a
//! JSON object keyed by the bound's decimal string:
//!
//! ```json
//! { "10": "Critical", "25": "Warning", "1000": "Normal" }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Threshold / ThresholdTable
// ---------------------------------------------------------------------------

/// One (upper bound, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    /// Exclusive upper bound of the interval this label covers.
    pub bound: f64,
    /// Level label reported for weights under the bound.
    pub label: String,
}

/// Ordered set of thresholds, validated at construction.
///
/// Invariants: at least one entry, all bounds finite and strictly
/// increasing, no empty labels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct ThresholdTable {
    entries: Vec<Threshold>,
}

impl ThresholdTable {
    /// Build a table from unsorted entries, enforcing the invariants.
    pub fn new(mut entries: Vec<Threshold>) -> Result<Self, CoreError> {
        if entries.is_empty() {
            return Err(CoreError::Validation(
                "threshold table must not be empty".to_string(),
            ));
        }
        for entry in &entries {
            if !entry.bound.is_finite() {
                return Err(CoreError::Validation(format!(
                    "threshold bound {} is not a finite number",
                    entry.bound
                )));
            }
            if entry.label.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "threshold bound {} has an empty label",
                    entry.bound
                )));
            }
        }

        entries.sort_by(|a, b| a.bound.total_cmp(&b.bound));
        for pair in entries.windows(2) {
            if pair[0].bound == pair[1].bound {
                return Err(CoreError::Validation(format!(
                    "duplicate threshold bound {}",
                    pair[0].bound
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Thresholds in ascending bound order.
    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }

    /// Classify a weight against the table.
    ///
    /// Returns the label of the first bound strictly greater than `weight`.
    /// A weight at or above every bound falls into the top interval and gets
    /// the highest bound's label: the table is open-ended at the top.
    pub fn classify(&self, weight: f64) -> &str {
        let mut highest = "";
        for entry in &self.entries {
            if weight < entry.bound {
                return &entry.label;
            }
            highest = &entry.label;
        }
        highest
    }
}

impl TryFrom<BTreeMap<String, String>> for ThresholdTable {
    type Error = CoreError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(map.len());
        for (bound, label) in map {
            let bound: f64 = bound.parse().map_err(|_| {
                CoreError::Validation(format!("threshold bound '{bound}' is not a number"))
            })?;
            entries.push(Threshold { bound, label });
        }
        Self::new(entries)
    }
}

// ---------------------------------------------------------------------------
// Weight parsing
// ---------------------------------------------------------------------------

/// Leniently parse a raw measurement string.
///
/// Takes the longest leading numeric prefix (`"12.5kg"` reads as 12.5) and
/// coerces anything without one to zero, matching what the scale firmware
/// has always been allowed to send. Infinities and NaN count as non-numeric.
pub fn parse_weight(raw: &str) -> f64 {
    let s = raw.trim();
    let mut value = 0.0;
    for (idx, ch) in s.char_indices() {
        if let Ok(parsed) = s[..idx + ch.len_utf8()].parse::<f64>() {
            if parsed.is_finite() {
                value = parsed;
            }
        }
    }
    value
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
