use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire value of the "do not filter by site" selector entry.
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// OutcomeClass – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as recorded in the `class` column (success = 1, failure = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    pub const ALL: [OutcomeClass; 2] = [OutcomeClass::Failure, OutcomeClass::Success];

    pub fn as_u8(self) -> u8 {
        match self {
            OutcomeClass::Failure => 0,
            OutcomeClass::Success => 1,
        }
    }

    /// Position on the scatter chart's y axis.
    pub fn as_f64(self) -> f64 {
        f64::from(self.as_u8())
    }
}

impl From<OutcomeClass> for u8 {
    fn from(class: OutcomeClass) -> Self {
        class.as_u8()
    }
}

impl TryFrom<u8> for OutcomeClass {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OutcomeClass::Failure),
            1 => Ok(OutcomeClass::Success),
            other => Err(RecordError::InvalidOutcomeClass(i64::from(other))),
        }
    }
}

impl TryFrom<i64> for OutcomeClass {
    type Error = RecordError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| RecordError::InvalidOutcomeClass(value))
            .and_then(OutcomeClass::try_from)
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("outcome class must be 0 or 1, got {0}")]
    InvalidOutcomeClass(i64),
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source CSV).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: OutcomeClass,
    /// Optional descriptive columns, never used for filtering.
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
    pub booster_category: Option<String>,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        outcome: OutcomeClass,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            outcome,
            flight_number: None,
            booster_version: None,
            booster_category: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection values – what the site dropdown and payload slider hold
// ---------------------------------------------------------------------------

/// The site selector value: the all-sites sentinel or one exact site id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// The value as the selector reports it (`"ALL"` for the sentinel).
    pub fn as_value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }

    /// Whether a record's site passes this selection.
    pub fn matches(&self, launch_site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => site == launch_site,
        }
    }
}

impl From<&str> for SiteSelection {
    fn from(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value)
        }
    }
}

impl From<SiteSelection> for String {
    fn from(selection: SiteSelection) -> Self {
        match selection {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}

/// Inclusive payload interval `[low, high]` in kilograms.
///
/// `low > high` is representable and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        payload_mass_kg >= self.low && payload_mass_kg <= self.high
    }
}

impl From<[f64; 2]> for PayloadRange {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<PayloadRange> for [f64; 2] {
    fn from(range: PayloadRange) -> Self {
        [range.low, range.high]
    }
}

/// Transient UI selection, passed by value into every derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All launch records plus values derived once at construction.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-seen order.
    sites: Vec<String>,
    /// Min/max payload over every record; `None` for an empty dataset.
    payload_bounds: Option<PayloadRange>,
}

impl LaunchDataset {
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        for record in &records {
            if !sites.iter().any(|s| s == &record.launch_site) {
                sites.push(record.launch_site.clone());
            }
        }

        let payload_bounds = if records.is_empty() {
            None
        } else {
            let min = records
                .iter()
                .map(|r| r.payload_mass_kg)
                .fold(f64::INFINITY, f64::min);
            let max = records
                .iter()
                .map(|r| r.payload_mass_kg)
                .fold(f64::NEG_INFINITY, f64::max);
            Some(PayloadRange::new(min, max))
        };

        LaunchDataset {
            records,
            sites,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn payload_bounds(&self) -> Option<PayloadRange> {
        self.payload_bounds
    }

    pub fn min_payload(&self) -> Option<f64> {
        self.payload_bounds.map(|b| b.low)
    }

    pub fn max_payload(&self) -> Option<f64> {
        self.payload_bounds.map(|b| b.high)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_min_and_max_payload() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, OutcomeClass::Success),
            LaunchRecord::new("KSC LC-39A", 9600.0, OutcomeClass::Failure),
            LaunchRecord::new("CCAFS LC-40", 3000.0, OutcomeClass::Failure),
        ]);
        assert_eq!(ds.min_payload(), Some(500.0));
        assert_eq!(ds.max_payload(), Some(9600.0));
        assert_eq!(ds.sites(), ["CCAFS LC-40", "KSC LC-39A"]);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.payload_bounds(), None);
    }

    #[test]
    fn outcome_class_accepts_only_binary_values() {
        assert_eq!(OutcomeClass::try_from(1u8), Ok(OutcomeClass::Success));
        assert_eq!(OutcomeClass::try_from(0i64), Ok(OutcomeClass::Failure));
        assert_eq!(
            OutcomeClass::try_from(2u8),
            Err(RecordError::InvalidOutcomeClass(2))
        );
        assert_eq!(
            OutcomeClass::try_from(-1i64),
            Err(RecordError::InvalidOutcomeClass(-1))
        );
    }

    #[test]
    fn site_selection_round_trips_the_sentinel() {
        assert_eq!(SiteSelection::from("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::from("VAFB SLC-4E"),
            SiteSelection::Site("VAFB SLC-4E".into())
        );
        let json = serde_json::to_string(&SiteSelection::All).unwrap();
        assert_eq!(json, "\"ALL\"");
    }

    #[test]
    fn payload_range_is_inclusive() {
        let range = PayloadRange::new(500.0, 3000.0);
        assert!(range.contains(500.0));
        assert!(range.contains(3000.0));
        assert!(!range.contains(3000.1));
        assert!(!PayloadRange::new(10.0, 5.0).contains(7.0));
    }
}
