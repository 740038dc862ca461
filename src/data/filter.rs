use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, OutcomeClass, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Outcome distribution (pie chart data)
// ---------------------------------------------------------------------------

/// Launch counts per outcome class for the selected site(s).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeDistribution {
    /// Both classes are always present, possibly with a zero count.
    pub counts: BTreeMap<OutcomeClass, usize>,
    pub title: String,
}

impl OutcomeDistribution {
    pub fn count(&self, class: OutcomeClass) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Count launches per outcome class, optionally restricted to one site.
///
/// A site that matches no record is not an error: both classes come back
/// with a count of zero.
pub fn compute_outcome_distribution(
    dataset: &LaunchDataset,
    site: &SiteSelection,
) -> OutcomeDistribution {
    let mut counts: BTreeMap<OutcomeClass, usize> =
        OutcomeClass::ALL.iter().map(|&c| (c, 0)).collect();

    for record in dataset.records() {
        if site.matches(&record.launch_site) {
            *counts.entry(record.outcome).or_default() += 1;
        }
    }

    let title = match site {
        SiteSelection::All => "Total Successful Launches for All Sites".to_string(),
        SiteSelection::Site(s) => format!("Success vs Failed Launches for {s}"),
    };

    OutcomeDistribution { counts, title }
}

// ---------------------------------------------------------------------------
// Payload vs outcome (scatter chart data)
// ---------------------------------------------------------------------------

/// `(payload_mass_kg, outcome)` pairs in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadOutcomeRows {
    pub rows: Vec<(f64, OutcomeClass)>,
    pub title: String,
}

impl PayloadOutcomeRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Records passing the site predicate and the inclusive payload predicate,
/// in dataset order.
///
/// The range is applied literally: `low > high` selects nothing.
pub fn select_payload_outcome_records<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
    range: PayloadRange,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |r| site.matches(&r.launch_site) && range.contains(r.payload_mass_kg))
}

/// Payload/outcome pairs for the scatter chart.
pub fn select_payload_outcome_rows(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> PayloadOutcomeRows {
    let rows = select_payload_outcome_records(dataset, site, range)
        .map(|r| (r.payload_mass_kg, r.outcome))
        .collect();

    PayloadOutcomeRows {
        rows,
        title: payload_title(site),
    }
}

pub(crate) fn payload_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => "Payload vs Launch Success for All Sites".to_string(),
        SiteSelection::Site(s) => format!("Payload vs Launch Success for {s}"),
    }
}
