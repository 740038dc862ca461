use serde::{Deserialize, Serialize};

use crate::data::filter::OutcomeDistribution;
use crate::data::loader::{COL_CLASS, COL_PAYLOAD_MASS};
use crate::data::model::LaunchRecord;

// ---------------------------------------------------------------------------
// Chart specifications handed to the presentation layer
// ---------------------------------------------------------------------------

/// A renderable chart, independent of the toolkit that draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Pie(PieFigure),
    Scatter(ScatterFigure),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Pie(pie) => &pie.title,
            Figure::Scatter(scatter) => &scatter.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieFigure {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// One drawn sector: `[start, end)` as fractions of the full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub slice: usize,
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn fraction(&self) -> f64 {
        self.end - self.start
    }
}

impl PieFigure {
    /// One slice per outcome class, labelled by the raw class value.
    pub fn from_distribution(dist: &OutcomeDistribution) -> Self {
        let slices = dist
            .counts
            .iter()
            .map(|(class, &count)| PieSlice {
                label: class.to_string(),
                value: count as f64,
            })
            .collect();
        PieFigure {
            title: dist.title.clone(),
            slices,
        }
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Sectors for the non-empty slices. An all-zero pie has none.
    pub fn sectors(&self) -> Vec<Sector> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }
        let mut start = 0.0;
        let mut sectors = Vec::new();
        for (i, slice) in self.slices.iter().enumerate() {
            if slice.value <= 0.0 {
                continue;
            }
            let end = start + slice.value / total;
            sectors.push(Sector {
                slice: i,
                start,
                end,
            });
            start = end;
        }
        sectors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Legend group: booster category when known, otherwise the outcome.
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterFigure {
    /// Payload on x, outcome class on y.
    pub fn from_records<'a>(
        title: String,
        records: impl IntoIterator<Item = &'a LaunchRecord>,
    ) -> Self {
        let points = records
            .into_iter()
            .map(|r| ScatterPoint {
                x: r.payload_mass_kg,
                y: r.outcome.as_f64(),
                group: r
                    .booster_category
                    .clone()
                    .unwrap_or_else(|| r.outcome.to_string()),
            })
            .collect();
        ScatterFigure {
            title,
            x_label: COL_PAYLOAD_MASS.to_string(),
            y_label: COL_CLASS.to_string(),
            points,
        }
    }

    /// Distinct groups in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for p in &self.points {
            if !groups.contains(&p.group.as_str()) {
                groups.push(&p.group);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::compute_outcome_distribution;
    use crate::data::model::{LaunchDataset, OutcomeClass, SiteSelection};

    fn dataset() -> LaunchDataset {
        let mut tagged = LaunchRecord::new("KSC LC-39A", 9600.0, OutcomeClass::Failure);
        tagged.booster_category = Some("FT".into());
        LaunchDataset::from_records(vec![
            LaunchRecord::new("CCAFS LC-40", 500.0, OutcomeClass::Success),
            tagged,
            LaunchRecord::new("CCAFS LC-40", 3000.0, OutcomeClass::Failure),
        ])
    }

    #[test]
    fn pie_has_a_slice_per_class() {
        let dist = compute_outcome_distribution(&dataset(), &SiteSelection::All);
        let pie = PieFigure::from_distribution(&dist);
        assert_eq!(pie.slices.len(), 2);
        assert_eq!(pie.slices[0].label, "0");
        assert_eq!(pie.slices[0].value, 2.0);
        assert_eq!(pie.slices[1].label, "1");
        assert_eq!(pie.total(), 3.0);
    }

    #[test]
    fn sectors_cover_the_circle_and_skip_empty_slices() {
        let pie = PieFigure {
            title: String::new(),
            slices: vec![
                PieSlice {
                    label: "0".into(),
                    value: 0.0,
                },
                PieSlice {
                    label: "1".into(),
                    value: 4.0,
                },
            ],
        };
        let sectors = pie.sectors();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].slice, 1);
        assert_eq!(sectors[0].fraction(), 1.0);
    }

    #[test]
    fn empty_pie_has_no_sectors() {
        let dist = compute_outcome_distribution(&dataset(), &SiteSelection::from("nowhere"));
        assert!(PieFigure::from_distribution(&dist).sectors().is_empty());
    }

    #[test]
    fn scatter_groups_by_booster_category_then_outcome() {
        let ds = dataset();
        let scatter = ScatterFigure::from_records("t".into(), ds.records());
        assert_eq!(scatter.points[1].group, "FT");
        assert_eq!(scatter.points[1].y, 0.0);
        assert_eq!(scatter.groups(), ["1", "FT", "0"]);
        assert_eq!(scatter.x_label, "Payload Mass (kg)");
    }

    #[test]
    fn figure_json_is_tagged() {
        let fig = Figure::Pie(PieFigure {
            title: "t".into(),
            slices: Vec::new(),
        });
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], "t");
    }
}
