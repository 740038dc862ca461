use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use spacex_dash::config::DEFAULT_DATA_PATH;

const LAUNCHES: usize = 56;

/// Site and its share of launches, in the order pads came into service.
const SITES: [(&str, f64); 4] = [
    ("CCAFS LC-40", 0.46),
    ("VAFB SLC-4E", 0.18),
    ("KSC LC-39A", 0.23),
    ("CCAFS SLC-40", 0.13),
];

/// Booster generation by flight number (upper bound, category).
const BOOSTERS: [(usize, &str, &str); 5] = [
    (5, "v1.0", "F9 v1.0"),
    (20, "v1.1", "F9 v1.1"),
    (40, "FT", "F9 FT"),
    (48, "B4", "F9 B4"),
    (LAUNCHES, "B5", "F9 B5"),
];

#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Pick an index according to `weights` (which sum to ~1).
    fn weighted(&mut self, weights: impl Iterator<Item = f64>) -> usize {
        let r = self.next_f64();
        let mut acc = 0.0;
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            acc += w;
            last = i;
            if r < acc {
                return i;
            }
        }
        last
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    (1..=LAUNCHES)
        .map(|flight| {
            let (site, _) = SITES[rng.weighted(SITES.iter().map(|(_, w)| *w))];
            let (_, category, version) = BOOSTERS
                .iter()
                .find(|(upper, _, _)| flight <= *upper)
                .copied()
                .unwrap_or(BOOSTERS[BOOSTERS.len() - 1]);

            // Later boosters fly heavier payloads and land more often.
            let progress = flight as f64 / LAUNCHES as f64;
            let payload = if flight == 1 {
                0.0
            } else {
                let mean = 1500.0 + 5500.0 * progress;
                (mean + (rng.next_f64() - 0.5) * 4000.0).clamp(350.0, 9600.0)
            };
            let success_odds = 0.15 + 0.75 * progress;
            let class = i64::from(rng.next_f64() < success_odds);

            SampleRow {
                flight_number: flight as i64,
                launch_site: site.to_string(),
                class,
                payload_mass_kg: (payload / 10.0).round() * 10.0,
                booster_version: format!("{version} B{:04}", 1000 + flight),
                booster_category: category.to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.launch_site))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.booster_version))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.booster_category))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &rows)?;
    } else {
        write_csv(&output_path, &rows)?;
    }

    let successes = rows.iter().filter(|r| r.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {}",
        rows.len(),
        output_path.display()
    );
    Ok(())
}
