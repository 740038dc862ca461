use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{LaunchDataset, LaunchRecord, OutcomeClass};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `Launch Site`, `Payload Mass (kg)`, `class` required
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., "class": ... }, ...]`
/// * `.parquet` – same column names as the CSV
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading launch records from {}", path.display()))?;

    log::info!(
        "Loaded {} launches from {} ({} sites)",
        dataset.len(),
        path.display(),
        dataset.sites().len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row schema shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the source file.  Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category", default)]
    booster_category: Option<String>,
}

impl TryFrom<RawLaunchRow> for LaunchRecord {
    type Error = anyhow::Error;

    fn try_from(row: RawLaunchRow) -> Result<Self> {
        Ok(LaunchRecord {
            launch_site: row.launch_site,
            payload_mass_kg: row.payload_mass_kg,
            outcome: OutcomeClass::try_from(row.class)?,
            flight_number: row.flight_number,
            booster_version: row.booster_version.filter(|s| !s.is_empty()),
            booster_category: row.booster_category.filter(|s| !s.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for required in [COL_LAUNCH_SITE, COL_PAYLOAD_MASS, COL_CLASS] {
        if !headers.iter().any(|h| h == required) {
            bail!("CSV missing '{required}' column");
        }
    }

    // Errors name the 1-based file line, header included.
    let mut records = Vec::new();
    for result in reader.records() {
        let raw = result.context("reading CSV record")?;
        let line = raw.position().map_or(0, |p| p.line());
        let row: RawLaunchRow = raw
            .deserialize(Some(&headers))
            .with_context(|| format!("CSV line {line}"))?;
        records.push(LaunchRecord::try_from(row).with_context(|| format!("CSV line {line}"))?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout.
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawLaunchRow> = serde_json::from_str(&text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LaunchRecord::try_from(row).with_context(|| format!("JSON row {i}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the CSV's column names.
///
/// `Payload Mass (kg)` may be any float or integer type, `class` any integer
/// type. Works with files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let site_col = required_column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = required_column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = required_column(&batch, COL_CLASS)?;
        let flight_col = optional_column(&batch, COL_FLIGHT_NUMBER);
        let version_col = optional_column(&batch, COL_BOOSTER_VERSION);
        let category_col = optional_column(&batch, COL_BOOSTER_CATEGORY);

        for row in 0..batch.num_rows() {
            let launch_site = string_at(site_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COL_LAUNCH_SITE}'"))?;
            let payload_mass_kg = f64_at(payload_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COL_PAYLOAD_MASS}'"))?;
            let class = i64_at(class_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COL_CLASS}'"))?;

            records.push(LaunchRecord {
                launch_site,
                payload_mass_kg,
                outcome: OutcomeClass::try_from(class).with_context(|| format!("Row {row}"))?,
                flight_number: flight_col
                    .and_then(|c| i64_at(c, row).ok())
                    .and_then(|n| u32::try_from(n).ok()),
                booster_version: version_col.and_then(|c| string_at(c, row).ok()),
                booster_category: category_col.and_then(|c| string_at(c, row).ok()),
            });
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    optional_column(batch, name).with_context(|| format!("Parquet file missing '{name}' column"))
}

fn optional_column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a ArrayRef> {
    batch.schema_ref().index_of(name).ok().map(|i| batch.column(i))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

fn f64_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f64::from(arr.value(row)))
    } else {
        i64_at(col, row).map(|v| v as f64)
    }
}

fn i64_at(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(i64::from(arr.value(row)))
    } else {
        bail!("Expected an integer column, got {:?}", col.data_type())
    }
}
