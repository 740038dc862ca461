/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset (payload bounds derived once)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, immutable, shared via Arc
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site / payload predicates → outcome counts, scatter rows
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
