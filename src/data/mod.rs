/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, min/max date
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  metrics  │  means, sums, grouped averages
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
