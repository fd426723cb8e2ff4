/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        .geojson
///        │                            │
///        ▼                            ▼
///   ┌──────────┐               ┌────────────┐
///   │  loader   │              │  boundary   │  detect NAME/name key once
///   └──────────┘               └────────────┘
///        │                            │
///        ▼                            │
///   ┌─────────────┐                   │
///   │ CaseDataset  │  Vec<CaseRecord>, vocabulary
///   └─────────────┘                   │
///        │  + FilterSelection         │
///        ▼                            │
///   ┌───────────┐                     │
///   │ aggregate  │  filter → total, year range, by-year, by-county
///   └───────────┘                     │
///        │                            ▼
///        └──────────────────────►┌────────┐
///                                │  join   │  by-county ↔ boundary features
///                                └────────┘
/// ```

pub mod aggregate;
pub mod boundary;
pub mod error;
pub mod filter;
pub mod join;
pub mod loader;
pub mod model;
