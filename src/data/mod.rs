/// Data layer: core types, loading, and the filter/rank pipeline.
///
/// Architecture:
/// ```text
///  inbound.csv / outbound.csv / flows*.csv   (.json / .parquet accepted)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate schema → MoversData
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │  MoversData  │  three Dataset tables + selector metadata
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → indices ranked by count desc
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
