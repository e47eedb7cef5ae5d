/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesDataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SalesRecord>, region list, price bounds
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region + price predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group-by sums, top-N → SalesReport
///   └───────────┘
/// ```

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::DataError;
