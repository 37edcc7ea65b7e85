/// Data layer: record types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  <dir>/*.xml
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse each file → DatasetRecord
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   Dataset     │  Vec<DatasetRecord>, class index
///   └──────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │  export   │  JSON records / CSV answers
///   └──────────┘   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
