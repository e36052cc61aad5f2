//! Data layer: core types, loading, reshaping and summarising.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Table (optional column-name override)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  project │  drop columns, rows untouched
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  encode  │  label column → integer code column
//!   └──────────┘
//!        │
//!        ▼
//!   columnar (Arrow batch, pretty print) ── writer (.csv / .json / .parquet)
//!
//!   stats: mean of a numeric column
//! ```

pub mod columnar;
pub mod encode;
pub mod error;
pub mod loader;
pub mod model;
pub mod project;
pub mod stats;
pub mod writer;
