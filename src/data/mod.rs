//! Data layer: tables, file loading, and the dataset stars are resolved from.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  model    │  CellValue, Column, Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ dataset   │  stellar parameters table + optional lines table
//!   └──────────┘
//! ```

pub mod dataset;
pub mod loader;
pub mod model;
