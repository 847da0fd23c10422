//! Starline: stellar parameters and line lists attached to star records.
//!
//! A [`Dataset`] holds a stellar parameters table (one row per star) and,
//! optionally, a lines table with one equivalent-width column per star.
//! A [`Star`] pulls its row out of a dataset with [`Star::resolve`] and can
//! request a model atmosphere from any [`Interpolator`].
//!
//! # Modules
//!
//! - [`data`]: tables, file loaders, and the dataset
//! - [`star`]: star records, parameter resolution, diagnostics
//! - [`atmosphere`]: model atmospheres and the interpolator seam
//! - [`error`]: error types

pub mod atmosphere;
pub mod data;
pub mod error;
pub mod star;

pub use atmosphere::{Interpolator, ModelAtmosphere, DEFAULT_GRID};
pub use data::dataset::Dataset;
pub use data::loader::{LoadOptions, TableFormat};
pub use error::{AtmosphereError, LoadError};
pub use star::{ResolveReport, Star};
