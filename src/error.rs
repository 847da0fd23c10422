use std::path::PathBuf;

use thiserror::Error;

/// Structural problems when assembling a [`Table`](crate::data::model::Table).
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
}

/// Failure to build a [`Dataset`](crate::data::dataset::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("star data file {path} could not be read: {source}")]
    StarData {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("lines file {path} could not be read: {source}")]
    Lines {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Why no model atmosphere was attached to a star.
#[derive(Debug, Error, PartialEq)]
pub enum AtmosphereError {
    #[error("star '{star}' is missing {missing:?}; Teff, logg and [Fe/H] are all required")]
    MissingParameters {
        star: String,
        missing: Vec<&'static str>,
    },

    #[error("grid '{grid}' has no model for Teff = {teff}, logg = {logg}, [Fe/H] = {feh}")]
    OutsideGrid {
        grid: String,
        teff: f64,
        logg: f64,
        feh: f64,
    },
}
