//! Star records: identity, fundamental parameters, and what gets attached
//! to them from a [`Dataset`](crate::data::dataset::Dataset) or an
//! atmosphere [`Interpolator`].

pub mod report;
pub mod resolve;

use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::atmosphere::{is_known_grid, Interpolator, ModelAtmosphere, DEFAULT_GRID};
use crate::data::model::CellValue;
use crate::error::AtmosphereError;

pub use report::{Diagnostic, DiagnosticCode, ResolveReport, Severity};
pub use resolve::ParameterFamily;

// ---------------------------------------------------------------------------
// Line list
// ---------------------------------------------------------------------------

/// A spectral line with this star's equivalent width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    /// Wavelength (Å).
    pub wavelength: f64,
    /// Species code, e.g. 26.0 for Fe I, 26.1 for Fe II.
    pub species: f64,
    /// Excitation potential (eV).
    pub ep: f64,
    /// log gf.
    pub gf: f64,
    /// Equivalent width (mÅ), always positive.
    pub ew: f64,
}

/// The measured lines of one star, in lines-table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineList {
    pub lines: Vec<Line>,
}

impl LineList {
    pub fn new(lines: Vec<Line>) -> Self {
        LineList { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn wavelengths(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.wavelength).collect()
    }

    pub fn equivalent_widths(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.ew).collect()
    }
}

// ---------------------------------------------------------------------------
// Additional parameters
// ---------------------------------------------------------------------------

/// Optional scalars copied from the stellar parameters table. Each is only
/// set when its column exists and the star's cell is truthy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalParameters {
    /// Radial velocity (km/s).
    pub v: Option<f64>,
    pub err_v: Option<f64>,
    /// Parallax (mas).
    pub plx: Option<f64>,
    pub err_plx: Option<f64>,
    pub converged: Option<bool>,
}

impl AdditionalParameters {
    /// Store a truthy `value` under `column`. Returns false if the column is
    /// unknown or the value has the wrong type for it.
    pub fn set(&mut self, column: &str, value: &CellValue) -> bool {
        if column == "converged" {
            self.converged = Some(value.is_truthy());
            return true;
        }
        let slot = match column {
            "v" => &mut self.v,
            "err_v" => &mut self.err_v,
            "plx" => &mut self.plx,
            "err_plx" => &mut self.err_plx,
            _ => return false,
        };
        match value.as_f64() {
            Some(x) => {
                *slot = Some(x);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Star
// ---------------------------------------------------------------------------

/// A star and everything known about it so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub name: String,
    /// Effective temperature (K).
    pub teff: Option<f64>,
    /// Surface gravity (log cgs).
    pub logg: Option<f64>,
    /// Metallicity [Fe/H].
    pub feh: Option<f64>,
    /// Microturbulence (km/s).
    pub vt: Option<f64>,
    pub err_teff: Option<f64>,
    pub err_logg: Option<f64>,
    pub err_feh: Option<f64>,
    pub err_vt: Option<f64>,
    pub additional: AdditionalParameters,
    pub linelist: Option<LineList>,
    pub model_atmosphere: Option<ModelAtmosphere>,
    pub model_atmosphere_grid: Option<String>,
}

impl Default for Star {
    fn default() -> Self {
        Star::new("Unnamed star")
    }
}

impl Star {
    /// A star known only by name.
    pub fn new(name: impl Into<String>) -> Self {
        Star {
            name: name.into(),
            teff: None,
            logg: None,
            feh: None,
            vt: None,
            err_teff: None,
            err_logg: None,
            err_feh: None,
            err_vt: None,
            additional: AdditionalParameters::default(),
            linelist: None,
            model_atmosphere: None,
            model_atmosphere_grid: None,
        }
    }

    /// A star with parameters supplied up front.
    pub fn with_parameters(
        name: impl Into<String>,
        teff: Option<f64>,
        logg: Option<f64>,
        feh: Option<f64>,
        vt: Option<f64>,
    ) -> Self {
        Star {
            teff,
            logg,
            feh,
            vt,
            ..Star::new(name)
        }
    }

    /// Teff, logg and [Fe/H] are all set.
    pub fn has_fundamental_parameters(&self) -> bool {
        self.teff.is_some() && self.logg.is_some() && self.feh.is_some()
    }

    /// [`get_model_atmosphere`](Self::get_model_atmosphere) on the default grid.
    pub fn get_default_model_atmosphere<I>(
        &mut self,
        interpolator: &I,
    ) -> Result<&ModelAtmosphere, AtmosphereError>
    where
        I: Interpolator + ?Sized,
    {
        self.get_model_atmosphere(interpolator, DEFAULT_GRID)
    }

    /// Interpolate a model atmosphere on `grid` for this star's parameters
    /// and attach it.
    ///
    /// The star is left untouched when Teff, logg or [Fe/H] is missing, or
    /// when the interpolator has no model for the point.
    pub fn get_model_atmosphere<I>(
        &mut self,
        interpolator: &I,
        grid: &str,
    ) -> Result<&ModelAtmosphere, AtmosphereError>
    where
        I: Interpolator + ?Sized,
    {
        let (Some(teff), Some(logg), Some(feh)) = (self.teff, self.logg, self.feh) else {
            let missing = [("teff", self.teff), ("logg", self.logg), ("feh", self.feh)]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name)
                .collect();
            let err = AtmosphereError::MissingParameters {
                star: self.name.clone(),
                missing,
            };
            log::error!("To create model atmosphere, {err}.");
            return Err(err);
        };

        if !is_known_grid(grid) {
            warn!("Grid '{grid}' is not one of the usual model grids.");
        }

        let Some(atmosphere) = interpolator.interpolate(teff, logg, feh, grid) else {
            let err = AtmosphereError::OutsideGrid {
                grid: grid.to_string(),
                teff,
                logg,
                feh,
            };
            warn!("No model atmosphere for '{}': {err}.", self.name);
            return Err(err);
        };

        info!(
            "Model atmosphere ({} layers, grid {grid}) added to star '{}'.",
            atmosphere.depth(),
            self.name
        );
        self.model_atmosphere_grid = Some(grid.to_string());
        let stored = self.model_atmosphere.insert(atmosphere);
        Ok(&*stored)
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(v: Option<f64>) -> String {
            v.map_or_else(|| "None".to_string(), |x| x.to_string())
        }
        write!(
            f,
            "Star object named '{}':\n  Teff = {} K, logg = {}, feh = {}, vt = {} km/s",
            self.name,
            show(self.teff),
            show(self.logg),
            show(self.feh),
            show(self.vt)
        )
    }
}
