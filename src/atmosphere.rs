//! Model atmospheres and the interpolator seam.
//!
//! Interpolating a precomputed grid happens outside this crate; a star only
//! needs something implementing [`Interpolator`].

use serde::Serialize;

/// Grid used when none is requested explicitly.
pub const DEFAULT_GRID: &str = "odfnew";

/// Grid names recognised by common Kurucz/MARCS interpolators.
pub const KNOWN_GRIDS: &[&str] = &["odfnew", "aodfnew", "over", "nover", "marcs", "nextgen"];

/// One depth point of a model atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphereLayer {
    /// Column mass (g cm^-2).
    pub rhox: f64,
    /// Temperature (K).
    pub t: f64,
    /// Gas pressure (dyn cm^-2).
    pub p: f64,
    /// Electron number density (cm^-3).
    pub xne: f64,
    /// Rosseland mean opacity.
    pub abross: f64,
}

/// An interpolated model atmosphere, outermost layer first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelAtmosphere {
    pub layers: Vec<AtmosphereLayer>,
}

impl ModelAtmosphere {
    pub fn new(layers: Vec<AtmosphereLayer>) -> Self {
        ModelAtmosphere { layers }
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

/// Produces a model atmosphere for (Teff, logg, [Fe/H]) on a named grid,
/// or `None` when the point falls outside the grid.
pub trait Interpolator {
    fn interpolate(&self, teff: f64, logg: f64, feh: f64, grid: &str) -> Option<ModelAtmosphere>;
}

impl<F> Interpolator for F
where
    F: Fn(f64, f64, f64, &str) -> Option<ModelAtmosphere>,
{
    fn interpolate(&self, teff: f64, logg: f64, feh: f64, grid: &str) -> Option<ModelAtmosphere> {
        self(teff, logg, feh, grid)
    }
}

pub fn is_known_grid(grid: &str) -> bool {
    KNOWN_GRIDS.contains(&grid)
}
