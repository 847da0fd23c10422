//! Pulling a star's row out of a [`Dataset`].
//!
//! Fundamental parameters come from one column family: the `_out` columns
//! (results of a previous determination) when complete, else the `_in`
//! columns (initial guesses). Teff, logg and [Fe/H] are never mixed across
//! families.

use std::fmt;

use serde::Serialize;

use super::report::{DiagnosticCode, ResolveReport};
use super::{Line, LineList, Star};
use crate::data::dataset::{Dataset, StarLookup};
use crate::data::model::{CellValue, Table};

/// Scalar columns copied onto the star when present and truthy.
pub const ADDITIONAL_COLUMNS: [&str; 5] = ["v", "err_v", "plx", "err_plx", "converged"];

/// Fixed columns of the lines table, in line-list order.
pub const LINE_COLUMNS: [&str; 4] = ["wavelength", "species", "ep", "gf"];

// ---------------------------------------------------------------------------
// ParameterFamily – ordered sources for Teff / logg / [Fe/H] / vt
// ---------------------------------------------------------------------------

/// A family of parameter columns sharing a suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParameterFamily {
    /// `teff_out`, `logg_out`, ... from a prior determination.
    Output,
    /// `teff_in`, `logg_in`, ... initial values.
    Input,
}

impl ParameterFamily {
    /// Families in the order they are tried; the first complete one wins.
    pub const PRIORITY: [ParameterFamily; 2] = [ParameterFamily::Output, ParameterFamily::Input];

    pub fn suffix(self) -> &'static str {
        match self {
            ParameterFamily::Output => "out",
            ParameterFamily::Input => "in",
        }
    }

    /// Column name for `base` in this family, e.g. `teff` → `teff_out`.
    pub fn column(self, base: &str) -> String {
        format!("{base}_{}", self.suffix())
    }

    /// The output family is only usable together with its uncertainties,
    /// and is the only one carrying a vt uncertainty.
    fn requires_errors(self) -> bool {
        matches!(self, ParameterFamily::Output)
    }

    /// Read this family's values for `row`.
    ///
    /// Fails unless Teff, logg and [Fe/H] (plus their uncertainties, for the
    /// output family) are all readable. vt (and, for the output family, its
    /// uncertainty) is read independently and never fails the family.
    pub fn read(self, table: &Table, row: usize) -> Result<FamilyValues, Unreadable> {
        let get = |base: &str| read_f64(table, &self.column(base), row);

        let teff = get("teff")?;
        let logg = get("logg")?;
        let feh = get("feh")?;

        let error_group = || -> Result<[f64; 3], Unreadable> {
            Ok([get("err_teff")?, get("err_logg")?, get("err_feh")?])
        };
        let errors = if self.requires_errors() {
            Some(error_group()?)
        } else {
            error_group().ok()
        };

        Ok(FamilyValues {
            teff,
            logg,
            feh,
            errors,
            vt: get("vt").ok(),
            err_vt: if self.requires_errors() {
                get("err_vt").ok()
            } else {
                None
            },
        })
    }
}

impl fmt::Display for ParameterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.suffix())
    }
}

/// Values read from one family for one star.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyValues {
    pub teff: f64,
    pub logg: f64,
    pub feh: f64,
    /// Uncertainties of Teff, logg and [Fe/H], all or nothing.
    pub errors: Option<[f64; 3]>,
    pub vt: Option<f64>,
    pub err_vt: Option<f64>,
}

/// Why a cell could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unreadable {
    MissingColumn(String),
    NotNumeric(String),
}

impl fmt::Display for Unreadable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unreadable::MissingColumn(col) => write!(f, "no column '{col}'"),
            Unreadable::NotNumeric(col) => write!(f, "'{col}' is empty or not a number"),
        }
    }
}

fn read_f64(table: &Table, column: &str, row: usize) -> Result<f64, Unreadable> {
    let value = table
        .value(column, row)
        .ok_or_else(|| Unreadable::MissingColumn(column.to_string()))?;
    value
        .as_f64()
        .ok_or_else(|| Unreadable::NotNumeric(column.to_string()))
}

// ---------------------------------------------------------------------------
// Star::resolve
// ---------------------------------------------------------------------------

impl Star {
    /// Populate this star from its row in `dataset`.
    ///
    /// Never fails outright: each step is attempted in turn and what went
    /// wrong is recorded in the returned report. If the star is not in the
    /// dataset nothing on the star changes.
    pub fn resolve(&mut self, dataset: &Dataset) -> ResolveReport {
        let mut report = ResolveReport::new();
        let table = dataset.star_data();

        let row = match dataset.find_star(&self.name) {
            StarLookup::NotFound => {
                report.error(
                    DiagnosticCode::StarNotFound,
                    format!("Star '{}' not found in dataset.", self.name),
                );
                return report;
            }
            StarLookup::Unique(row) => {
                report.info(
                    DiagnosticCode::StarFound,
                    format!("Star '{}' found in dataset.", self.name),
                );
                row
            }
            StarLookup::Duplicate { first, count } => {
                report.warning(
                    DiagnosticCode::DuplicateStar,
                    format!(
                        "Star '{}' appears {count} times in dataset; using row {first}.",
                        self.name
                    ),
                );
                first
            }
        };
        report.row = Some(row);

        self.resolve_parameters(table, row, &mut report);
        self.resolve_additional(table, row, &mut report);
        self.resolve_lines(dataset, &mut report);

        report
    }

    fn resolve_parameters(&mut self, table: &Table, row: usize, report: &mut ResolveReport) {
        for family in ParameterFamily::PRIORITY {
            report.attempted.push(family);
            match family.read(table, row) {
                Ok(values) => {
                    self.commit(family, values, report);
                    report.family = Some(family);
                    return;
                }
                Err(reason) => report.info(
                    DiagnosticCode::FamilyUnavailable,
                    format!("No usable {family} parameters for '{}': {reason}.", self.name),
                ),
            }
        }
        report.error(
            DiagnosticCode::ParametersNotFound,
            format!(
                "Neither _out nor _in parameters are complete for '{}'; Teff, logg, [Fe/H] left unchanged.",
                self.name
            ),
        );
    }

    fn commit(&mut self, family: ParameterFamily, values: FamilyValues, report: &mut ResolveReport) {
        self.teff = Some(values.teff);
        self.logg = Some(values.logg);
        self.feh = Some(values.feh);
        report.info(
            DiagnosticCode::ParametersResolved,
            format!("Attributes teff, logg, feh added to star object (from {family})."),
        );

        // Uncertainties always belong to the family that supplied the values.
        let [err_teff, err_logg, err_feh] = values.errors.map_or([None; 3], |e| e.map(Some));
        self.err_teff = err_teff;
        self.err_logg = err_logg;
        self.err_feh = err_feh;
        if values.errors.is_some() {
            report.info(
                DiagnosticCode::ParametersResolved,
                "Attributes err_teff, err_logg, err_feh added to star object.",
            );
        } else {
            report.info(
                DiagnosticCode::MissingOptionalColumn,
                format!("No errors in {family} parameters."),
            );
        }

        match values.vt {
            Some(vt) => {
                self.vt = Some(vt);
                self.err_vt = values.err_vt;
            }
            None => report.warning(
                DiagnosticCode::MissingOptionalColumn,
                format!("No {} for this star.", family.column("vt")),
            ),
        }
    }

    fn resolve_additional(&mut self, table: &Table, row: usize, report: &mut ResolveReport) {
        for column in ADDITIONAL_COLUMNS {
            let Some(value) = table.value(column, row) else {
                continue;
            };
            if !value.is_truthy() {
                continue;
            }
            if self.additional.set(column, value) {
                report.additional.push(column);
            } else {
                report.warning(
                    DiagnosticCode::InvalidValue,
                    format!("Column '{column}' holds non-numeric value '{value}'; skipped."),
                );
            }
        }
        if !report.additional.is_empty() {
            report.info(
                DiagnosticCode::AdditionalAttributes,
                format!(
                    "Additional attribute(s) {} added to star object.",
                    report.additional.join(",")
                ),
            );
        }
    }

    fn resolve_lines(&mut self, dataset: &Dataset, report: &mut ResolveReport) {
        let Some(lines) = dataset.lines() else {
            report.warning(
                DiagnosticCode::NoLineData,
                "There is no line data to attach to star object.",
            );
            return;
        };

        let Some(rows) = lines.rows_where(&self.name, is_measured) else {
            report.warning(
                DiagnosticCode::NoEquivalentWidths,
                format!("Lines table has no equivalent-width column for '{}'.", self.name),
            );
            return;
        };

        if let Some(missing) = LINE_COLUMNS.iter().find(|c| !lines.has_column(c)) {
            report.error(
                DiagnosticCode::InvalidValue,
                format!("Lines table has no '{missing}' column; line list not built."),
            );
            return;
        }

        let mut selected = Vec::with_capacity(rows.len());
        for row in rows {
            match read_line(lines, row, &self.name) {
                Ok(line) => selected.push(line),
                Err(reason) => report.warning(
                    DiagnosticCode::InvalidValue,
                    format!("Line row {row} skipped: {reason}."),
                ),
            }
        }

        report.lines = Some(selected.len());
        report.info(
            DiagnosticCode::LinesAttached,
            format!(
                "Attribute linelist added to star object ({} lines).",
                selected.len()
            ),
        );
        self.linelist = Some(LineList::new(selected));
    }
}

fn read_line(lines: &Table, row: usize, ew_column: &str) -> Result<Line, Unreadable> {
    let [wavelength, species, ep, gf] = LINE_COLUMNS;
    Ok(Line {
        wavelength: read_f64(lines, wavelength, row)?,
        species: read_f64(lines, species, row)?,
        ep: read_f64(lines, ep, row)?,
        gf: read_f64(lines, gf, row)?,
        ew: read_f64(lines, ew_column, row)?,
    })
}

/// Whether a cell counts as a measured equivalent width.
pub fn is_measured(ew: &CellValue) -> bool {
    ew.as_f64().is_some_and(|x| x > 0.0)
}
