//! Integration tests for resolving stars against loaded datasets.

mod common;

use common::{table, write_file, LINES_CSV, STARS_CSV};
use starline::atmosphere::{AtmosphereLayer, ModelAtmosphere};
use starline::data::model::{CellValue, Column};
use starline::star::{DiagnosticCode, ParameterFamily};
use starline::{Dataset, Star};
use tempfile::TempDir;

fn load_fixture(with_lines: bool) -> (TempDir, Dataset) {
    let dir = TempDir::new().expect("create temp dir");
    let stars = write_file(dir.path(), "stars.csv", STARS_CSV);
    let lines = write_file(dir.path(), "lines.csv", LINES_CSV);
    let dataset = Dataset::load(&stars, with_lines.then_some(lines.as_path()))
        .expect("load fixture dataset");
    (dir, dataset)
}

#[test]
fn output_family_wins_and_missing_vt_out_is_not_fatal() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD1");

    let report = star.resolve(&dataset);

    assert_eq!(star.teff, Some(5700.0));
    assert_eq!(star.logg, Some(4.4));
    assert_eq!(star.feh, Some(0.0));
    assert_eq!(star.err_teff, Some(25.0));
    assert_eq!(star.err_feh, Some(0.02));
    // vt_in exists but the output family supplied the parameters.
    assert_eq!(star.vt, None);
    assert_eq!(report.family, Some(ParameterFamily::Output));
    assert_eq!(report.attempted, vec![ParameterFamily::Output]);
    assert!(report.is_ok());
}

#[test]
fn input_family_is_used_after_output_family_fails() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD2");

    let report = star.resolve(&dataset);

    assert_eq!(star.teff, Some(5000.0));
    assert_eq!(star.logg, Some(4.0));
    assert_eq!(star.feh, Some(-0.2));
    assert_eq!(star.vt, Some(0.95));
    assert_eq!(star.err_teff, None);
    assert_eq!(
        report.attempted,
        vec![ParameterFamily::Output, ParameterFamily::Input]
    );
    assert_eq!(report.family, Some(ParameterFamily::Input));
    assert!(report.has(DiagnosticCode::FamilyUnavailable));
}

#[test]
fn unknown_star_is_left_untouched() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD404");
    let before = star.clone();

    let report = star.resolve(&dataset);

    assert_eq!(star, before);
    assert!(report.has(DiagnosticCode::StarNotFound));
    assert_eq!(report.row, None);
    assert!(report.attempted.is_empty());
    assert!(!report.is_ok());
}

#[test]
fn truthy_additional_columns_are_copied() {
    let (_dir, dataset) = load_fixture(true);

    let mut hd1 = Star::new("HD1");
    let report = hd1.resolve(&dataset);
    assert_eq!(hd1.additional.v, Some(-12.3));
    assert_eq!(hd1.additional.err_v, Some(0.1));
    assert_eq!(hd1.additional.plx, Some(40.1));
    assert_eq!(hd1.additional.err_plx, Some(0.3));
    assert_eq!(hd1.additional.converged, Some(true));
    assert_eq!(report.additional, vec!["v", "err_v", "plx", "err_plx", "converged"]);

    // v = 0, empty cells and converged = False are all falsy.
    let mut hd2 = Star::new("HD2");
    let report = hd2.resolve(&dataset);
    assert!(hd2.additional.is_empty());
    assert!(report.additional.is_empty());
}

#[test]
fn resolving_twice_gives_the_same_star() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD1");

    star.resolve(&dataset);
    let first = star.clone();
    star.resolve(&dataset);

    assert_eq!(star, first);
}

#[test]
fn line_list_keeps_only_positive_equivalent_widths() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD1");

    let report = star.resolve(&dataset);

    let linelist = star.linelist.expect("line list attached");
    assert_eq!(linelist.len(), 2);
    assert_eq!(linelist.wavelengths(), vec![5044.21, 4508.29]);
    assert_eq!(linelist.equivalent_widths(), vec![1.2, 3.4]);
    let second = linelist.lines[1];
    assert_eq!(second.species, 26.1);
    assert_eq!(second.ep, 2.856);
    assert_eq!(second.gf, -2.440);
    assert_eq!(report.lines, Some(2));
}

#[test]
fn empty_equivalent_width_cells_count_as_unmeasured() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD2");
    star.resolve(&dataset);

    let linelist = star.linelist.expect("line list attached");
    assert_eq!(linelist.wavelengths(), vec![5044.21]);
}

#[test]
fn no_line_data_is_a_warning() {
    let (_dir, dataset) = load_fixture(false);
    let mut star = Star::new("HD1");

    let report = star.resolve(&dataset);

    assert!(star.linelist.is_none());
    assert_eq!(star.teff, Some(5700.0));
    assert!(report.has(DiagnosticCode::NoLineData));
    assert!(report.is_ok());
}

#[test]
fn star_without_equivalent_width_column_gets_no_line_list() {
    let stars = table(vec![
        Column::from_strs("id", &["HD3"]),
        Column::from_f64("teff_in", &[6000.0]),
        Column::from_f64("logg_in", &[4.3]),
        Column::from_f64("feh_in", &[-0.3]),
    ]);
    let lines = table(vec![
        Column::from_f64("wavelength", &[5044.21]),
        Column::from_f64("species", &[26.0]),
        Column::from_f64("ep", &[2.851]),
        Column::from_f64("gf", &[-2.058]),
        Column::from_f64("HD1", &[1.2]),
    ]);
    let dataset = Dataset::from_tables(stars, Some(lines));
    let mut star = Star::new("HD3");

    let report = star.resolve(&dataset);

    assert!(star.linelist.is_none());
    assert!(report.has(DiagnosticCode::NoEquivalentWidths));
}

#[test]
fn incomplete_input_family_commits_nothing() {
    let stars = table(vec![
        Column::from_strs("id", &["HD4"]),
        Column::from_f64("teff_in", &[5200.0]),
        Column::from_f64("logg_in", &[4.1]),
        Column::from_f64("vt_in", &[1.0]),
        Column::from_f64("plx", &[8.2]),
    ]);
    let dataset = Dataset::from_tables(stars, None);
    let mut star = Star::new("HD4");

    let report = star.resolve(&dataset);

    assert_eq!(star.teff, None);
    assert_eq!(star.logg, None);
    assert_eq!(star.vt, None);
    assert!(report.has(DiagnosticCode::ParametersNotFound));
    // Later steps still run.
    assert_eq!(star.additional.plx, Some(8.2));
}

#[test]
fn duplicate_identifiers_use_the_first_row() {
    let stars = table(vec![
        Column::from_strs("id", &["HD5", "HD5"]),
        Column::from_f64("teff_in", &[5100.0, 6100.0]),
        Column::from_f64("logg_in", &[4.2, 4.3]),
        Column::from_f64("feh_in", &[0.1, 0.2]),
    ]);
    let dataset = Dataset::from_tables(stars, None);
    let mut star = Star::new("HD5");

    let report = star.resolve(&dataset);

    assert_eq!(star.teff, Some(5100.0));
    assert_eq!(report.row, Some(0));
    assert!(report.has(DiagnosticCode::DuplicateStar));
}

#[test]
fn numeric_identifiers_are_matched_by_name() {
    let stars = table(vec![
        Column::new("id", vec![CellValue::Integer(10234)]),
        Column::from_f64("teff_in", &[4800.0]),
        Column::from_f64("logg_in", &[2.5]),
        Column::from_f64("feh_in", &[-1.0]),
    ]);
    let dataset = Dataset::from_tables(stars, None);
    let mut star = Star::new("10234");

    star.resolve(&dataset);

    assert_eq!(star.teff, Some(4800.0));
}

#[test]
fn resolved_star_can_request_an_atmosphere() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD1");
    star.resolve(&dataset);

    let interpolator = |teff: f64, logg: f64, feh: f64, grid: &str| -> Option<ModelAtmosphere> {
        assert_eq!((teff, logg, feh, grid), (5700.0, 4.4, 0.0, "odfnew"));
        Some(ModelAtmosphere::new(vec![AtmosphereLayer {
            rhox: 0.01,
            t: 4200.0,
            p: 100.0,
            xne: 1.0e10,
            abross: 1.0e-3,
        }]))
    };
    star
        .get_default_model_atmosphere(&interpolator)
        .expect("atmosphere attached");

    assert_eq!(star.model_atmosphere_grid.as_deref(), Some("odfnew"));
    assert_eq!(star.model_atmosphere.map(|m| m.depth()), Some(1));
}

#[test]
fn unresolved_star_cannot_request_an_atmosphere() {
    let (_dir, dataset) = load_fixture(true);
    let mut star = Star::new("HD404");
    star.resolve(&dataset);

    let called = std::cell::Cell::new(false);
    let interpolator = |_: f64, _: f64, _: f64, _: &str| -> Option<ModelAtmosphere> {
        called.set(true);
        None
    };

    assert!(star.get_default_model_atmosphere(&interpolator).is_err());
    assert!(!called.get());
    assert!(star.model_atmosphere.is_none());
    assert!(star.model_atmosphere_grid.is_none());
}

#[test]
fn identifiers_that_look_numeric_are_matched_verbatim() {
    let dir = TempDir::new().expect("create temp dir");
    let stars = write_file(
        dir.path(),
        "stars.csv",
        "id,teff_in,logg_in,feh_in\n007,5000,4.0,-0.2\n1e3,5100,4.1,0.0\nnan,5200,4.2,0.1\n",
    );
    let dataset = Dataset::load(&stars, None).expect("load dataset");

    for (name, teff) in [("007", 5000.0), ("1e3", 5100.0), ("nan", 5200.0)] {
        let mut star = Star::new(name);
        let report = star.resolve(&dataset);
        assert!(report.has(DiagnosticCode::StarFound), "{name} not found");
        assert_eq!(star.teff, Some(teff), "{name}");
    }

    // "7" is not "007".
    let mut star = Star::new("7");
    let report = star.resolve(&dataset);
    assert!(report.has(DiagnosticCode::StarNotFound));
}

fn output_family_with_vt(vt_out: Option<f64>, err_vt_out: Option<f64>) -> Dataset {
    let mut columns = vec![
        Column::from_strs("id", &["HD6"]),
        Column::from_f64("teff_out", &[5650.0]),
        Column::from_f64("logg_out", &[4.35]),
        Column::from_f64("feh_out", &[-0.05]),
        Column::from_f64("err_teff_out", &[20.0]),
        Column::from_f64("err_logg_out", &[0.04]),
        Column::from_f64("err_feh_out", &[0.01]),
        Column::from_f64("vt_in", &[1.5]),
        Column::from_f64("err_vt_in", &[0.3]),
    ];
    if let Some(vt) = vt_out {
        columns.push(Column::from_f64("vt_out", &[vt]));
    }
    if let Some(err) = err_vt_out {
        columns.push(Column::from_f64("err_vt_out", &[err]));
    }
    Dataset::from_tables(table(columns), None)
}

#[test]
fn output_family_commits_vt_and_its_uncertainty() {
    let dataset = output_family_with_vt(Some(1.05), Some(0.07));
    let mut star = Star::new("HD6");

    let report = star.resolve(&dataset);

    assert_eq!(report.family, Some(ParameterFamily::Output));
    assert_eq!(star.teff, Some(5650.0));
    assert_eq!(star.vt, Some(1.05));
    assert_eq!(star.err_vt, Some(0.07));
}

#[test]
fn output_family_vt_without_uncertainty_leaves_err_vt_unset() {
    let dataset = output_family_with_vt(Some(1.05), None);
    let mut star = Star::new("HD6");

    let report = star.resolve(&dataset);

    assert_eq!(report.family, Some(ParameterFamily::Output));
    assert_eq!(star.vt, Some(1.05));
    assert_eq!(star.err_vt, None);
}

#[test]
fn input_family_ignores_vt_uncertainty_column() {
    let stars = table(vec![
        Column::from_strs("id", &["HD7"]),
        Column::from_f64("teff_in", &[5300.0]),
        Column::from_f64("logg_in", &[4.2]),
        Column::from_f64("feh_in", &[0.05]),
        Column::from_f64("vt_in", &[1.0]),
        Column::from_f64("err_vt_in", &[0.2]),
    ]);
    let dataset = Dataset::from_tables(stars, None);
    let mut star = Star::new("HD7");

    star.resolve(&dataset);

    assert_eq!(star.vt, Some(1.0));
    assert_eq!(star.err_vt, None);
}

#[test]
fn uncertainties_from_an_earlier_resolve_do_not_survive_a_family_change() {
    let (_dir, with_output) = load_fixture(false);
    let input_only = Dataset::from_tables(
        table(vec![
            Column::from_strs("id", &["HD1"]),
            Column::from_f64("teff_in", &[5000.0]),
            Column::from_f64("logg_in", &[4.0]),
            Column::from_f64("feh_in", &[-0.2]),
        ]),
        None,
    );
    let mut star = Star::new("HD1");

    star.resolve(&with_output);
    assert_eq!(star.err_teff, Some(25.0));
    let report = star.resolve(&input_only);

    assert_eq!(report.family, Some(ParameterFamily::Input));
    assert_eq!(star.teff, Some(5000.0));
    assert_eq!(star.err_teff, None);
    assert_eq!(star.err_logg, None);
    assert_eq!(star.err_feh, None);
}
