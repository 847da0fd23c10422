#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use starline::data::model::{Column, Table};

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

pub fn table(columns: Vec<Column>) -> Table {
    Table::from_columns(columns).expect("valid fixture table")
}

/// Stellar parameters for `HD1` (output family, no vt_out) and `HD2`
/// (input family only).
pub const STARS_CSV: &str = "\
id,teff_out,logg_out,feh_out,err_teff_out,err_logg_out,err_feh_out,teff_in,logg_in,feh_in,vt_in,v,err_v,plx,err_plx,converged
HD1,5700,4.4,0.0,25,0.05,0.02,5800,4.5,0.1,1.2,-12.3,0.1,40.1,0.3,True
HD2,,,,,,,5000,4.0,-0.2,0.95,0,,,,False
";

pub const LINES_CSV: &str = "\
wavelength,species,ep,gf,HD1,HD2
5044.21,26.0,2.851,-2.058,1.2,40.5
5247.05,26.0,0.087,-4.946,0,
4508.29,26.1,2.856,-2.440,3.4,0
";
