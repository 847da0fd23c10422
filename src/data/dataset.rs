use std::fmt;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use super::loader::{load_table, LoadOptions};
use super::model::Table;
use crate::error::LoadError;

/// Name of the star identifier column in the stellar parameters table.
pub const ID_COLUMN: &str = "id";

// ---------------------------------------------------------------------------
// StarLookup – result of searching the identifier column
// ---------------------------------------------------------------------------

/// Where (if anywhere) a star sits in the stellar parameters table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarLookup {
    NotFound,
    Unique(usize),
    /// The identifier appears `count` times; only `first` is ever used.
    Duplicate { first: usize, count: usize },
}

impl StarLookup {
    /// The row that lookups resolve to.
    pub fn row(self) -> Option<usize> {
        match self {
            StarLookup::NotFound => None,
            StarLookup::Unique(row) | StarLookup::Duplicate { first: row, .. } => Some(row),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the stellar parameters table plus optional line data
// ---------------------------------------------------------------------------

/// Stellar parameters (one row per star) and, optionally, a line list with
/// one equivalent-width column per star. Read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    star_data: Table,
    star_data_path: Option<PathBuf>,
    lines: Option<Table>,
    lines_path: Option<PathBuf>,
}

impl Dataset {
    /// Load with format and delimiter inferred from the file extensions.
    pub fn load(stars: impl AsRef<Path>, lines: Option<&Path>) -> Result<Self, LoadError> {
        Self::load_with(stars, lines, &LoadOptions::default())
    }

    /// Load the stellar parameters source and, if given, the lines source.
    ///
    /// Either source failing to load fails the whole construction. A missing
    /// lines path is not an error, but the dataset will have no line data.
    /// Star identifiers are always read as text.
    pub fn load_with(
        stars: impl AsRef<Path>,
        lines: Option<&Path>,
        options: &LoadOptions,
    ) -> Result<Self, LoadError> {
        let stars = stars.as_ref();
        let star_options = options.clone().with_text_column(ID_COLUMN);
        let star_data = load_table(stars, &star_options).map_err(|source| {
            error!("Star data file {} not found or could not be read.", stars.display());
            LoadError::StarData {
                path: stars.to_path_buf(),
                source,
            }
        })?;

        let lines_table = match lines {
            Some(path) => Some(load_table(path, options).map_err(|source| {
                error!("Lines file {} not found or could not be read.", path.display());
                LoadError::Lines {
                    path: path.to_path_buf(),
                    source,
                }
            })?),
            None => {
                warn!("No lines data. Won't be able to run line analysis.");
                None
            }
        };

        info!(
            "Dataset loaded: {} star row(s), {} line row(s).",
            star_data.len(),
            lines_table.as_ref().map_or(0, Table::len)
        );

        Ok(Dataset {
            star_data,
            star_data_path: Some(stars.to_path_buf()),
            lines: lines_table,
            lines_path: lines.map(Path::to_path_buf),
        })
    }

    /// Build a dataset from tables already in memory.
    pub fn from_tables(star_data: Table, lines: Option<Table>) -> Self {
        Dataset {
            star_data,
            star_data_path: None,
            lines,
            lines_path: None,
        }
    }

    pub fn star_data(&self) -> &Table {
        &self.star_data
    }

    pub fn lines(&self) -> Option<&Table> {
        self.lines.as_ref()
    }

    pub fn has_lines(&self) -> bool {
        self.lines.is_some()
    }

    pub fn star_data_path(&self) -> Option<&Path> {
        self.star_data_path.as_deref()
    }

    pub fn lines_path(&self) -> Option<&Path> {
        self.lines_path.as_deref()
    }

    /// Search the identifier column for `name`.
    pub fn find_star(&self, name: &str) -> StarLookup {
        let rows = self
            .star_data
            .rows_where(ID_COLUMN, |v| v.matches_name(name))
            .unwrap_or_default();

        match rows.as_slice() {
            [] => StarLookup::NotFound,
            [row] => StarLookup::Unique(*row),
            [first, ..] => StarLookup::Duplicate {
                first: *first,
                count: rows.len(),
            },
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(path: Option<&Path>) -> String {
            path.map_or_else(|| "None".to_string(), |p| p.display().to_string())
        }
        writeln!(f, "Dataset built from:")?;
        writeln!(f, "  stars file = {}", show(self.star_data_path()))?;
        write!(f, "  lines file = {}", show(self.lines_path()))
    }
}
