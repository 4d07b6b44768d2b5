use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

use crate::config::Settings;
use crate::datasets::CROSSWALK_SOURCES;
use crate::render::table::PipeTable;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)").unwrap());

pub const DATASET_COLUMN: &str = "Dataset";

/// One variable's names across years within one claim file.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosswalkRow {
    pub dataset: String,
    /// Year column → name. Blank cells are left out.
    pub names: HashMap<String, String>,
}

impl CrosswalkRow {
    pub fn name_in(&self, year: &str) -> Option<&str> {
        self.names.get(year).map(String::as_str)
    }
}

/// All crosswalk rows that have a name in the reference year.
#[derive(Debug, Clone, Default)]
pub struct Crosswalk {
    /// Union of year columns, most recent first.
    years: Vec<String>,
    rows: Vec<CrosswalkRow>,
    reference_year: String,
}

impl Crosswalk {
    pub fn load(settings: &Settings) -> Result<Self> {
        let mut sources = Vec::new();
        for (label, code) in CROSSWALK_SOURCES {
            let path = settings.crosswalk_file(code);
            match std::fs::File::open(&path) {
                Ok(file) => sources.push((label.to_string(), file)),
                Err(e) => warn!("Skipping crosswalk {}: {}", path.display(), e),
            }
        }
        let xw = Self::from_sources(sources, &settings.reference_year)?;
        info!(
            "Loaded {} crosswalk rows across {} year columns ({} to {})",
            xw.rows.len(),
            xw.years().len(),
            xw.years().last().map_or("-", String::as_str),
            xw.years().first().map_or("-", String::as_str)
        );
        Ok(xw)
    }

    /// Build from tab-separated tables, each tagged with its dataset label.
    pub fn from_sources<R: Read>(
        sources: impl IntoIterator<Item = (String, R)>,
        reference_year: &str,
    ) -> Result<Self> {
        let mut years = BTreeSet::new();
        let mut rows = Vec::new();

        for (label, reader) in sources {
            let (file_years, file_rows) =
                read_table(&label, reader).with_context(|| format!("Bad {} crosswalk", label))?;
            years.extend(file_years);
            rows.extend(
                file_rows
                    .into_iter()
                    .filter(|r| r.name_in(reference_year).is_some()),
            );
        }

        Ok(Crosswalk {
            years: years.into_iter().rev().collect(),
            rows,
            reference_year: reference_year.to_string(),
        })
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    /// Rows whose reference-year name matches `short_name`, ignoring case.
    pub fn lookup(&self, short_name: &str) -> Vec<&CrosswalkRow> {
        let wanted = short_name.to_lowercase();
        self.rows
            .iter()
            .filter(|r| {
                r.name_in(&self.reference_year)
                    .is_some_and(|n| n.to_lowercase() == wanted)
            })
            .collect()
    }

    /// Name history tables for one variable, `per_table` year columns each,
    /// every table led by the Dataset column. Years blank in every matched
    /// row are dropped. Empty when nothing matched.
    pub fn name_tables(&self, short_name: &str, per_table: usize) -> Vec<PipeTable> {
        let matched = self.lookup(short_name);
        let years: Vec<&String> = self
            .years
            .iter()
            .filter(|y| matched.iter().any(|r| r.name_in(y).is_some()))
            .collect();

        years
            .chunks(per_table.max(1))
            .map(|chunk| {
                let headers = std::iter::once(DATASET_COLUMN).chain(chunk.iter().map(|y| y.as_str()));
                let mut table = PipeTable::new(headers);
                for row in &matched {
                    let mut cells = vec![row.dataset.clone()];
                    cells.extend(
                        chunk
                            .iter()
                            .map(|y| row.name_in(y).map(code_tokens).unwrap_or_default()),
                    );
                    table.push_row(cells);
                }
                table
            })
            .collect()
    }
}

/// Wrap every word token as inline code: `A_B C` → `` `A_B` `C` ``.
fn code_tokens(cell: &str) -> String {
    TOKEN_RE.replace_all(cell, "`$1`").into_owned()
}

fn read_table<R: Read>(label: &str, reader: R) -> Result<(Vec<String>, Vec<CrosswalkRow>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let year_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| YEAR_RE.is_match(h))
        .map(|(i, h)| (i, h.trim().to_string()))
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let names = year_cols
            .iter()
            .filter_map(|(i, year)| {
                let cell = record.get(*i)?.trim();
                (!cell.is_empty()).then(|| (year.clone(), cell.to_string()))
            })
            .collect();
        rows.push(CrosswalkRow {
            dataset: label.to_string(),
            names,
        });
    }

    let years = year_cols.into_iter().map(|(_, y)| y).collect();
    Ok((years, rows))
}
