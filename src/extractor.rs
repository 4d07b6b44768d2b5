use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::config::Settings;
use crate::corpus;
use crate::db;
use crate::parser::variable::{self, VariableRecord};

/// Parse every downloaded variable page and store the sorted table.
pub fn run(settings: &Settings) -> Result<Vec<VariableRecord>> {
    let dir = settings.variables_dir();
    let pages = corpus::variable_pages(&dir)?;
    info!("Extracting {} variable pages from {}", pages.len(), dir.display());

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut records = Vec::with_capacity(pages.len());
    for path in &pages {
        debug!("{}", path.display());
        records.push(extract_page(&dir, path)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    sort_by_title(&mut records);

    let db_path = settings.db_path();
    let conn = db::connect(&db_path)?;
    db::init_schema(&conn)?;
    let saved = db::save_variables(&conn, &records)?;
    info!("Saved {} variables to {}", saved, db_path.display());
    Ok(records)
}

pub fn extract_page(variables_dir: &Path, path: &Path) -> Result<VariableRecord> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let url = corpus::resdac_url(variables_dir, path)
        .with_context(|| format!("{} is outside {}", path.display(), variables_dir.display()))?;
    Ok(variable::extract(&src, path, &url)?)
}

/// Stable sort, so duplicate titles keep file order.
pub fn sort_by_title(records: &mut [VariableRecord]) {
    records.sort_by(|a, b| a.var_title.cmp(&b.var_title));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root() -> (tempfile::TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_root(dir.path());
        let vars = settings.variables_dir().join("cms-data").join("variables");
        std::fs::create_dir_all(&vars).unwrap();
        for entry in std::fs::read_dir("tests/fixtures/variables/cms-data/variables").unwrap() {
            let entry = entry.unwrap();
            std::fs::copy(entry.path(), vars.join(entry.file_name())).unwrap();
        }
        (dir, settings)
    }

    #[test]
    fn run_sorts_and_persists() {
        let (_dir, settings) = fixture_root();
        let records = run(&settings).unwrap();
        assert_eq!(records.len(), 5);
        let titles: Vec<&str> = records.iter().map(|r| r.var_title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);

        let conn = db::connect(&settings.db_path()).unwrap();
        assert_eq!(db::fetch_variables(&conn).unwrap(), records);
    }

    #[test]
    fn duplicate_titles_are_kept() {
        let mut records = vec![
            VariableRecord { var_title: "B".into(), resdac_url: "1".into(), ..Default::default() },
            VariableRecord { var_title: "A".into(), resdac_url: "2".into(), ..Default::default() },
            VariableRecord { var_title: "B".into(), resdac_url: "3".into(), ..Default::default() },
        ];
        sort_by_title(&mut records);
        let urls: Vec<&str> = records.iter().map(|r| r.resdac_url.as_str()).collect();
        assert_eq!(urls, vec!["2", "1", "3"]);
    }

    #[test]
    fn sparse_page_end_to_end() {
        let (_dir, settings) = fixture_root();
        let dir = settings.variables_dir();
        let r = extract_page(&dir, &dir.join("cms-data/variables/claim-id.html")).unwrap();
        assert_eq!(r.long_sas_name, "");
        assert_eq!(r.derivation, "");
        assert_eq!(r.limitation, "");
        assert_eq!(r.resdac_url, "https://www.resdac.org/cms-data/variables/claim-id");
    }
}
