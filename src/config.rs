use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "RESDAC";

/// Run settings. Defaults match the repository layout the pipeline is run
/// from (`<repo>/code`, with `data/` and `docs/` one level up).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub root: PathBuf,
    /// Crosswalk column whose names are matched against short SAS names.
    pub reference_year: String,
    pub years_per_table: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: PathBuf::from(".."),
            reference_year: "2012".to_string(),
            years_per_table: 5,
        }
    }
}

impl Settings {
    /// Defaults, then `RESDAC_*` environment variables, then the CLI root.
    pub fn load(root_override: Option<PathBuf>) -> Result<Self> {
        let mut settings: Settings = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read RESDAC_* settings")?
            .try_deserialize()
            .context("Invalid RESDAC_* settings")?;

        if let Some(root) = root_override {
            settings.root = root;
        }
        if settings.years_per_table == 0 {
            settings.years_per_table = Settings::default().years_per_table;
        }
        Ok(settings)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Settings {
            root: root.into(),
            ..Settings::default()
        }
    }

    fn resdac_html(&self) -> PathBuf {
        self.root.join("data").join("resdac").join("html")
    }

    pub fn dataset_html(&self, stub: &str) -> PathBuf {
        self.resdac_html().join("rif").join(format!("{}.html", stub))
    }

    pub fn variables_dir(&self) -> PathBuf {
        self.resdac_html().join("variables")
    }

    /// Local copy of a variable page linked as `/cms-data/variables/<name>`.
    pub fn variable_html(&self, href: &str) -> PathBuf {
        let rel = href.trim_start_matches('/');
        self.variables_dir().join(format!("{}.html", rel))
    }

    pub fn crosswalk_file(&self, code: &str) -> PathBuf {
        self.root
            .join("data")
            .join("nber")
            .join("claim_xw")
            .join(format!("{}xw.txt", code))
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("data").join("variable_info.sqlite")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs").join("resdac")
    }

    pub fn dataset_markdown(&self, stub: &str) -> PathBuf {
        self.docs_dir().join(format!("{}.md", stub))
    }

    pub fn glossary_markdown(&self) -> PathBuf {
        self.docs_dir().join("variables.md")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.root, PathBuf::from(".."));
        assert_eq!(s.reference_year, "2012");
        assert_eq!(s.years_per_table, 5);
    }

    #[test]
    fn derived_paths() {
        let s = Settings::with_root("/repo");
        assert_eq!(
            s.dataset_html("ip-rif"),
            PathBuf::from("/repo/data/resdac/html/rif/ip-rif.html")
        );
        assert_eq!(
            s.variable_html("/cms-data/variables/nch-claim-type-code"),
            PathBuf::from("/repo/data/resdac/html/variables/cms-data/variables/nch-claim-type-code.html")
        );
        assert_eq!(s.crosswalk_file("medpar"), PathBuf::from("/repo/data/nber/claim_xw/medparxw.txt"));
        assert_eq!(s.dataset_markdown("mbsf"), PathBuf::from("/repo/docs/resdac/mbsf.md"));
        assert_eq!(s.glossary_markdown(), PathBuf::from("/repo/docs/resdac/variables.md"));
    }
}
