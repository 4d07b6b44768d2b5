use anyhow::{Context, Result};
use tracing::info;

use crate::config::Settings;
use crate::crosswalk::Crosswalk;
use crate::db;
use crate::render;

/// Write `variables.md` from the stored variable table and the crosswalks.
pub fn run(settings: &Settings) -> Result<usize> {
    let db_path = settings.db_path();
    let conn = db::open_existing(&db_path)?;
    let records = db::fetch_variables(&conn)?;
    info!("Loaded {} variables from {}", records.len(), db_path.display());

    let crosswalk = Crosswalk::load(settings)?;
    let page = render::glossary::render(&records, &crosswalk, settings.years_per_table)?;

    let out = settings.glossary_markdown();
    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&out, page).with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote {} glossary sections to {}", records.len(), out.display());
    Ok(records.len())
}
