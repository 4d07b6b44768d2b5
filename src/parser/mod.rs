pub mod anchors;
pub mod html;
pub mod index;
pub mod values;
pub mod variable;

use std::path::Path;

use anyhow::{Context, Result};
use scraper::Html;

/// Read and parse a downloaded HTML page.
pub fn load_document(path: &Path) -> Result<Html> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Html::parse_document(&src))
}
