use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const RESDAC_BASE: &str = "https://www.resdac.org/";

/// Every `.html` file under `dir`, recursively, sorted by path.
pub fn variable_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    collect_html(dir, &mut pages)?;
    pages.sort();
    Ok(pages)
}

fn collect_html(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_html(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "html") {
            out.push(path);
        }
    }
    Ok(())
}

/// ResDAC address of a downloaded page: the path below `variables_dir`,
/// without `.html`, appended to the site root.
pub fn resdac_url(variables_dir: &Path, page: &Path) -> Option<String> {
    let rel = page.strip_prefix(variables_dir).ok()?.with_extension("");
    let parts: Vec<&str> = rel.components().filter_map(|c| c.as_os_str().to_str()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!("{}{}", RESDAC_BASE, parts.join("/")))
    }
}
