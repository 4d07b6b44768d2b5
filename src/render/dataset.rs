use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::table::{code, PipeTable};
use crate::error::DocsError;
use crate::parser::anchors::AnchorQueue;
use crate::parser::index::IndexSection;

static DOC_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#+\s*data\s+documentation").unwrap());

pub const DATASET_HEADERS: [&str; 5] =
    ["Index", "SAS Name", "Variable Name", "Limitation", "Code Table"];

pub const GLOSSARY_FILE: &str = "variables.md";

/// One section's table. `anchors` holds one glossary anchor per row.
pub fn render_table(section: &IndexSection, anchors: &[String]) -> PipeTable {
    let mut table = PipeTable::new(DATASET_HEADERS);
    for (row, anchor) in section.table.rows.iter().zip(anchors) {
        let cell = |i: usize| row.get(i).cloned().flatten().unwrap_or_default();
        table.push_row(vec![
            cell(0),
            code(&cell(1)),
            format!("[{}]({}#{})", cell(2), GLOSSARY_FILE, anchor),
            cell(3),
            cell(4),
        ]);
    }
    table.align_integers_right()
}

/// Every section as `### title` plus its table, drawing anchors from the
/// page's queue in row order.
pub fn render_sections(
    sections: &[IndexSection],
    anchors: &mut AnchorQueue,
) -> Result<String, DocsError> {
    let mut out = String::new();
    for section in sections {
        let row_anchors = anchors.take(section.table.rows.len())?;
        let table = render_table(section, &row_anchors);
        debug!("{}: {} rows x {} columns", section.title, table.len(), table.headers().len());
        out.push_str(&format!("\n### {}\n\n{}\n", section.title, table.render()));
    }
    Ok(out)
}

/// Keep `markdown` through its "Data Documentation" heading and replace
/// the rest with `tables`.
pub fn splice(markdown: &str, tables: &str, path: &Path) -> Result<String, DocsError> {
    let mut kept = String::with_capacity(markdown.len() + tables.len());
    for line in markdown.split_inclusive('\n') {
        kept.push_str(line);
        if DOC_HEADING_RE.is_match(line) {
            kept.push_str(tables);
            return Ok(kept);
        }
    }
    Err(DocsError::HeadingNotFound {
        path: path.to_path_buf(),
    })
}
