use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::datasets::{DatasetPage, DATASET_PAGES};
use crate::error::DocsError;
use crate::parser::anchors::{anchor_slug, heading_anchor, AnchorQueue};
use crate::parser::{self, index, variable};
use crate::render::dataset;

/// Rewrite the variable tables of every dataset page.
pub fn run(settings: &Settings) -> Result<usize> {
    info!("Injecting variable tables into {} dataset pages", DATASET_PAGES.len());
    let mut rows = 0;
    for page in DATASET_PAGES {
        rows += inject_page(settings, page)?;
    }
    info!("Wrote {} table rows", rows);
    Ok(rows)
}

/// Returns the number of table rows written.
pub fn inject_page(settings: &Settings, page: &DatasetPage) -> Result<usize> {
    debug!("{}: {}", page.stub, page.source_url());
    let doc = parser::load_document(&settings.dataset_html(page.stub))?;
    let index = index::parse(&doc, page);

    let anchors = resolve_anchors(settings, &index.variable_links)?;
    let mut queue = AnchorQueue::new(page.stub, anchors);
    let tables = dataset::render_sections(&index.sections, &mut queue)?;
    if queue.remaining() > 0 {
        warn!("{}: {} variable links left without a table row", page.stub, queue.remaining());
    }

    let md_path = settings.dataset_markdown(page.stub);
    let markdown = std::fs::read_to_string(&md_path)
        .with_context(|| format!("Failed to read {}", md_path.display()))?;
    let updated = dataset::splice(&markdown, &tables, &md_path)?;
    std::fs::write(&md_path, updated)
        .with_context(|| format!("Failed to write {}", md_path.display()))?;

    let rows: usize = index.sections.iter().map(|s| s.table.rows.len()).sum();
    info!(
        "{}: {} tables, {} rows -> {}",
        page.title,
        index.sections.len(),
        rows,
        md_path.display()
    );
    Ok(rows)
}

/// Glossary anchor for each linked variable page, in link order.
fn resolve_anchors(settings: &Settings, links: &[String]) -> Result<Vec<String>> {
    links
        .iter()
        .map(|href| {
            let path = settings.variable_html(href);
            let doc = parser::load_document(&path)?;
            let title = variable::page_title(&doc).ok_or(DocsError::MissingField {
                path,
                field: "page-title",
            })?;
            let anchor = anchor_slug(&title);
            let heading = heading_anchor(&title);
            if anchor != heading {
                warn!("{}: anchor #{} will not match glossary heading #{}", href, anchor, heading);
            }
            Ok(anchor)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::by_title;

    /// Lay out the fixture corpus under a temp root the way the repo does.
    fn corpus(markdown: &str) -> (tempfile::TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_root(dir.path());

        let rif = settings.dataset_html("ip-rif");
        std::fs::create_dir_all(rif.parent().unwrap()).unwrap();
        std::fs::copy("tests/fixtures/ip-rif.html", &rif).unwrap();

        let vars = settings.variables_dir().join("cms-data").join("variables");
        std::fs::create_dir_all(&vars).unwrap();
        for entry in std::fs::read_dir("tests/fixtures/variables/cms-data/variables").unwrap() {
            let entry = entry.unwrap();
            std::fs::copy(entry.path(), vars.join(entry.file_name())).unwrap();
        }

        let md = settings.dataset_markdown("ip-rif");
        std::fs::create_dir_all(md.parent().unwrap()).unwrap();
        std::fs::write(&md, markdown).unwrap();
        (dir, settings)
    }

    #[test]
    fn end_to_end_replaces_stale_tables() {
        let skeleton = std::fs::read_to_string("tests/fixtures/ip-rif.md").unwrap();
        let (_dir, settings) = corpus(&skeleton);
        let page = by_title("Inpatient RIF").unwrap();

        let rows = inject_page(&settings, page).unwrap();
        assert_eq!(rows, 5);

        let out = std::fs::read_to_string(settings.dataset_markdown("ip-rif")).unwrap();
        assert!(!out.contains("stale"));
        assert!(out.starts_with("# Inpatient RIF\n"));

        let (before, after) = out.split_once("## Data Documentation\n").unwrap();
        assert!(before.contains("Intro"));

        let sections: Vec<&str> = after.split("\n### ").skip(1).collect();
        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("Inpatient RIF\n"));
        assert!(sections[1].starts_with("Revenue Center\n"));

        // header + alignment row + data rows
        let table_rows = |s: &str| s.lines().filter(|l| l.starts_with('|')).count() - 2;
        assert_eq!(table_rows(sections[0]), 3);
        assert_eq!(table_rows(sections[1]), 2);

        assert!(sections[0].contains("[Claim ID](variables.md#claim-id)"));
        assert!(sections[0].contains("[NCH Claim Type Code](variables.md#nch-claim-type-code)"));
        assert!(sections[1].contains("(variables.md#revenue-center-code)"));
        assert!(sections[0].contains("`CLAIMNO`"));
    }

    #[test]
    fn missing_heading_aborts_without_writing() {
        let (_dir, settings) = corpus("# Inpatient RIF\n\nNo heading here\n");
        let page = by_title("Inpatient RIF").unwrap();
        let err = inject_page(&settings, page).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DocsError>(),
            Some(DocsError::HeadingNotFound { .. })
        ));
        let md = std::fs::read_to_string(settings.dataset_markdown("ip-rif")).unwrap();
        assert_eq!(md, "# Inpatient RIF\n\nNo heading here\n");
    }

    #[test]
    fn anchors_come_from_linked_page_titles() {
        let (_dir, settings) = corpus("## Data Documentation\n");
        let anchors = resolve_anchors(
            &settings,
            &["/cms-data/variables/claim-from-date".to_string()],
        )
        .unwrap();
        assert_eq!(anchors, vec!["claim-from-date-start"]);
    }
}
