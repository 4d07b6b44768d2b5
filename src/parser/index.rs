use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::warn;

use super::html::{self, clean_text, HtmlTable};
use crate::datasets::DatasetPage;

static VARIABLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr > td > a[href]").unwrap());
static SECTION_HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());

/// Columns kept from each index table. ResDAC renders an empty sixth column.
pub const INDEX_COLUMNS: usize = 5;

/// A dataset's data-documentation page, split into titled tables.
#[derive(Debug, Clone)]
pub struct IndexPage {
    /// `href` of every variable link inside a table cell, in document order.
    pub variable_links: Vec<String>,
    pub sections: Vec<IndexSection>,
}

#[derive(Debug, Clone)]
pub struct IndexSection {
    pub title: String,
    pub table: HtmlTable,
}

pub fn variable_links(doc: &Html) -> Vec<String> {
    doc.select(&VARIABLE_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Section headings paired positionally with the page's tables.
///
/// Most pages put an untitled table first and close with an `<h3>` that
/// heads no table, so the dataset title takes the first slot and the last
/// heading is dropped. The beneficiary summary page titles every table.
pub fn table_titles(doc: &Html, page: &DatasetPage) -> Vec<String> {
    let mut headings: Vec<String> = doc.select(&SECTION_HEADING).map(clean_text).collect();
    if page.untitled_lead_table {
        headings.pop();
        headings.insert(0, page.title.to_string());
    }
    headings
}

pub fn parse(doc: &Html, page: &DatasetPage) -> IndexPage {
    let titles = table_titles(doc, page);
    let tables = html::tables(doc);
    if titles.len() != tables.len() {
        warn!(
            "{}: {} section headings for {} tables",
            page.stub,
            titles.len(),
            tables.len()
        );
    }

    let sections = tables
        .into_iter()
        .enumerate()
        .map(|(i, mut table)| {
            table.truncate_columns(INDEX_COLUMNS);
            let title = titles
                .get(i)
                .cloned()
                .unwrap_or_else(|| page.title.to_string());
            IndexSection { title, table }
        })
        .collect();

    IndexPage {
        variable_links: variable_links(doc),
        sections,
    }
}
