use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static THEAD_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("thead tr").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A `<table>` read positionally: header cells plus body rows. Empty cells
/// are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl HtmlTable {
    /// Keep the first `n` columns of every row, padding short rows.
    pub fn truncate_columns(&mut self, n: usize) {
        self.header.truncate(n);
        for row in &mut self.rows {
            row.resize(n, None);
        }
    }
}

/// Raw text of an element, as the page author wrote it.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Element text with whitespace runs collapsed and the ends trimmed.
pub fn clean_text(el: ElementRef<'_>) -> String {
    WS_RE.replace_all(text_of(el).trim(), " ").into_owned()
}

/// First element matching `selector` anywhere in the document.
pub fn first<'a>(doc: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    doc.select(selector).next()
}

/// Every table under `scope`, in document order.
///
/// A header comes from `<thead>`, or from a leading row made only of `<th>`
/// cells. html5ever wraps bare rows in `<tbody>`, so everything else is body.
pub fn tables_in(scope: ElementRef<'_>) -> Vec<HtmlTable> {
    scope.select(&TABLE).map(read_table).collect()
}

pub fn tables(doc: &Html) -> Vec<HtmlTable> {
    tables_in(doc.root_element())
}

fn read_table(table: ElementRef<'_>) -> HtmlTable {
    let head_rows: Vec<ElementRef> = table.select(&THEAD_ROW).collect();
    let mut rows: Vec<ElementRef> = table
        .select(&ROW)
        .filter(|tr| !head_rows.contains(tr))
        .collect();

    let header_row = match head_rows.first() {
        Some(tr) => Some(*tr),
        None if rows.first().is_some_and(is_heading_row) => Some(rows.remove(0)),
        None => None,
    };

    let header = header_row
        .map(|tr| tr.select(&CELL).map(clean_text).collect())
        .unwrap_or_default();

    let rows = rows
        .into_iter()
        .map(|tr| {
            tr.select(&CELL)
                .map(|cell| Some(clean_text(cell)).filter(|t| !t.is_empty()))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    HtmlTable { header, rows }
}

fn is_heading_row(tr: &ElementRef<'_>) -> bool {
    let mut cells = tr.select(&CELL).peekable();
    cells.peek().is_some() && cells.all(|c| c.value().name() == "th")
}
