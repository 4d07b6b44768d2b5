use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::warn;

use super::html::{self, clean_text, text_of};
use crate::render::table::PipeTable;

static VALUES_BOX: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field-collection-view-final").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field-name-field-note").unwrap());

pub const VALUE_HEADERS: [&str; 2] = ["Code", "Code Value"];

/// Rendered value codes of a variable page, if it has a values box.
///
/// A box without rows is prose and is kept verbatim, surrounding
/// whitespace included. Otherwise each table becomes a Code / Code Value
/// table, preceded by the caption at the same position when there is one.
pub fn extract(doc: &Html) -> Option<String> {
    let values_box = html::first(doc, &VALUES_BOX)?;

    if values_box.select(&ROW).next().is_none() {
        return Some(text_of(values_box));
    }

    let captions: Vec<String> = doc.select(&CAPTION).map(clean_text).collect();
    let tables = html::tables_in(values_box);
    if !captions.is_empty() && captions.len() != tables.len() {
        // Pairing is positional; a gap shifts every later caption.
        warn!(
            "{} value captions for {} value tables, pairing by position",
            captions.len(),
            tables.len()
        );
    }

    let mut parts = Vec::with_capacity(tables.len() * 2);
    for (i, table) in tables.iter().enumerate() {
        if let Some(caption) = captions.get(i) {
            parts.push(caption.clone());
        }
        let mut rendered = PipeTable::new(VALUE_HEADERS);
        for row in &table.rows {
            rendered.push_row(
                row.iter()
                    .take(VALUE_HEADERS.len())
                    .map(|c| c.clone().unwrap_or_default())
                    .collect(),
            );
        }
        parts.push(rendered.render());
    }
    Some(parts.join("\n\n"))
}
