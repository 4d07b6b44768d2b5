use std::path::Path;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::html::{self, clean_text, text_of};
use super::values;
use crate::datasets;
use crate::error::DocsError;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#page-title").unwrap());
static SHORT_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".field-name-field-short-sas-name .field-item").unwrap()
});
static LONG_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".field-name-field-long-sas-name .field-item").unwrap()
});
static USED_IN: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".view-content").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static MAIN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#block-system-main, #region-content").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static DERIVATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field-name-field-derivation .even").unwrap());
static LIMITATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field-name-field-limitation .even").unwrap());

/// One glossary entry. Absent optional fields are stored as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRecord {
    pub var_title: String,
    pub short_sas_name: String,
    pub long_sas_name: String,
    /// Dataset titles listing this variable, restricted to known datasets.
    pub in_files: Vec<String>,
    pub main_text: String,
    pub derivation: String,
    pub limitation: String,
    /// Rendered value codes (tables or prose), without the section heading.
    pub values_text: String,
    pub resdac_url: String,
}

/// Parse one downloaded variable page.
///
/// `path` is only used for error messages; `resdac_url` is the page's
/// canonical address.
pub fn extract(html_src: &str, path: &Path, resdac_url: &str) -> Result<VariableRecord, DocsError> {
    let doc = Html::parse_document(html_src);
    let missing = |field: &'static str| DocsError::MissingField {
        path: path.to_path_buf(),
        field,
    };

    let var_title = page_title(&doc).ok_or_else(|| missing("page-title"))?;
    let short_sas_name = html::first(&doc, &SHORT_NAME)
        .map(clean_text)
        .ok_or_else(|| missing("short-sas-name"))?;
    let long_sas_name = html::first(&doc, &LONG_NAME)
        .map(clean_text)
        .unwrap_or_default();

    Ok(VariableRecord {
        var_title,
        short_sas_name,
        long_sas_name,
        in_files: used_in(&doc),
        main_text: description(&doc),
        derivation: note(&doc, &DERIVATION).unwrap_or_default(),
        limitation: note(&doc, &LIMITATION).unwrap_or_default(),
        values_text: values::extract(&doc).unwrap_or_default(),
        resdac_url: resdac_url.to_string(),
    })
}

/// Page heading, the text glossary anchors are derived from.
pub fn page_title(doc: &Html) -> Option<String> {
    html::first(doc, &TITLE).map(clean_text)
}

/// Known dataset titles from the page's "used in" list.
fn used_in(doc: &Html) -> Vec<String> {
    html::first(doc, &USED_IN)
        .map(|list| {
            list.select(&LINK)
                .map(clean_text)
                .filter(|t| datasets::is_known_title(t))
                .collect()
        })
        .unwrap_or_default()
}

/// Paragraphs of the main content region, minus the trailing footer one.
fn description(doc: &Html) -> String {
    let Some(main) = html::first(doc, &MAIN) else {
        return String::new();
    };
    let mut paragraphs: Vec<String> = main.select(&PARAGRAPH).map(text_of).collect();
    paragraphs.pop();
    paragraphs.join("\n\n")
}

/// Derivation or limitation blocks; `None` when the page has no such field.
fn note(doc: &Html, selector: &Selector) -> Option<String> {
    let parts: Vec<String> = doc.select(selector).map(text_of).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}
