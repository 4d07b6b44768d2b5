use std::sync::LazyLock;

use regex::Regex;

use crate::crosswalk::Crosswalk;
use crate::datasets;
use crate::error::DocsError;
use crate::parser::variable::VariableRecord;

// Quoted literals with a digit, e.g. '01' or 'A1', read as field values.
static QUOTED_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(\w*\d\w*)'").unwrap());

pub const PREAMBLE: &str = "# Variable Definitions\n\n\
    !!! note\n    \
    These definitions are scraped from ResDAC. Click on the header of a \
    variable description to see the ResDAC page.\n\n";

/// The whole glossary page, records in stored order.
pub fn render(
    records: &[VariableRecord],
    crosswalk: &Crosswalk,
    years_per_table: usize,
) -> Result<String, DocsError> {
    let mut out = String::from(PREAMBLE);
    for record in records {
        out.push_str(&render_record(record, crosswalk, years_per_table)?);
    }
    Ok(out)
}

pub fn render_record(
    record: &VariableRecord,
    crosswalk: &Crosswalk,
    years_per_table: usize,
) -> Result<String, DocsError> {
    let mut out = format!("\n\n## [{}]({})\n\n", record.var_title, record.resdac_url);

    out.push_str(&format!("- Short SAS Name: `{}`\n", record.short_sas_name));
    if !record.long_sas_name.is_empty() {
        out.push_str(&format!("- Long SAS Name: `{}`\n", record.long_sas_name));
    }
    out.push('\n');

    out.push_str(&name_history(record, crosswalk, years_per_table));
    out.push_str(&contained_in(record)?);
    out.push_str(&QUOTED_VALUE_RE.replace_all(&record.main_text, "`$1`"));
    out.push_str("\n\n");
    out.push_str(&notes(record));

    if !record.values_text.is_empty() {
        out.push_str("\n\n<h3>Values</h3>\n\n");
        out.push_str(&record.values_text);
    }
    Ok(out)
}

fn name_history(record: &VariableRecord, crosswalk: &Crosswalk, years_per_table: usize) -> String {
    let tables = crosswalk.name_tables(&record.short_sas_name, years_per_table);
    if tables.is_empty() {
        return String::new();
    }
    let mut parts = vec!["<h3>Variable Names</h3>".to_string()];
    parts.extend(tables.iter().map(|t| t.render()));
    format!("{}\n\n", parts.join("\n\n"))
}

fn contained_in(record: &VariableRecord) -> Result<String, DocsError> {
    let mut out = String::from("Contained in\n\n");
    for title in &record.in_files {
        let file = datasets::markdown_file_for(title)?;
        out.push_str(&format!("- [{}]({}#data-documentation)\n", title, file));
    }
    out.push('\n');
    Ok(out)
}

/// Collapsible derivation and limitation blocks.
fn notes(record: &VariableRecord) -> String {
    [("derivation", &record.derivation), ("limitation", &record.limitation)]
        .iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(kind, body)| admonition(kind, body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `??? kind` block; every body line is indented one tab.
pub fn admonition(kind: &str, body: &str) -> String {
    format!("??? {}\n\t{}", kind, body.replace('\n', "\n\t"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VariableRecord {
        VariableRecord {
            var_title: "NCH Claim Type Code".into(),
            short_sas_name: "CLM_TYPE".into(),
            long_sas_name: "NCH_CLM_TYPE_CD".into(),
            in_files: vec!["Carrier RIF".into(), "Inpatient RIF".into()],
            main_text: "Code '10' is HHA. Value 'A' stays quoted.".into(),
            derivation: "Derived from\nthe claim".into(),
            limitation: String::new(),
            values_text: "| Code | Code Value |".into(),
            resdac_url: "https://www.resdac.org/cms-data/variables/nch-claim-type-code".into(),
        }
    }

    fn crosswalk() -> Crosswalk {
        let text = "2011\t2012\nclm_type\tCLM_TYPE\n";
        Crosswalk::from_sources([("Carrier".to_string(), std::io::Cursor::new(text))], "2012").unwrap()
    }

    #[test]
    fn record_layout_in_order() {
        let out = render_record(&record(), &crosswalk(), 5).unwrap();
        let order = [
            "## [NCH Claim Type Code](https://www.resdac.org/cms-data/variables/nch-claim-type-code)",
            "- Short SAS Name: `CLM_TYPE`",
            "- Long SAS Name: `NCH_CLM_TYPE_CD`",
            "<h3>Variable Names</h3>",
            "Contained in",
            "- [Carrier RIF](carrier-rif.md#data-documentation)",
            "- [Inpatient RIF](ip-rif.md#data-documentation)",
            "Code `10` is HHA.",
            "??? derivation\n\tDerived from\n\tthe claim",
            "<h3>Values</h3>",
        ];
        let mut at = 0;
        for piece in order {
            let found = out[at..].find(piece).unwrap_or_else(|| panic!("missing or out of order: {}", piece));
            at += found + piece.len();
        }
        assert!(out.contains("Value 'A' stays quoted."));
        assert!(!out.contains("??? limitation"));
    }

    #[test]
    fn sparse_record_has_no_optional_blocks() {
        let r = VariableRecord {
            var_title: "Claim ID".into(),
            short_sas_name: "CLAIMNO".into(),
            in_files: vec!["Inpatient RIF".into()],
            main_text: "Unique claim number.".into(),
            resdac_url: "https://www.resdac.org/cms-data/variables/claim-id".into(),
            ..VariableRecord::default()
        };
        let out = render_record(&r, &crosswalk(), 5).unwrap();
        assert!(!out.contains("Long SAS Name"));
        assert!(!out.contains("???"));
        assert!(!out.contains("<h3>"));
    }

    #[test]
    fn unknown_dataset_is_fatal() {
        let mut r = record();
        r.in_files.push("Part D Event".into());
        let err = render_record(&r, &crosswalk(), 5).unwrap_err();
        assert!(matches!(err, DocsError::UnknownDataset { .. }));
    }

    #[test]
    fn admonition_indents_every_line() {
        assert_eq!(admonition("limitation", "a\n\nb"), "??? limitation\n\ta\n\t\n\tb");
    }

    #[test]
    fn page_starts_with_preamble() {
        let out = render(&[record()], &crosswalk(), 5).unwrap();
        assert!(out.starts_with("# Variable Definitions\n\n!!! note\n    These definitions"));
        assert_eq!(out.matches("\n## [").count(), 1);
    }
}
