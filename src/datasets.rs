use crate::error::DocsError;

/// One RIF file type with a documentation page on ResDAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetPage {
    /// Display title, also the link text ResDAC uses in "used in" lists.
    pub title: &'static str,
    /// URL slug: `cms-data/files/<stub>/data-documentation`. Names both the
    /// downloaded index page and the local markdown file.
    pub stub: &'static str,
    /// Whether the first table on the index page sits above the first
    /// `<h3>` and takes the dataset title as its heading.
    pub untitled_lead_table: bool,
}

impl DatasetPage {
    pub fn markdown_file(&self) -> String {
        format!("{}.md", self.stub)
    }

    pub fn source_url(&self) -> String {
        format!("https://www.resdac.org/cms-data/files/{}/data-documentation", self.stub)
    }
}

const fn rif(title: &'static str, stub: &'static str) -> DatasetPage {
    DatasetPage {
        title,
        stub,
        untitled_lead_table: true,
    }
}

pub const DATASET_PAGES: &[DatasetPage] = &[
    DatasetPage {
        title: "Master Beneficiary Summary File",
        stub: "mbsf",
        untitled_lead_table: false,
    },
    rif("Carrier RIF", "carrier-rif"),
    rif("Durable Medical Equipment RIF", "dme-rif"),
    rif("Home Health Agency RIF", "hha-rif"),
    rif("Hospice RIF", "hospice-rif"),
    rif("Inpatient RIF", "ip-rif"),
    rif("MedPAR RIF", "medpar-rif"),
    rif("Outpatient RIF", "op-rif"),
    rif("Skilled Nursing Facility RIF", "snf-rif"),
];

/// NBER claim crosswalks: (label shown in the Dataset column, file code).
pub const CROSSWALK_SOURCES: &[(&str, &str)] = &[
    ("Carrier", "carrier"),
    ("Inpatient", "ip"),
    ("MedPAR", "medpar"),
    ("Outpatient", "op"),
];

pub fn by_title(title: &str) -> Option<&'static DatasetPage> {
    DATASET_PAGES.iter().find(|p| p.title == title)
}

pub fn is_known_title(title: &str) -> bool {
    by_title(title).is_some()
}

/// Markdown file for a dataset title. An unknown title aborts the run.
pub fn markdown_file_for(title: &str) -> Result<String, DocsError> {
    by_title(title)
        .map(DatasetPage::markdown_file)
        .ok_or_else(|| DocsError::UnknownDataset {
            title: title.to_string(),
        })
}
