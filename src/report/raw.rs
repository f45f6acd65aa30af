use serde::{Deserialize, Serialize};

/// Raw report envelope deserialized from the accounting API
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ReportEnvelope {
    pub reports: Option<Vec<Report>>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(rename = "ReportID")]
    pub report_id: Option<String>,
    pub report_name: Option<String>,
    pub report_titles: Option<Vec<String>>,
    pub rows: Option<Vec<Row>>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    pub row_type: Option<String>,
    pub title: Option<String>,
    pub cells: Option<Vec<Cell>>,
    pub rows: Option<Vec<Row>>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Cell {
    pub value: Option<String>,
}
