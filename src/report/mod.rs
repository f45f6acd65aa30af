pub mod extract;
mod profit_and_loss;
pub mod raw;

pub use profit_and_loss::{Line, ProfitAndLossReport, Section};

use crate::error::ExtractError;
use anyhow::{Context, Error, Result, anyhow};
use std::{
    convert::{TryFrom, TryInto},
    str::FromStr,
};

/// Tag carried by every row of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    Header,
    Section,
    Row,
    SummaryRow,
}

impl FromStr for RowType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Header" => Ok(RowType::Header),
            "Section" => Ok(RowType::Section),
            "Row" => Ok(RowType::Row),
            "SummaryRow" => Ok(RowType::SummaryRow),
            _ => Err(anyhow!("{} not a valid row type", s)),
        }
    }
}

/// A single cell value, a label or a number as text. Meaning comes from position only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportCell(pub String);

impl ReportCell {
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A node of the report tree.
/// Leaf rows carry cells, section rows carry child rows, a labelled section header may carry both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportRow {
    pub row_type: Option<RowType>,
    pub title: Option<String>,
    pub cells: Vec<ReportCell>,
    pub rows: Vec<ReportRow>,
}

impl ReportRow {
    pub fn is(&self, row_type: RowType) -> bool {
        self.row_type == Some(row_type)
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(ReportCell::value)
    }
}

/// The first report of an API response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub titles: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Child rows of the top-level section titled `title`
    pub fn section(&self, title: &str) -> Result<&[ReportRow], ExtractError> {
        if self.rows.is_empty() {
            return Err(ExtractError::MissingReport);
        }
        self.rows
            .iter()
            .find(|row| row.title.as_deref() == Some(title))
            .map(|row| row.rows.as_slice())
            .filter(|rows| !rows.is_empty())
            .ok_or_else(|| ExtractError::MissingSection(title.to_string()))
    }

    pub fn title(&self, index: usize) -> Result<&str, ExtractError> {
        self.titles
            .get(index)
            .map(String::as_str)
            .ok_or(ExtractError::MissingTitle(index))
    }
}

impl From<raw::Cell> for ReportCell {
    fn from(raw_cell: raw::Cell) -> Self {
        ReportCell(raw_cell.value.unwrap_or_default())
    }
}

impl TryFrom<raw::Row> for ReportRow {
    type Error = Error;

    fn try_from(raw_row: raw::Row) -> Result<Self> {
        let row_type = raw_row
            .row_type
            .as_deref()
            .map(str::parse::<RowType>)
            .transpose()?;
        let cells = raw_row
            .cells
            .map_or_else(Vec::new, |cells| cells.into_iter().map(ReportCell::from).collect());
        let rows = raw_row.rows.map_or_else(
            || Ok(Vec::new()),
            |rows| {
                rows.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<ReportRow>>>()
            },
        )?;
        Ok(ReportRow {
            row_type,
            title: raw_row.title,
            cells,
            rows,
        })
    }
}

impl TryFrom<raw::ReportEnvelope> for Report {
    type Error = Error;

    fn try_from(envelope: raw::ReportEnvelope) -> Result<Self> {
        let raw_report = envelope
            .reports
            .and_then(|reports| reports.into_iter().next())
            .ok_or(ExtractError::MissingReport)?;
        let rows = raw_report
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ReportRow>>>()
            .context("Failed to convert report rows")?;
        Ok(Report {
            titles: raw_report.report_titles.unwrap_or_default(),
            rows,
        })
    }
}

impl FromStr for Report {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        let envelope: raw::ReportEnvelope = serde_json::from_str(doc)
            .with_context(|| format!("Failed to deserialize report:\n{}", doc))?;
        envelope.try_into()
    }
}
