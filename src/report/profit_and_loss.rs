use super::{Report, ReportRow, RowType};
use crate::error::ExtractError;
use crate::money::Money;
use std::{convert::TryFrom, fmt};

/// A titled line of a section and its amount
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub title: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<Line>,
    /// Amount of the section's summary row, if it has one
    pub summary: Option<Money>,
}

/// The titled top-level sections of a single period profit and loss report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfitAndLossReport(pub Vec<Section>);

fn line(row: &ReportRow) -> Result<Line, ExtractError> {
    let title = row.cell(0).unwrap_or_default().to_string();
    let value = row.cell(1).unwrap_or_default();
    let amount: Money = value.parse().map_err(|_| ExtractError::InvalidAmount {
        label: title.clone(),
        value: value.to_string(),
    })?;
    Ok(Line { title, amount })
}

impl TryFrom<&Report> for ProfitAndLossReport {
    type Error = ExtractError;

    fn try_from(report: &Report) -> Result<Self, ExtractError> {
        if report.rows.is_empty() {
            return Err(ExtractError::MissingReport);
        }
        let sections = report
            .rows
            .iter()
            .filter(|row| row.is(RowType::Section))
            .filter_map(|row| Some((row.title.as_deref().filter(|t| !t.is_empty())?, row)))
            .map(|(title, row)| -> Result<Section, ExtractError> {
                let lines = row
                    .rows
                    .iter()
                    .filter(|r| r.is(RowType::Row))
                    .map(line)
                    .collect::<Result<Vec<_>, _>>()?;
                let summary = row
                    .rows
                    .iter()
                    .find(|r| r.is(RowType::SummaryRow))
                    .map(|r| line(r).map(|l| l.amount))
                    .transpose()?;
                Ok(Section {
                    title: title.to_string(),
                    lines,
                    summary,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;
        Ok(ProfitAndLossReport(sections))
    }
}

impl fmt::Display for ProfitAndLossReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.0 {
            writeln!(f, "{}", section.title)?;
            for line in &section.lines {
                writeln!(f, "  {:<30}{:>16}", line.title, line.amount.to_string())?;
            }
            if let Some(summary) = section.summary {
                writeln!(f, "{:<32}{:>16}", "Total", summary.to_string())?;
            }
        }
        Ok(())
    }
}
