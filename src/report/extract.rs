use super::{Report, ReportRow, RowType};
use crate::error::ExtractError;
use crate::money::Money;
use crate::period::MonthWindow;

pub const INCOME: &str = "Income";
pub const TOTAL_INCOME: &str = "Total Income";

/// Position of the company name in the report titles
pub const COMPANY_NAME_TITLE: usize = 1;

/// Label column plus a single total
const SINGLE_WIDTH: usize = 2;
/// Label column plus one column per month
const MONTHLY_WIDTH: usize = 1 + MonthWindow::MONTHS;

/// Which summary row to read: the section title and the summary row's label
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pub section: &'a str,
    pub label: &'a str,
}

impl Summary<'static> {
    pub const TOTAL_INCOME: Self = Summary {
        section: INCOME,
        label: TOTAL_INCOME,
    };
}

impl Summary<'_> {
    fn row<'r>(&self, report: &'r Report, width: usize) -> Result<&'r ReportRow, ExtractError> {
        let malformed = |reason: String| ExtractError::MissingSummaryRow {
            label: self.label.to_string(),
            reason,
        };
        let row = report
            .section(self.section)?
            .iter()
            .find(|row| row.is(RowType::SummaryRow))
            .ok_or_else(|| malformed(format!("no summary row in '{}'", self.section)))?;
        match row.cell(0) {
            Some(label) if label == self.label => {}
            other => return Err(malformed(format!("first cell is {other:?}"))),
        }
        if row.cells.len() != width {
            return Err(malformed(format!(
                "expected {width} cells, found {}",
                row.cells.len()
            )));
        }
        Ok(row)
    }

    fn amount(&self, row: &ReportRow, index: usize) -> Result<Money, ExtractError> {
        let value = row.cell(index).unwrap_or_default();
        value.parse().map_err(|_| ExtractError::InvalidAmount {
            label: self.label.to_string(),
            value: value.to_string(),
        })
    }

    /// The summary amount of a single period report
    pub fn total(&self, report: &Report) -> Result<Money, ExtractError> {
        let row = self.row(report, SINGLE_WIDTH)?;
        self.amount(row, 1)
    }

    /// The summary amounts of a twelve month breakdown, in header order.
    ///
    /// The header must list the month ends of `window` exactly, otherwise the
    /// columns cannot be trusted to mean what the window says they mean.
    pub fn monthly(&self, report: &Report, window: &MonthWindow) -> Result<Vec<Money>, ExtractError> {
        check_header(report, window)?;
        let row = self.row(report, MONTHLY_WIDTH)?;
        (1..MONTHLY_WIDTH)
            .map(|index| self.amount(row, index))
            .collect()
    }
}

fn check_header(report: &Report, window: &MonthWindow) -> Result<(), ExtractError> {
    let header = report.rows.first().ok_or(ExtractError::MissingReport)?;
    if !header.is(RowType::Header) {
        return Err(ExtractError::HeaderMismatch(format!(
            "first row is {:?}, not a header",
            header.row_type
        )));
    }
    if header.cells.len() != MONTHLY_WIDTH {
        return Err(ExtractError::HeaderMismatch(format!(
            "expected {MONTHLY_WIDTH} cells, found {}",
            header.cells.len()
        )));
    }
    let expected = window
        .header_labels()
        .map_err(|e| ExtractError::HeaderMismatch(e.to_string()))?;
    for (index, label) in expected.iter().enumerate() {
        let found = header.cell(index + 1).unwrap_or_default();
        if found != label {
            return Err(ExtractError::HeaderMismatch(format!(
                "column {} is '{found}', expected '{label}'",
                index + 1
            )));
        }
    }
    Ok(())
}

pub fn company_name(report: &Report) -> Result<String, ExtractError> {
    report.title(COMPANY_NAME_TITLE).map(str::to_string)
}

#[cfg(test)]
mod extract_tests {
    use super::*;
    use crate::report::ReportCell;
    use anyhow::Result;

    fn row(row_type: RowType, cells: &[&str]) -> ReportRow {
        ReportRow {
            row_type: Some(row_type),
            cells: cells.iter().map(|c| ReportCell(c.to_string())).collect(),
            ..Default::default()
        }
    }

    fn section(title: &str, rows: Vec<ReportRow>) -> ReportRow {
        ReportRow {
            row_type: Some(RowType::Section),
            title: Some(title.to_string()),
            rows,
            ..Default::default()
        }
    }

    fn single(summary: ReportRow) -> Report {
        Report {
            titles: vec!["Profit & Loss".to_string(), "Acme Ltd".to_string()],
            rows: vec![
                row(RowType::Header, &["", "17 Oct 26"]),
                section(
                    "Income",
                    vec![row(RowType::Row, &["Sales", "1534230.50"]), summary],
                ),
            ],
        }
    }

    fn window() -> MonthWindow {
        MonthWindow::preceding("2026-10-18".parse().unwrap()).unwrap()
    }

    fn monthly(header: Vec<String>) -> Report {
        let mut header_cells = vec![String::new()];
        header_cells.extend(header);
        let header_cells: Vec<&str> = header_cells.iter().map(String::as_str).collect();
        let amounts: Vec<String> = (1..=12).map(|m| format!("{m}000.00")).collect();
        let mut summary_cells = vec!["Total Income"];
        summary_cells.extend(amounts.iter().map(String::as_str));
        Report {
            titles: Vec::new(),
            rows: vec![
                row(RowType::Header, &header_cells),
                section("Income", vec![row(RowType::SummaryRow, &summary_cells)]),
            ],
        }
    }

    #[test]
    fn total_income() -> Result<()> {
        let report = single(row(RowType::SummaryRow, &["Total Income", "1534230.50"]));
        let total = Summary::TOTAL_INCOME.total(&report)?;
        assert_eq!(total, "1534230.50".parse::<Money>()?);
        assert_eq!(company_name(&report)?, "Acme Ltd");
        Ok(())
    }

    #[test]
    fn missing_section() {
        let report = Report {
            titles: Vec::new(),
            rows: vec![section("Less Operating Expenses", vec![row(RowType::Row, &["Rent", "1"])])],
        };
        assert_eq!(
            Summary::TOTAL_INCOME.total(&report),
            Err(ExtractError::MissingSection("Income".to_string()))
        );
        assert_eq!(
            Summary::TOTAL_INCOME.total(&Report::default()),
            Err(ExtractError::MissingReport)
        );
    }

    #[test]
    fn malformed_summary_rows() {
        let cases = [
            row(RowType::SummaryRow, &["Total Income", "1.00", "2.00"]),
            row(RowType::SummaryRow, &["Total Income"]),
            row(RowType::SummaryRow, &["Total Sales", "1.00"]),
            row(RowType::SummaryRow, &[]),
            row(RowType::Row, &["Total Income", "1.00"]),
        ];
        for summary in cases {
            let res = Summary::TOTAL_INCOME.total(&single(summary));
            assert!(
                matches!(dbg!(&res), Err(ExtractError::MissingSummaryRow { label, .. }) if label == "Total Income"),
            );
        }
    }

    #[test]
    fn invalid_amount() {
        let report = single(row(RowType::SummaryRow, &["Total Income", ""]));
        assert!(matches!(
            Summary::TOTAL_INCOME.total(&report),
            Err(ExtractError::InvalidAmount { value, .. }) if value.is_empty()
        ));
    }

    #[test]
    fn twelve_months() -> Result<()> {
        let window = window();
        let report = monthly(window.header_labels()?);
        let amounts = Summary::TOTAL_INCOME.monthly(&report, &window)?;
        assert_eq!(amounts.len(), 12);
        assert_eq!(amounts[0], "1000.00".parse::<Money>()?);
        assert_eq!(amounts[11], "12000.00".parse::<Money>()?);
        Ok(())
    }

    #[test]
    fn header_last_column_mismatch() -> Result<()> {
        let window = window();
        let mut labels = window.header_labels()?;
        labels[11] = "30 Sep 25".to_string();
        let res = Summary::TOTAL_INCOME.monthly(&monthly(labels), &window);
        assert!(
            matches!(dbg!(&res), Err(ExtractError::HeaderMismatch(m)) if m.contains("column 12"))
        );
        Ok(())
    }

    #[test]
    fn header_wrong_width_or_type() -> Result<()> {
        let window = window();
        let mut labels = window.header_labels()?;
        labels.pop();
        let res = Summary::TOTAL_INCOME.monthly(&monthly(labels), &window);
        assert!(matches!(res, Err(ExtractError::HeaderMismatch(_))));

        let mut report = monthly(window.header_labels()?);
        report.rows[0].row_type = Some(RowType::Row);
        let res = Summary::TOTAL_INCOME.monthly(&report, &window);
        assert!(matches!(res, Err(ExtractError::HeaderMismatch(m)) if m.contains("not a header")));
        Ok(())
    }

    #[test]
    fn monthly_summary_needs_thirteen_cells() -> Result<()> {
        let window = window();
        let mut report = monthly(window.header_labels()?);
        report.rows[1].rows[0].cells.pop();
        let res = Summary::TOTAL_INCOME.monthly(&report, &window);
        assert!(matches!(res, Err(ExtractError::MissingSummaryRow { .. })));
        Ok(())
    }
}
