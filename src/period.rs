use crate::money::Money;
use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

/// Format of the month-end labels in a monthly breakdown header, e.g. `30 Sep 26`
pub const HEADER_DATE_FORMAT: &str = "%d %b %y";

/// The twelve months up to and including yesterday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RollingPeriod {
    pub fn ending_yesterday(today: NaiveDate) -> Result<Self> {
        let end = today
            .checked_sub_days(Days::new(1))
            .context("No day before today")?;
        let start = end
            .checked_sub_months(Months::new(12))
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .with_context(|| format!("No rolling year start for {end}"))?;
        Ok(Self { start, end })
    }
}

/// The rolling-twelve total. Not changed once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueFigure {
    period: RollingPeriod,
    amount: Money,
}

impl RevenueFigure {
    pub fn new(period: RollingPeriod, amount: Money) -> Self {
        Self { period, amount }
    }

    pub fn period_start(&self) -> NaiveDate {
        self.period.start
    }

    pub fn period_end(&self) -> NaiveDate {
        self.period.end
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// A calendar month, rendered `yyyy-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    pub month: YearMonth,
    pub amount: Money,
}

/// The twelve complete months before the current one, most recent first.
/// This is the column order of a monthly breakdown header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow(Vec<YearMonth>);

impl MonthWindow {
    pub const MONTHS: usize = 12;

    pub fn preceding(today: NaiveDate) -> Result<Self> {
        let current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .with_context(|| format!("No first of month for {today}"))?;
        let months = (1..=Self::MONTHS as u32)
            .map(|back| {
                current
                    .checked_sub_months(Months::new(back))
                    .map(YearMonth::of)
                    .with_context(|| format!("No month {back} months before {current}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(months))
    }

    /// Most recent month in the window
    pub fn latest(&self) -> YearMonth {
        self.0[0]
    }

    /// Expected header labels, one per month, in window order
    pub fn header_labels(&self) -> Result<Vec<String>> {
        self.0
            .iter()
            .map(|month| {
                month
                    .last_day()
                    .map(|d| d.format(HEADER_DATE_FORMAT).to_string())
                    .with_context(|| format!("No last day for {month}"))
            })
            .collect()
    }

    /// Pairs each month with its amount, keeping window order
    pub fn zip(&self, amounts: Vec<Money>) -> Vec<MonthlyRevenue> {
        self.0
            .iter()
            .zip(amounts)
            .map(|(month, amount)| MonthlyRevenue {
                month: *month,
                amount,
            })
            .collect()
    }
}

#[cfg(test)]
mod period_tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rolling_period() -> Result<()> {
        let period = RollingPeriod::ending_yesterday(date("2026-10-18"))?;
        assert_eq!(period.end, date("2026-10-17"));
        assert_eq!(period.start, date("2025-10-18"));

        let period = RollingPeriod::ending_yesterday(date("2026-01-01"))?;
        assert_eq!(period.end, date("2025-12-31"));
        assert_eq!(period.start, date("2025-01-01"));
        Ok(())
    }

    #[test]
    fn rolling_period_leap_day() -> Result<()> {
        let period = RollingPeriod::ending_yesterday(date("2028-03-01"))?;
        assert_eq!(period.end, date("2028-02-29"));
        assert_eq!(period.start, date("2027-03-01"));
        Ok(())
    }

    #[test]
    fn window_is_most_recent_first() -> Result<()> {
        let window = MonthWindow::preceding(date("2026-10-18"))?;
        let months: Vec<String> = window.0.iter().map(|m| m.to_string()).collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "2026-09");
        assert_eq!(months[8], "2026-01");
        assert_eq!(months[9], "2025-12");
        assert_eq!(months[11], "2025-10");
        Ok(())
    }

    #[test]
    fn header_labels_are_month_ends() -> Result<()> {
        let window = MonthWindow::preceding(date("2026-03-31"))?;
        let labels = window.header_labels()?;
        assert_eq!(labels[0], "28 Feb 26");
        assert_eq!(labels[1], "31 Jan 26");
        assert_eq!(labels[2], "31 Dec 25");
        assert_eq!(labels[11], "31 Mar 25");

        let window = MonthWindow::preceding(date("2024-03-05"))?;
        assert_eq!(window.header_labels()?[0], "29 Feb 24");
        Ok(())
    }
}
