use crate::error::ApiError;
use crate::period::{MonthWindow, RollingPeriod};
use crate::report::raw::ReportEnvelope;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Wait between attempts while the report API is rate limiting
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);

/// Comparison periods after the first one in a twelve month breakdown
const BREAKDOWN_PERIODS: u32 = MonthWindow::MONTHS as u32 - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Month,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Month => write!(f, "MONTH"),
        }
    }
}

/// Arguments of one profit and loss call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub periods: Option<u32>,
    pub timeframe: Option<Timeframe>,
}

impl ReportQuery {
    /// A single total over the rolling year
    pub fn rolling(period: &RollingPeriod) -> Self {
        Self {
            from: period.start,
            to: period.end,
            periods: None,
            timeframe: None,
        }
    }

    /// The latest month of `window` plus one comparison period per earlier month
    pub fn monthly(window: &MonthWindow) -> Result<Self> {
        let latest = window.latest();
        let to = latest
            .last_day()
            .with_context(|| format!("No last day for {latest}"))?;
        let from = to.with_day0(0).context("No first day of month")?;
        Ok(Self {
            from,
            to,
            periods: Some(BREAKDOWN_PERIODS),
            timeframe: Some(Timeframe::Month),
        })
    }
}

/// The accounting platform's profit and loss endpoint.
///
/// Implementations fold every failure shape into [`ApiError`] so that rate limiting
/// can be recognised in one place.
pub trait ReportApi {
    fn profit_and_loss(
        &self,
        query: &ReportQuery,
    ) -> impl Future<Output = Result<ReportEnvelope, ApiError>>;
}

/// Suspends the caller between retries
pub trait Pause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncStdPause;

impl Pause for AsyncStdPause {
    async fn pause(&self, duration: Duration) {
        async_std::task::sleep(duration).await
    }
}

/// Fetches a report, retrying the identical call for as long as the API rate limits.
/// Any other failure is returned as is.
pub async fn fetch_profit_and_loss<A, P>(
    api: &A,
    pause: &P,
    query: &ReportQuery,
) -> Result<ReportEnvelope, ApiError>
where
    A: ReportApi,
    P: Pause,
{
    let mut attempt: u64 = 1;
    loop {
        debug!(?query, attempt, "Requesting profit and loss report");
        match api.profit_and_loss(query).await {
            Ok(envelope) => return Ok(envelope),
            Err(err) if err.is_rate_limited() => {
                warn!(
                    attempt,
                    "Report API rate limited, retrying in {}s",
                    RATE_LIMIT_BACKOFF.as_secs()
                );
                pause.pause(RATE_LIMIT_BACKOFF).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
