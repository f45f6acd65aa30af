pub mod config;
pub mod eo_report;
pub mod error;
pub mod fetch;
pub mod http;
pub mod money;
pub mod notify;
pub mod period;
pub mod report;
pub mod xero;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Participant};
use eo_report::{Delivery, ReportPayload};
use fetch::{Pause, ReportApi, ReportQuery, fetch_profit_and_loss};
use http::Transport;
use itertools::Itertools;
use notify::GoalMessage;
use period::{MonthWindow, MonthlyRevenue, RevenueFigure, RollingPeriod};
use report::extract::{Summary, company_name};
use report::{ProfitAndLossReport, Report};
use std::convert::TryFrom;
use tracing::{debug, error, info};

/// What one run computed and delivered
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub revenue: RevenueFigure,
    pub message: GoalMessage,
    pub notified: bool,
    pub delivery: Option<Delivery>,
}

/// The external collaborators of a run
pub struct Services<'a, A, T, P> {
    pub api: &'a A,
    pub transport: &'a T,
    pub pause: &'a P,
}

impl<A, T, P> Services<'_, A, T, P>
where
    A: ReportApi,
    T: Transport,
    P: Pause,
{
    async fn report(&self, query: &ReportQuery) -> Result<Report> {
        let envelope = fetch_profit_and_loss(self.api, self.pause, query)
            .await
            .with_context(|| format!("Failed to fetch profit and loss {} to {}", query.from, query.to))?;
        Report::try_from(envelope)
    }

    async fn rolling_revenue(&self, today: NaiveDate) -> Result<RevenueFigure> {
        let period = RollingPeriod::ending_yesterday(today)?;
        let report = self.report(&ReportQuery::rolling(&period)).await?;
        match ProfitAndLossReport::try_from(&report) {
            Ok(pnl) => debug!("Profit and loss {} to {}:\n{pnl}", period.start, period.end),
            Err(err) => debug!("Profit and loss not itemised: {err}"),
        }
        let total = Summary::TOTAL_INCOME
            .total(&report)
            .context("Failed to read rolling income")?;
        Ok(RevenueFigure::new(period, total))
    }

    async fn monthly_revenue(&self, today: NaiveDate) -> Result<(String, Vec<MonthlyRevenue>)> {
        let window = MonthWindow::preceding(today)?;
        let report = self.report(&ReportQuery::monthly(&window)?).await?;
        let amounts = Summary::TOTAL_INCOME
            .monthly(&report, &window)
            .context("Failed to read monthly income")?;
        let company = company_name(&report)?;
        let months = window.zip(amounts);
        debug!(
            "Monthly income for {company}: {}",
            months
                .iter()
                .map(|m| format!("{} {}", m.month, m.amount))
                .join(", ")
        );
        Ok((company, months))
    }

    async fn eo_report(
        &self,
        participant: &Participant,
        revenue: &RevenueFigure,
        today: NaiveDate,
    ) -> Result<Delivery> {
        let (company, months) = self.monthly_revenue(today).await?;
        let payload = ReportPayload::new(participant, company, &months, revenue);
        eo_report::send_report(self.transport, participant, &payload).await
    }
}

/// Computes rolling revenue as of `today` and delivers it through every enabled feature.
///
/// Report fetching and validation failures end the run. Notification and report
/// delivery are independent: a failed notification still lets the report go out,
/// and is returned once both have been attempted.
pub async fn run<A, T, P>(
    config: &Config,
    services: &Services<'_, A, T, P>,
    today: NaiveDate,
) -> Result<Outcome>
where
    A: ReportApi,
    T: Transport,
    P: Pause,
{
    let revenue = services.rolling_revenue(today).await?;
    let message = GoalMessage::new(&revenue.amount(), &config.goal)?;
    info!(
        start = %revenue.period_start(),
        end = %revenue.period_end(),
        "{}",
        message.message
    );

    let notify_result = match &config.pushover {
        Some(credentials) => {
            notify::send_notification(services.transport, credentials, &message)
                .await
                .map(|_| true)
        }
        None => Ok(false),
    };
    if let Err(err) = &notify_result {
        error!("{err:#}");
    }

    let delivery = match &config.participant {
        Some(participant) => Some(services.eo_report(participant, &revenue, today).await?),
        None => None,
    };

    Ok(Outcome {
        revenue,
        message,
        notified: notify_result?,
        delivery,
    })
}
