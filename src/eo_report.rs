use crate::config::Participant;
use crate::http::Transport;
use crate::period::{MonthlyRevenue, RevenueFigure, YearMonth};
use anyhow::{Result, bail};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};
use std::collections::HashMap;
use tracing::{info, warn};

/// Version of the payload layout understood by the aggregation backend
pub const PAYLOAD_VERSION: &str = "1";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthAmount {
    #[serde_as(as = "DisplayFromStr")]
    pub month: YearMonth,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingAmount {
    pub start: String,
    pub end: String,
    /// Fixed to two decimal places
    pub amount: String,
}

/// Body posted to the aggregation backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub version: String,
    pub participant_name: String,
    pub participant_chapter: String,
    pub company_name: String,
    pub twelve_months: Vec<MonthAmount>,
    pub rolling_twelve: RollingAmount,
}

impl ReportPayload {
    pub fn new(
        participant: &Participant,
        company_name: String,
        months: &[MonthlyRevenue],
        rolling: &RevenueFigure,
    ) -> Self {
        Self {
            version: PAYLOAD_VERSION.to_string(),
            participant_name: participant.name.clone(),
            participant_chapter: participant.chapter.clone(),
            company_name,
            twelve_months: months
                .iter()
                .map(|m| MonthAmount {
                    month: m.month,
                    amount: m.amount.0,
                })
                .collect(),
            rolling_twelve: RollingAmount {
                start: rolling.period_start().format(DATE_FORMAT).to_string(),
                end: rolling.period_end().format(DATE_FORMAT).to_string(),
                amount: rolling.amount().fixed2(),
            },
        }
    }
}

/// What became of a report delivery. Only a non-https endpoint is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NoEndpoint,
    Failed(String),
}

/// Looks up the participant's chapter endpoint and posts the payload to it.
///
/// Best effort: a missing endpoint, an unreachable directory and a rejected post are
/// logged and reported back, never raised. An endpoint that is not https is raised.
pub async fn send_report<T: Transport>(
    transport: &T,
    participant: &Participant,
    payload: &ReportPayload,
) -> Result<Delivery> {
    let directory = match fetch_directory(transport, &participant.directory_url).await {
        Ok(directory) => directory,
        Err(err) => {
            warn!("Failed to fetch endpoint directory: {err:#}");
            return Ok(Delivery::Failed(format!("{err:#}")));
        }
    };
    let Some(endpoint) = directory.get(&participant.chapter) else {
        info!(chapter = %participant.chapter, "No endpoint configured for chapter, skipping report");
        return Ok(Delivery::NoEndpoint);
    };
    if !is_https(endpoint) {
        bail!(
            "Endpoint for chapter {} is not https: {endpoint}",
            participant.chapter
        );
    }
    let body = serde_json::to_value(payload)?;
    match transport.post_json(endpoint, &body).await {
        Ok(200) => {
            info!(chapter = %participant.chapter, "Sent EO report");
            Ok(Delivery::Delivered)
        }
        Ok(status) => {
            warn!(status, "EO report rejected");
            Ok(Delivery::Failed(format!("status {status}")))
        }
        Err(err) => {
            warn!("Failed to send EO report: {err:#}");
            Ok(Delivery::Failed(format!("{err:#}")))
        }
    }
}

fn is_https(endpoint: &str) -> bool {
    Url::parse(endpoint).is_ok_and(|url| url.scheme() == "https")
}

async fn fetch_directory<T: Transport>(transport: &T, url: &str) -> Result<HashMap<String, String>> {
    let body = transport.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod eo_report_tests {
    use super::*;
    use crate::money::Money;
    use crate::period::{MonthWindow, RollingPeriod};
    use chrono::NaiveDate;

    #[test]
    fn payload_shape() -> Result<()> {
        let today: NaiveDate = "2026-10-18".parse()?;
        let window = MonthWindow::preceding(today)?;
        let amounts = (1..=12)
            .map(|m| format!("{m}000.5").parse::<Money>())
            .collect::<Result<Vec<_>, _>>()?;
        let months = window.zip(amounts);
        let rolling = RevenueFigure::new(
            RollingPeriod::ending_yesterday(today)?,
            "1534230.5".parse::<Money>()?,
        );
        let participant = Participant {
            name: "Jane Doe".to_string(),
            chapter: "sydney".to_string(),
            directory_url: "https://example.com/endpoints.json".to_string(),
        };
        let payload = ReportPayload::new(&participant, "Acme Ltd".to_string(), &months, &rolling);
        let json = serde_json::to_value(&payload)?;
        assert_eq!(json["version"], "1");
        assert_eq!(json["participantName"], "Jane Doe");
        assert_eq!(json["participantChapter"], "sydney");
        assert_eq!(json["companyName"], "Acme Ltd");
        assert_eq!(json["twelveMonths"].as_array().map(Vec::len), Some(12));
        assert_eq!(
            json["twelveMonths"][0],
            serde_json::json!({ "month": "2026-09", "amount": "1000.5" })
        );
        assert_eq!(json["twelveMonths"][11]["month"], "2025-10");
        assert_eq!(
            json["rollingTwelve"],
            serde_json::json!({ "start": "2025-10-18", "end": "2026-10-17", "amount": "1534230.50" })
        );
        Ok(())
    }

    #[test]
    fn https_scheme() {
        assert!(is_https("https://backend.example.com/report"));
        assert!(is_https("HTTPS://backend.example.com/report"));
        assert!(!is_https("http://backend.example.com/report"));
        assert!(!is_https("backend.example.com/report"));
        assert!(!is_https("https//backend.example.com"));
    }
}
