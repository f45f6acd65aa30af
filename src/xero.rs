use crate::config::XeroCredentials;
use crate::error::ApiError;
use crate::fetch::{ReportApi, ReportQuery};
use crate::report::raw::ReportEnvelope;
use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

const TOKEN_URL: &str = "https://identity.xero.com/connect/token";
const PROFIT_AND_LOSS_URL: &str = "https://api.xero.com/api.xro/2.0/Reports/ProfitAndLoss";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Custom connections carry their organisation in the token, so the tenant is always empty
const TENANT_ID: &str = "";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Report API client authenticated with the client credentials grant
pub struct XeroClient {
    client: Client,
    access_token: String,
}

impl XeroClient {
    pub async fn connect(client: Client, credentials: &XeroCredentials) -> Result<Self> {
        let res = client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Failed to request Xero access token")?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("Xero token request returned status {status}: {body}");
        }
        let token: TokenResponse = res
            .json()
            .await
            .context("Failed to parse Xero token response")?;
        info!(expires_in = ?token.expires_in, "Connected to Xero");
        Ok(Self {
            client,
            access_token: token.access_token,
        })
    }
}

fn query_params(query: &ReportQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("fromDate", query.from.format(DATE_FORMAT).to_string()),
        ("toDate", query.to.format(DATE_FORMAT).to_string()),
    ];
    if let Some(periods) = query.periods {
        params.push(("periods", periods.to_string()));
    }
    if let Some(timeframe) = query.timeframe {
        params.push(("timeframe", timeframe.to_string()));
    }
    params
}

/// Turns a response into a report or a normalized [`ApiError`].
///
/// A successful status whose body is a JSON string holds a serialized error object.
fn parse_response(status: u16, body: &str) -> Result<ReportEnvelope, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::new(Some(status), body));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::new(None, format!("Failed to parse report response: {e}")))?;
    if let Value::String(payload) = &value {
        return Err(ApiError::from_payload(payload)
            .unwrap_or_else(|| ApiError::new(None, payload.clone())));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::new(None, format!("Failed to deserialize report: {e}")))
}

impl ReportApi for XeroClient {
    async fn profit_and_loss(&self, query: &ReportQuery) -> Result<ReportEnvelope, ApiError> {
        let res = self
            .client
            .get(PROFIT_AND_LOSS_URL)
            .bearer_auth(&self.access_token)
            .header("xero-tenant-id", TENANT_ID)
            .header(ACCEPT, "application/json")
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| ApiError::new(e.status().map(|s| s.as_u16()), e.to_string()))?;
        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|e| ApiError::new(Some(status), e.to_string()))?;
        debug!(status, bytes = body.len(), "Profit and loss response");
        parse_response(status, &body)
    }
}
