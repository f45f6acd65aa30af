use thiserror::Error;

/// A failed call to the accounting report API, whatever shape it arrived in
#[derive(Error, Debug)]
#[error("Report API error ({}): {message}", describe_status(.status))]
pub struct ApiError {
    status: Option<u16>,
    message: String,
}

impl ApiError {
    pub const TOO_MANY_REQUESTS: u16 = 429;

    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(Self::TOO_MANY_REQUESTS)
    }

    /// Normalizes an error object that was delivered as a JSON string.
    ///
    /// The status is looked for at `response.statusCode`, `statusCode`, then `status`.
    /// Returns `None` when the payload does not look like an error at all.
    pub fn from_payload(payload: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(payload).ok()?;
        let object = value.as_object()?;
        let status = [
            value.pointer("/response/statusCode"),
            object.get("statusCode"),
            object.get("status"),
        ]
        .into_iter()
        .flatten()
        .find_map(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
        .and_then(|s| u16::try_from(s).ok());
        let message = ["message", "Message", "error"]
            .iter()
            .find_map(|k| object.get(*k)?.as_str())
            .map(str::to_string);
        if status.is_none() && message.is_none() {
            return None;
        }
        Some(Self::new(status, message.unwrap_or_else(|| payload.to_string())))
    }
}

fn describe_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| format!("status {s}"))
}

/// The report came back in a shape that cannot be trusted
#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    #[error("Empty response from report API")]
    MissingReport,

    #[error("No rows found in '{0}' section of report")]
    MissingSection(String),

    #[error("'{label}' summary row not found or malformed: {reason}")]
    MissingSummaryRow { label: String, reason: String },

    #[error("Report header mismatch: {0}")]
    HeaderMismatch(String),

    #[error("Report title {0} not found")]
    MissingTitle(usize),

    #[error("Invalid amount '{value}' in '{label}'")]
    InvalidAmount { label: String, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is missing")]
    Missing(&'static str),

    #[error("{feature} is partially configured, missing {missing}")]
    Incomplete {
        feature: &'static str,
        missing: &'static str,
    },

    #[error("No notification feature configured, set Pushover or EO report settings")]
    NoFeature,

    #[error("Invalid revenue goal '{0}': must be a decimal greater than zero")]
    InvalidGoal(String),
}
