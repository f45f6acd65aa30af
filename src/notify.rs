use crate::config::PushoverCredentials;
use crate::http::Transport;
use crate::money::Money;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

pub const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

/// Title and body of the progress notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalMessage {
    pub title: String,
    pub message: String,
}

impl GoalMessage {
    pub fn new(total: &Money, goal: &Money) -> Result<Self> {
        let percentage = total.percentage_of(goal)?;
        Ok(Self {
            title: format!("{percentage}% to EO Goal"),
            message: format!(
                "{percentage}% · {} of {} goal",
                total.thousands()?,
                goal.thousands()?
            ),
        })
    }
}

#[derive(Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    #[serde(flatten)]
    message: &'a GoalMessage,
}

pub async fn send_notification<T: Transport>(
    transport: &T,
    credentials: &PushoverCredentials,
    message: &GoalMessage,
) -> Result<()> {
    let body = serde_json::to_value(PushoverRequest {
        token: &credentials.token,
        user: &credentials.user,
        message,
    })?;
    let status = transport
        .post_json(PUSHOVER_URL, &body)
        .await
        .context("Failed to send push notification")?;
    if !(200..300).contains(&status) {
        anyhow::bail!("Push notification rejected with status {status}");
    }
    info!(title = %message.title, "Sent notification");
    Ok(())
}
