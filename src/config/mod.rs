mod raw;

pub use raw::RawConfig;

use crate::error::ConfigError;
use crate::money::Money;
use std::convert::TryFrom;
use std::fmt;

pub const DEFAULT_GOAL: &str = "1500000";

#[derive(Clone, PartialEq)]
pub struct XeroCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone, PartialEq)]
pub struct PushoverCredentials {
    pub token: String,
    pub user: String,
}

/// Who the aggregation backend report is filed for, and where to find its endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub name: String,
    pub chapter: String,
    pub directory_url: String,
}

/// Validated settings for one run. Never changed after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub xero: XeroCredentials,
    pub pushover: Option<PushoverCredentials>,
    pub participant: Option<Participant>,
    pub goal: Money,
}

impl fmt::Debug for XeroCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XeroCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for PushoverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushoverCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Trimmed value, or None if absent or blank
fn sanitize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    sanitize(value).ok_or(ConfigError::Missing(name))
}

/// All of a feature's settings, none of them, or an error naming the first one missing
fn feature<const N: usize>(
    feature: &'static str,
    values: [(Option<String>, &'static str); N],
) -> Result<Option<[String; N]>, ConfigError> {
    let values = values.map(|(value, name)| (sanitize(value), name));
    if values.iter().all(|(value, _)| value.is_none()) {
        return Ok(None);
    }
    if let Some((_, missing)) = values.iter().find(|(value, _)| value.is_none()) {
        return Err(ConfigError::Incomplete {
            feature,
            missing: *missing,
        });
    }
    Ok(Some(values.map(|(value, _)| value.unwrap_or_default())))
}

impl Config {
    pub fn push_enabled(&self) -> bool {
        self.pushover.is_some()
    }

    pub fn report_enabled(&self) -> bool {
        self.participant.is_some()
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, ConfigError> {
        let xero = XeroCredentials {
            client_id: required(raw.xero_client_id, "XERO_CLIENT_ID")?,
            client_secret: required(raw.xero_client_secret, "XERO_CLIENT_SECRET")?,
        };
        let pushover = feature(
            "Push notification",
            [
                (raw.pushover_token, "PUSHOVER_TOKEN"),
                (raw.pushover_user, "PUSHOVER_USER"),
            ],
        )?
        .map(|[token, user]| PushoverCredentials { token, user });
        let participant = feature(
            "EO report",
            [
                (raw.participant_name, "EO_PARTICIPANT_NAME"),
                (raw.participant_chapter, "EO_PARTICIPANT_CHAPTER"),
                (raw.directory_url, "EO_DIRECTORY_URL"),
            ],
        )?
        .map(|[name, chapter, directory_url]| Participant {
            name,
            chapter,
            directory_url,
        });
        if pushover.is_none() && participant.is_none() {
            return Err(ConfigError::NoFeature);
        }
        let goal = sanitize(raw.goal).unwrap_or_else(|| DEFAULT_GOAL.to_string());
        let goal = goal
            .parse::<Money>()
            .ok()
            .filter(|g| *g > Money::default())
            .ok_or(ConfigError::InvalidGoal(goal))?;
        Ok(Config {
            xero,
            pushover,
            participant,
            goal,
        })
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use anyhow::Result;
    use std::convert::TryInto;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn push_only() -> RawConfig {
        RawConfig {
            xero_client_id: some("id"),
            xero_client_secret: some("secret"),
            pushover_token: some("token"),
            pushover_user: some("user"),
            ..Default::default()
        }
    }

    #[test]
    fn push_only_config() -> Result<()> {
        let config: Config = push_only().try_into()?;
        assert!(config.push_enabled());
        assert!(!config.report_enabled());
        assert_eq!(config.goal, DEFAULT_GOAL.parse::<Money>()?);
        Ok(())
    }

    #[test]
    fn values_are_trimmed() -> Result<()> {
        let config: Config = RawConfig {
            xero_client_id: some("  id\n"),
            participant_name: some(" Jane Doe "),
            participant_chapter: some("Sydney"),
            directory_url: some("https://example.com/endpoints.json"),
            goal: some(" 2000000 "),
            ..push_only()
        }
        .try_into()?;
        assert_eq!(config.xero.client_id, "id");
        let participant = config.participant.clone().expect("participant");
        assert_eq!(participant.name, "Jane Doe");
        assert_eq!(config.goal, "2000000".parse::<Money>()?);
        Ok(())
    }

    #[test]
    fn missing_credentials() {
        let res = Config::try_from(RawConfig {
            xero_client_secret: some("   "),
            ..push_only()
        });
        assert_eq!(res, Err(ConfigError::Missing("XERO_CLIENT_SECRET")));

        let res = Config::try_from(RawConfig {
            xero_client_id: None,
            ..push_only()
        });
        assert_eq!(res, Err(ConfigError::Missing("XERO_CLIENT_ID")));
    }

    #[test]
    fn no_feature() {
        let res = Config::try_from(RawConfig {
            pushover_token: None,
            pushover_user: some(""),
            ..push_only()
        });
        assert_eq!(res, Err(ConfigError::NoFeature));
    }

    #[test]
    fn incomplete_feature() {
        let res = Config::try_from(RawConfig {
            pushover_user: None,
            ..push_only()
        });
        assert_eq!(
            res,
            Err(ConfigError::Incomplete {
                feature: "Push notification",
                missing: "PUSHOVER_USER"
            })
        );

        let res = Config::try_from(RawConfig {
            participant_chapter: some("Sydney"),
            ..push_only()
        });
        assert!(matches!(res, Err(ConfigError::Incomplete { missing: "EO_PARTICIPANT_NAME", .. })));
    }

    #[test]
    fn invalid_goal() {
        for goal in ["0", "-5", "lots"] {
            let res = Config::try_from(RawConfig {
                goal: some(goal),
                ..push_only()
            });
            assert_eq!(res, Err(ConfigError::InvalidGoal(goal.to_string())));
        }
    }
}
