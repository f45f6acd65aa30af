use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use eo_progress::{
    Services,
    config::{Config, DEFAULT_GOAL, RawConfig},
    fetch::AsyncStdPause,
    http::HttpTransport,
    run,
    xero::XeroClient,
};
use std::convert::TryFrom;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn setting(name: &'static str, env: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .env(env)
        .hide_env_values(true)
        .help(help)
        .takes_value(true)
}

fn raw_config(matches: &ArgMatches) -> RawConfig {
    let value = |name: &str| matches.value_of(name).map(String::from);
    RawConfig {
        xero_client_id: value("xero-client-id"),
        xero_client_secret: value("xero-client-secret"),
        pushover_token: value("pushover-token"),
        pushover_user: value("pushover-user"),
        participant_name: value("participant-name"),
        participant_chapter: value("participant-chapter"),
        directory_url: value("directory-url"),
        goal: value("goal"),
    }
}

#[async_std::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let matches = Command::new("EO Progress")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Luke Nimtz <luke.nimtz@gmail.com>")
        .about("Reports rolling twelve month revenue against the EO goal")
        .arg(setting("xero-client-id", "XERO_CLIENT_ID", "Xero custom connection client id"))
        .arg(setting(
            "xero-client-secret",
            "XERO_CLIENT_SECRET",
            "Xero custom connection client secret",
        ))
        .arg(setting("pushover-token", "PUSHOVER_TOKEN", "Pushover application token"))
        .arg(setting("pushover-user", "PUSHOVER_USER", "Pushover user key"))
        .arg(setting("participant-name", "EO_PARTICIPANT_NAME", "Participant name for the EO report"))
        .arg(setting(
            "participant-chapter",
            "EO_PARTICIPANT_CHAPTER",
            "Participant chapter, used to look up the report endpoint",
        ))
        .arg(setting(
            "directory-url",
            "EO_DIRECTORY_URL",
            "URL of the chapter endpoint directory",
        ))
        .arg(
            setting("goal", "REVENUE_GOAL", "Rolling twelve month revenue goal")
                .default_value(DEFAULT_GOAL),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log filter used when RUST_LOG is not set")
                .value_name("LEVEL")
                .default_value("info")
                .takes_value(true),
        )
        .get_matches();

    let log_level = matches.value_of("log-level").unwrap_or("info");
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::try_from(raw_config(&matches)).context("Invalid configuration")?;
    info!(
        push = config.push_enabled(),
        report = config.report_enabled(),
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let transport = HttpTransport::new()?;
    let api = XeroClient::connect(transport.client().clone(), &config.xero).await?;
    let services = Services {
        api: &api,
        transport: &transport,
        pause: &AsyncStdPause,
    };
    let today = chrono::Local::now().date_naive();
    let outcome = run(&config, &services, today).await?;
    info!(
        notified = outcome.notified,
        delivery = ?outcome.delivery,
        "Done"
    );
    Ok(())
}
