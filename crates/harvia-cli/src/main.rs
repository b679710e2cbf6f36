use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use harvia_cli::cli::Cli;
use harvia_cli::config::Config;
use harvia_cli::style;
use harvia_core::{CloudPresenceSource, Credentials, Monitor, PresenceSource, TickResult};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let no_color = style::no_color_requested(cli.no_color);

    // Diagnostics go to stderr so the event log on stdout stays clean
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .init();

    match run(cli, no_color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::fatal_line(&format!("{:#}", e), no_color));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, no_color: bool) -> Result<()> {
    let credentials = credentials(&cli)?;

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;
    if let Some(path) = cli.config.as_deref() {
        tracing::debug!("Using config file: {}", path.display());
    }

    println!("{}", style::banner(config.monitor.poll_interval, no_color));

    tracing::info!(
        "Connecting to Harvia cloud via {} (timeout: {}s)",
        config.api.discovery_url,
        config.api.timeout_secs
    );
    let source = CloudPresenceSource::connect(credentials, &config.connect_options())
        .await
        .context("Failed to start monitoring")?;
    tracing::info!("Watching device: {}", source.device());
    println!("{}", style::device_line(source.device(), no_color));

    let mut monitor = Monitor::new(source, config.poll_interval())?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, stopping monitor");
                cancel.cancel();
            }
        }
    });

    let result = monitor
        .run(cancel.clone(), |now, result| report(now, result, no_color))
        .await;

    if cancel.is_cancelled() {
        println!("\n{}", style::stopped_line(no_color));
    }
    result.context("Monitoring stopped")
}

fn credentials(cli: &Cli) -> Result<Credentials> {
    let (Some(username), Some(password)) = (cli.username.as_deref(), cli.password.as_deref())
    else {
        return Err(anyhow!(
            "HARVIA_USERNAME and HARVIA_PASSWORD must be set (or pass --username and --password)"
        ));
    };
    Credentials::new(username, password).context("Invalid credentials")
}

fn report(now: OffsetDateTime, result: &TickResult, no_color: bool) {
    let at = style::local_time(now);
    match result {
        Ok(events) => {
            for event in events {
                println!("{}", style::event_line(&at, event, no_color));
            }
        }
        // Fatal errors are reported once by main
        Err(e) if e.is_recoverable() => {
            println!("{}", style::error_line(&at, &e.to_string(), no_color));
        }
        Err(_) => {}
    }
}
