//! pendant - VitaPendant service runner and caregiver console

mod cli;
mod dashboard;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pendant::{DeviceClient, DeviceContext, PendantConfig};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let mut config = PendantConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = cli.url {
        config.client.base_url = url;
    }

    match cli.command {
        Commands::Serve { host, port, seed } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if seed.is_some() {
                config.telemetry.seed = seed;
            }
            config.validate()?;
            serve(&config).await
        }
        Commands::Status { json } => status(&config, json).await,
        Commands::History { json } => history(&config, json).await,
        Commands::Sos { yes } => sos(&config, yes).await,
        Commands::Watch {
            status_interval,
            history_interval,
        } => {
            if let Some(secs) = status_interval {
                config.client.status_interval_secs = secs;
            }
            if let Some(secs) = history_interval {
                config.client.history_interval_secs = secs;
            }
            config.validate()?;
            watch(&config).await
        }
    }
}

fn client(config: &PendantConfig) -> Result<DeviceClient> {
    Ok(DeviceClient::with_timeout(
        config.client.base_url.clone(),
        config.client.timeout(),
    )?)
}

async fn serve(config: &PendantConfig) -> Result<()> {
    let addr = config.server_address()?;
    let ctx = Arc::new(DeviceContext::from_seed(
        config.telemetry_profile(),
        config.telemetry.seed,
    ));
    if let Some(seed) = config.telemetry.seed {
        log::info!("Telemetry seeded with {}", seed);
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    pendant::server::serve(ctx, addr, shutdown).await?;
    Ok(())
}

async fn status(config: &PendantConfig, json: bool) -> Result<()> {
    let reading = client(config)?.fetch_status().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        print!("{}", dashboard::render_reading(&reading));
    }
    Ok(())
}

async fn history(config: &PendantConfig, json: bool) -> Result<()> {
    let history = client(config)?.fetch_history().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        print!("{}", dashboard::render_history(&history));
        for point in &history {
            println!(
                "  {}  {:>3} bpm",
                point.time.with_timezone(&chrono::Local).format("%a %H:%M"),
                point.heart_rate
            );
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn sos(config: &PendantConfig, yes: bool) -> Result<()> {
    if !yes && !confirm("Are you sure you want to send an emergency SOS alert?")? {
        println!("SOS cancelled");
        return Ok(());
    }

    let ack = client(config)?.send_sos().await?;
    print!("{}", dashboard::render_sos_ack(&ack));
    Ok(())
}

async fn watch(config: &PendantConfig) -> Result<()> {
    let client = client(config)?;
    let mut status_tick = tokio::time::interval(config.client.status_interval());
    let mut history_tick = tokio::time::interval(config.client.history_interval());
    let mut fall_alerted = false;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("Watching {} (ctrl-c to stop)", client.base_url());

    loop {
        tokio::select! {
            _ = status_tick.tick() => match client.fetch_status().await {
                Ok(reading) => {
                    print!("\n{}", dashboard::render_reading(&reading));
                    if reading.is_fallen && !fall_alerted {
                        println!("*** Fall detected. Run `pendant sos` to alert emergency contacts. ***");
                    }
                    fall_alerted = reading.is_fallen;
                }
                Err(e) => println!("\nConnection lost: {}. Retrying in {}s.", e, config.client.status_interval_secs),
            },
            _ = history_tick.tick() => match client.fetch_history().await {
                Ok(history) => print!("\n{}", dashboard::render_history(&history)),
                Err(e) => log::warn!("History unavailable: {}", e),
            },
            _ = &mut ctrl_c => {
                println!();
                return Ok(());
            }
        }

        io::stdout().flush()?;
    }
}
