use std::io::BufRead;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod dashboard;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use commands::Command;
use config::Config;
use dashboard::{Dashboard, DashboardEvent};

/// Forward operator input to the dashboard. End of input quits.
///
/// Runs on its own thread: a blocking stdin read must not keep the runtime
/// from shutting down when the dashboard stops first.
fn read_commands<R: BufRead>(input: R, events: UnboundedSender<DashboardEvent>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if let Some(command) = commands::parse(&line) {
                    let quit = command == Command::Quit;
                    if events.send(DashboardEvent::Command(command)).is_err() || quit {
                        return;
                    }
                }
            }
            Err(e) => {
                error!("Failed to read command: {}", e);
                let _ = events.send(DashboardEvent::Command(Command::Quit));
                return;
            }
        }
    }

    debug!("stdin closed");
    let _ = events.send(DashboardEvent::Command(Command::Quit));
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout belongs to the dashboard frames
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "jaga_dana=info"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("🛡️ Starting Jaga Dana dashboard...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };
    info!("Backend: {}", config.api_base);

    let (events, inbox) = mpsc::unbounded_channel();
    let dashboard = Dashboard::new(&config, events.clone());

    if let Err(e) = std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || read_commands(std::io::stdin().lock(), events))
    {
        error!("Failed to start input reader: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = dashboard.run(inbox, std::io::stdout()).await {
        error!("Dashboard error: {}", e);
        std::process::exit(1);
    }
}
