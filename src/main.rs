use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use novelsync::app::AppContext;
use novelsync::cli::{commands, Cli, Commands, DaemonAction};
use novelsync::config::Config;
use novelsync::daemon::{self, Daemon, DaemonConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Daemon stop/status need no store.
    if let Commands::Daemon { action } = &cli.command {
        match action {
            DaemonAction::Stop => {
                let pid = daemon::stop_daemon()?;
                println!("Stopped watcher (PID {})", pid);
                return Ok(ExitCode::SUCCESS);
            }
            DaemonAction::Status => {
                println!("{}", daemon::daemon_status());
                return Ok(ExitCode::SUCCESS);
            }
            DaemonAction::Start { .. } => {}
        }
    }

    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::Scrape { url } => {
            if !commands::scrape(&ctx, &url).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Enqueue { url } => {
            commands::enqueue(&ctx, &url)?;
        }
        Commands::Event { file } => {
            commands::process_event(&ctx, file.as_deref()).await?;
        }
        Commands::Backlog => {
            commands::drain_backlog(&ctx).await?;
        }
        Commands::Update => {
            commands::update_novels(&ctx).await?;
        }
        Commands::List { chapters } => match chapters {
            Some(slug) => commands::list_chapters(&ctx, &slug)?,
            None => commands::list_novels(&ctx)?,
        },
        Commands::Daemon { action } => {
            if let DaemonAction::Start {
                interval,
                no_initial_drain,
                log,
            } = action
            {
                let poll_interval = daemon::parse_interval(&interval).map_err(anyhow::Error::msg)?;
                let config = DaemonConfig {
                    poll_interval,
                    drain_on_start: !no_initial_drain,
                    log_file: log,
                };
                Daemon::new(&ctx, config).run().await?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
