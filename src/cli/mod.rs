pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "novelsync")]
#[command(about = "Scrape web novels into a local document store", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/novelsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape one novel now
    Scrape {
        /// Novel landing page URL
        url: String,
    },
    /// Add a URL to the scraping queue
    Enqueue {
        /// Novel landing page URL
        url: String,
    },
    /// Process one queue-creation event (JSON)
    Event {
        /// Read the event from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Drain every item currently in the queue
    Backlog,
    /// Fetch new chapters for every stored novel
    Update,
    /// List stored novels, or one novel's chapters
    List {
        /// Novel slug whose chapters to list
        #[arg(long, value_name = "SLUG")]
        chapters: Option<String>,
    },
    /// Queue watcher that drains the queue on an interval
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

#[derive(Subcommand)]
pub enum DaemonAction {
    /// Start the watcher in the foreground
    Start {
        /// Poll interval (e.g., "30s", "1m", "1h")
        #[arg(short, long, default_value = "1m")]
        interval: String,

        /// Skip the drain on start
        #[arg(long)]
        no_initial_drain: bool,

        /// Log file path (default: stdout)
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
    /// Stop the running watcher
    Stop,
    /// Check watcher status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrape_with_globals() {
        let cli = Cli::try_parse_from([
            "novelsync",
            "--db",
            "/tmp/n.db",
            "scrape",
            "https://novelfull.net/a.html",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/n.db")));
        assert!(matches!(cli.command, Commands::Scrape { ref url } if url.ends_with("a.html")));
    }

    #[test]
    fn test_parse_daemon_start_defaults() {
        let cli = Cli::try_parse_from(["novelsync", "daemon", "start"]).unwrap();

        match cli.command {
            Commands::Daemon {
                action:
                    DaemonAction::Start {
                        interval,
                        no_initial_drain,
                        log,
                    },
            } => {
                assert_eq!(interval, "1m");
                assert!(!no_initial_drain);
                assert!(log.is_none());
            }
            _ => panic!("expected daemon start"),
        }
    }

    #[test]
    fn test_parse_list_chapters() {
        let cli = Cli::try_parse_from(["novelsync", "list", "--chapters", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::List { chapters: Some(ref s) } if s == "abc"));
    }
}
