//! Long-running queue watcher.
//!
//! Drains the scraping queue on a fixed interval until SIGINT/SIGTERM. A PID
//! file keeps a second watcher from starting against the same machine.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::app::{AppContext, NovelsyncError, Result};
use crate::queue::drain_backlog;

/// Watcher settings, filled from the `daemon start` flags.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Time between queue drains (default: 1 minute)
    pub poll_interval: Duration,
    /// Drain once immediately on start
    pub drain_on_start: bool,
    /// Log file path (None = tracing output)
    pub log_file: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            drain_on_start: true,
            log_file: None,
        }
    }
}

const UNITS: [(char, u64); 4] = [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

/// Parse an interval like "30s", "5m", "1h" or "1d". Bare numbers are seconds.
pub fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = match UNITS.iter().find(|(suffix, _)| s.ends_with(*suffix)) {
        Some((suffix, secs)) => (s.trim_end_matches(*suffix), *secs),
        None => (s.as_str(), 1),
    };

    let count: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("Invalid interval: {s}. Use a format like '30s', '5m', '1h'"))?;
    if count == 0 {
        return Err("Interval must be greater than zero".to_string());
    }

    let secs = count
        .checked_mul(unit)
        .ok_or_else(|| format!("Interval too large: {s}"))?;
    Ok(Duration::from_secs(secs))
}

/// Render a duration in the largest whole unit.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    for (suffix, unit) in UNITS {
        if secs >= unit && secs % unit == 0 {
            return format!("{}{suffix}", secs / unit);
        }
    }
    format!("{secs}s")
}

/// Where the watcher's PID is recorded.
pub fn pid_file_path() -> Option<PathBuf> {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .map(|d| d.join("novelsync").join("daemon.pid"))
}

fn read_pid() -> Option<u32> {
    let path = pid_file_path()?;
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(unix)]
fn process_exists(pid: u32) -> bool {
    use std::process::Command;
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(windows)]
fn process_exists(pid: u32) -> bool {
    use std::process::Command;
    Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid)])
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

/// PID file held for the watcher's lifetime, removed on drop.
struct PidFile {
    path: PathBuf,
}

impl PidFile {
    fn acquire() -> Result<Self> {
        if let Some(pid) = read_pid() {
            if process_exists(pid) {
                return Err(NovelsyncError::Other(format!(
                    "Another watcher is already running (PID {pid})"
                )));
            }
        }

        let path = pid_file_path()
            .ok_or_else(|| NovelsyncError::Other("Could not determine PID file path".into()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&path)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { path })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
    Ok(())
}

#[cfg(windows)]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

pub struct Daemon<'a> {
    ctx: &'a AppContext,
    config: DaemonConfig,
}

impl<'a> Daemon<'a> {
    pub fn new(ctx: &'a AppContext, config: DaemonConfig) -> Self {
        Self { ctx, config }
    }

    /// Timestamped line to the log file, or to tracing when none is set.
    fn log(&self, msg: &str) {
        let Some(ref log_path) = self.config.log_file else {
            info!("{msg}");
            return;
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
        {
            let _ = writeln!(file, "[{timestamp}] {msg}");
        }
    }

    /// Run until a shutdown signal arrives. A drain in progress finishes
    /// before the watcher exits.
    pub async fn run(&self) -> Result<()> {
        let _pid_file = PidFile::acquire()?;

        self.log(&format!(
            "novelsync watcher started (interval: {}, PID: {})",
            format_interval(self.config.poll_interval),
            std::process::id()
        ));

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        let mut timer = interval(self.config.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.config.drain_on_start {
            timer.tick().await;
        }

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    signal?;
                    break;
                }
                _ = timer.tick() => self.drain_once().await,
            }
        }

        self.log("Watcher shutting down");
        Ok(())
    }

    async fn drain_once(&self) {
        let start = Instant::now();

        match drain_backlog(self.ctx).await {
            Ok(summary) if summary.total == 0 => {}
            Ok(summary) => self.log(&format!(
                "Drained {} items: {} scraped, {} failed, {} skipped ({:.1}s)",
                summary.total,
                summary.scraped,
                summary.failed,
                summary.skipped,
                start.elapsed().as_secs_f64()
            )),
            Err(e) => self.log(&format!("Failed to read queue: {e}")),
        }
    }
}

/// Send SIGTERM to the running watcher.
pub fn stop_daemon() -> Result<u32> {
    let pid = read_pid()
        .ok_or_else(|| NovelsyncError::Other("No watcher is running (PID file not found)".into()))?;

    #[cfg(unix)]
    let status = std::process::Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .status()?;

    #[cfg(windows)]
    let status = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .status()?;

    if !status.success() {
        return Err(NovelsyncError::Other(format!(
            "Failed to stop watcher (PID {pid})"
        )));
    }

    if let Some(path) = pid_file_path() {
        let _ = fs::remove_file(path);
    }
    Ok(pid)
}

pub fn daemon_status() -> String {
    match read_pid() {
        Some(pid) if process_exists(pid) => format!("Watcher is running (PID: {pid})"),
        Some(_) => "Watcher is not running (stale PID file)".to_string(),
        None => "Watcher is not running".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_interval("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_interval("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_interval(" 90 ").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("2M").unwrap(), Duration::from_secs(120));
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("m").is_err());
        assert!(parse_interval("0m").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_overflow() {
        let err = parse_interval("999999999999999999d").unwrap_err();
        assert!(err.contains("too large"));
        assert_eq!(
            parse_interval(&format!("{}s", u64::MAX)).unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(3600)), "1h");
        assert_eq!(format_interval(Duration::from_secs(1800)), "30m");
        assert_eq!(format_interval(Duration::from_secs(86400)), "1d");
        assert_eq!(format_interval(Duration::from_secs(90)), "90s");
        assert_eq!(format_interval(Duration::from_secs(7200)), "2h");
        assert_eq!(format_interval(Duration::ZERO), "0s");
    }

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert!(config.drain_on_start);
        assert!(config.log_file.is_none());
    }
}
