use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use lx_control_center::{ControlCenter, SettingsLocations};

#[derive(Parser)]
#[command(name = "lx-control-center")]
#[command(about = "Lists the settings applications and modules available on this desktop")]
struct Cli {
    /// Log level: WARNING, INFO or DEBUG
    #[arg(short, long, value_parser = parse_level)]
    log: Option<Level>,

    /// Write the log to this file instead of stderr
    #[arg(short = 'f', long)]
    logfile: Option<PathBuf>,
}

fn parse_level(value: &str) -> Result<Level, String> {
    match value.to_ascii_uppercase().as_str() {
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARNING" | "WARN" => Ok(Level::WARN),
        "ERROR" | "CRITICAL" => Ok(Level::ERROR),
        _ => Err(format!("invalid log level: {}", value)),
    }
}

fn log_filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
}

fn init_logging(level: Level, logfile: Option<&PathBuf>) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(log_filter(level));
    match logfile {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(level) = cli.log {
        init_logging(level, cli.logfile.as_ref())?;
    }

    let mut control_center = ControlCenter::new(SettingsLocations::new())
        .context("could not load settings")?;
    // No GUI toolkit is running, so toolkit-bound modules stay hidden.
    control_center.discover(None);
    control_center.log_summary();

    for (category, entries) in control_center.entries_by_category() {
        println!("{}", category.unwrap_or("Other"));
        for entry in entries {
            println!("  {} ({}, {})", entry.name, entry.source(), entry.path.display());
        }
    }
    Ok(())
}
