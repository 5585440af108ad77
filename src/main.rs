//! xgedit: load, inspect, reset and save XG session files.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::Level;

use xgedit::config::EditorConfig;
use xgedit::param::table::PART_COUNT;
use xgedit::param::GroupId;
use xgedit::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "xgedit", version, about = "Yamaha XG session file editor")]
struct Arguments {
    /// Session file (raw SysEx) to load at startup.
    session: Option<PathBuf>,

    /// Alternate configuration file instead of ~/.xgedit/config.yaml.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// The level to log at, disabled as a default.
    #[arg(short, long, value_enum)]
    log_level: Option<LogLevel>,

    /// Print every non-default parameter in address order.
    #[arg(long)]
    dump: bool,

    /// Reset one multipart instance (0-15). May be repeated.
    #[arg(
        long = "reset-part",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(0..PART_COUNT as i64)
    )]
    reset_parts: Vec<u16>,

    /// Reset every parameter to its default.
    #[arg(long)]
    reset_all: bool,

    /// Write the resulting state as a session file.
    #[arg(short = 'o', long = "save", value_name = "PATH")]
    save: Option<PathBuf>,
}

fn load_config(args: &Arguments) -> Result<EditorConfig, Box<dyn Error>> {
    match &args.config {
        Some(path) => EditorConfig::load_from(path)
            .map_err(|e| Box::<dyn Error>::from(format!("config {}: {e}", path.display()))),
        None => Ok(EditorConfig::load().unwrap_or_default()),
    }
}

fn run(args: Arguments) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args)?;
    let mut session = Session::from_config(&config);

    if let Some(path) = &args.session {
        let path = config.resolve_session_path(path);
        let summary = session.load(&path)?;
        eprintln!("{}: {summary}", path.display());
        for warning in &summary.warnings {
            eprintln!("  {warning}");
        }
    }

    if args.reset_all {
        session.edit(|registry| registry.reset_all());
    }
    for &part in &args.reset_parts {
        session.reset_group(GroupId::Multipart, part)?;
    }

    if args.dump {
        for param in session.registry().snapshot_non_default() {
            println!(
                "{}  {:<24} {}",
                param.address(),
                param.name(),
                param.value()
            );
        }
    }

    if let Some(path) = &args.save {
        let path = config.resolve_session_path(path);
        let count = session.save_as(&path)?;
        eprintln!("{}: {count} parameters saved", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Arguments::parse();

    if let Some(level) = args.log_level {
        tracing_subscriber::fmt()
            .with_max_level(Level::from(level))
            .with_writer(std::io::stderr)
            .init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xgedit: {e}");
            ExitCode::FAILURE
        }
    }
}
