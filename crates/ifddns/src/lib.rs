// # ifddns command-line plumbing
//
// Shared pieces of the `afraid-ddns` and `gandi-ddns` binaries. The binaries
// are thin: they parse flags, build the provider and address source, and
// hand over to the engines in `ifddns-core`.
//
// ## Environment
//
// - `IFDDNS_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Exit codes
//
// - 0: every update succeeded
// - 1: configuration or startup error
// - 2: runtime error (address resolution, provider failure)

use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "IFDDNS_LOG_LEVEL";

/// Exit codes for the updater binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfddnsExitCode {
    /// All updates applied
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<IfddnsExitCode> for ExitCode {
    fn from(code: IfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Map a level name to a tracing level, falling back to INFO
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber at the level from `IFDDNS_LOG_LEVEL`
pub fn init_tracing() -> anyhow::Result<()> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .map(|v| parse_log_level(&v))
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Single-threaded runtime; every request is awaited in turn
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Return the flag value, or the "missing value" error naming the flag
pub fn require_flag(flag: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => anyhow::bail!("Missing value for --{}", flag),
    }
}

/// Handle a clap parse failure: print it and pick the exit code
///
/// `--help` and `--version` also arrive here and are not failures.
pub fn flag_error_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        IfddnsExitCode::ConfigError.into()
    } else {
        IfddnsExitCode::Success.into()
    }
}
