// mapty-lib/src/logging.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Maps `-v`/`-q` counts to a level name. Default is WARN.
fn level_name(verbose: u8, quiet: u8) -> &'static str {
    let net = i16::from(verbose) - i16::from(quiet);
    match net {
        i16::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        3..=i16::MAX => "trace",
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mapty_lib={level},mapty={level},mapty_tui={level}")))
}

/// Stderr logging for the command line tool. `RUST_LOG` overrides the flags.
pub fn init_cli_logging(verbose: u8, quiet: u8) {
    let level = level_name(verbose, quiet);
    let show_src = matches!(level, "debug" | "trace");

    // A second init (e.g. in tests) is harmless.
    let _ = fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .try_init();
}

/// Appends to `path`; the terminal belongs to the UI while it runs.
/// # Errors
/// I/O error if the log file cannot be opened.
pub fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = fmt()
        .with_env_filter(filter_for("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .try_init();
    Ok(())
}
