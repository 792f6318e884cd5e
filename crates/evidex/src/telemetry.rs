//! Tracing subscriber setup for binaries and tests that embed the engine.
//!
//! The engine only emits events; installing a subscriber is left to the
//! caller. These helpers give the usual setup: engine crates at `debug` when
//! verbose, everything else at `warn`, and [`LOG_ENV`] overriding both.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Environment variable holding an `EnvFilter` directive, e.g. `evidex=debug`.
pub const LOG_ENV: &str = "EVIDEX_LOG";

const ENGINE_TARGETS: [&str; 6] = [
    "evidex",
    "evidex_config",
    "evidex_core",
    "evidex_extract",
    "evidex_records",
    "evidex_stats",
];

/// Filter directive used when [`LOG_ENV`] is unset.
#[must_use]
pub fn default_directive(verbose: bool) -> String {
    if !verbose {
        return "warn".to_string();
    }
    ENGINE_TARGETS
        .iter()
        .fold("warn".to_string(), |directive, target| {
            format!("{directive},{target}=debug")
        })
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install a global `fmt` subscriber writing to stderr, so stdout stays free
/// for report output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Like [`init_tracing`], writing plain text (no ANSI colors) to `writer`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing_with_writer<W>(verbose: bool, writer: W) -> anyhow::Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
