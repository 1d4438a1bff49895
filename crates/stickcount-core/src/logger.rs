//! Process-wide logging setup.
//!
//! [`init_with_level`] installs a stderr logger that prefixes each record
//! with the seconds since installation and the pipeline stage that emitted
//! it (`hough`, `cluster`, `evolve`, `calib`):
//!
//! ```text
//! [  1.204s  INFO evolve] generation 12: best 0.8750
//! ```
//!
//! [`init_from_env`] reads the level from `STICKCOUNT_LOG`. With the
//! `tracing` feature, [`init_tracing`] installs a `tracing` subscriber
//! instead, which also reports span timings.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV: &str = "STICKCOUNT_LOG";

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            stage(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Short stage name for a log target.
///
/// `stickcount_hough::voter` becomes `hough`; targets outside the
/// workspace keep their top-level module name.
pub fn stage(target: &str) -> &str {
    let root = target.split("::").next().unwrap_or(target);
    match root.strip_prefix("stickcount_") {
        Some(stage) if !stage.is_empty() => stage,
        _ => root,
    }
}

/// Level named by `value`, or `default` when it is unset or unparsable.
pub fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(default)
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Install the stage logger with the provided level filter.
///
/// Only the first call installs; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StageLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install the stage logger at the level in [`LOG_ENV`] (default `info`).
pub fn init_from_env() -> Result<LevelFilter, log::SetLoggerError> {
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref(), LevelFilter::Info);
    init_with_level(level)?;
    Ok(level)
}

/// Install a `tracing` subscriber honouring `RUST_LOG` (default `info`).
///
/// Span close events carry timings for the instrumented voting, clustering
/// and search stages. `log` records from the workspace crates are bridged
/// by the subscriber.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
