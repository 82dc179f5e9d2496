use std::{fs, io, path::Path};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Use `RUST_LOG` if it's set, otherwise the given default.
fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file in `dir`, since the terminal belongs to the UI. Keep the
/// guard around until exit so buffered lines get written.
pub fn init_file(dir: &Path) -> io::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir,
        "signup.log",
    ));

    tracing_subscriber::registry()
        .with(filter("info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

/// Log to stderr, for when there's no UI. Quieter by default, since the
/// user sees this directly.
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(filter("warn"))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
