use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::Dispatch;
use tracing_appender::non_blocking;
use tracing_subscriber::{
    filter::LevelFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Layer,
};

/// Where and under which name the log file is written.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_prefix: String,
}

impl LogConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_prefix: "bot".to_string(),
        }
    }
}

/// Keeps the non-blocking writers flushing. Logging stops once this is dropped.
pub struct LogGuards {
    _file: tracing_appender::non_blocking::WorkerGuard,
    _console: tracing_appender::non_blocking::WorkerGuard,
}

/// An explicitly constructed logging sink. Nothing is installed globally;
/// holders run their work under `dispatch()`.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Single-writer logger without timestamps or colors, INFO and above.
    /// Used where output has to be inspected, e.g. tests.
    pub fn with_writer<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_target(false)
                .with_writer(writer)
                .with_filter(LevelFilter::INFO),
        );

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

/// Builds the file + console logger.
/// The file gets INFO and above without colors; the console follows
/// `RUST_LOG` (default `info`) and writes to stderr so command output on
/// stdout stays clean.
pub fn init_logger(config: &LogConfig) -> io::Result<(Logger, LogGuards)> {
    // 1) file appender
    let (file_writer, file_guard) = daily_file_appender(&config.dir, &config.file_prefix)?;

    // 2) console, non-blocking as well
    let (console_writer, console_guard) = non_blocking(io::stderr());

    // 3) EnvFilter
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 4) layers
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(LevelFilter::INFO),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(console_writer)
                .with_filter(console_filter),
        );

    Ok((
        Logger {
            dispatch: Dispatch::new(subscriber),
        },
        LogGuards {
            _file: file_guard,
            _console: console_guard,
        },
    ))
}

/// Opens `{dir}/{prefix}.{YYYY-MM-DD}.log` for appending, creating `dir` if
/// needed.
fn daily_file_appender(
    dir: &Path,
    prefix: &str,
) -> io::Result<(
    non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    fs::create_dir_all(dir)?;

    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = dir.join(log_file_name(prefix, &date));

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Ok(non_blocking(file))
}

fn log_file_name(prefix: &str, date: &str) -> String {
    format!("{prefix}.{date}.log")
}

#[cfg(test)]
pub(crate) mod capture {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink shared between a `Logger` and the test reading it.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
