//! Tracing initialization
//!
//! The console shows warnings, or everything with `verbose`. The log file
//! `solar_analysis.log` is filtered by `SOLAR_LOG`
//! (e.g. `SOLAR_LOG=solar_app=debug`), falling back to `info`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::{warn, Subscriber};
use tracing_subscriber::{filter::LevelFilter, fmt, fmt::MakeWriter, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "SOLAR_LOG";
pub const LOG_FILE_NAME: &str = "solar_analysis.log";

static INIT: OnceLock<Option<PathBuf>> = OnceLock::new();

fn open_log_file(log_dir: &Path) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    }
}

fn file_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Console layer and optional file layer, each with its own filter
fn build_subscriber<W>(
    console: W,
    verbose: bool,
    file: Option<(File, EnvFilter)>,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = file.map(|(file, filter)| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file))
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(console)
                .with_target(false)
                .with_filter(console_level(verbose)),
        )
        .with(file_layer)
}

/// Initialize logging. Safe to call more than once; later calls return the
/// result of the first.
///
/// Returns the log file path when file logging is active.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Option<PathBuf> {
    INIT.get_or_init(|| {
        let (file, log_path, file_error) = match log_dir.map(open_log_file) {
            Some(Ok((file, path))) => (Some((file, file_filter())), Some(path), None),
            Some(Err(e)) => (None, None, Some(e)),
            None => (None, None, None),
        };

        if build_subscriber(std::io::stderr, verbose, file)
            .try_init()
            .is_err()
        {
            // Another subscriber (e.g. a test harness) is already global
            return None;
        }

        if let Some(e) = file_error {
            warn!(error = %e, "Cannot write to log file. Using console logging only");
        }
        log_path
    })
    .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    fn emit_all_levels(console: &Captured, verbose: bool, file: Option<(File, EnvFilter)>) {
        let subscriber = build_subscriber(console.clone(), verbose, file);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("roof detail");
            tracing::info!("roof progress");
            tracing::warn!("roof clamped");
        });
    }

    #[test]
    fn test_verbose_console_shows_debug() {
        let console = Captured::default();
        let dir = tempdir().unwrap();
        let (file, path) = open_log_file(dir.path()).unwrap();
        emit_all_levels(&console, true, Some((file, EnvFilter::new("info"))));

        let shown = console.text();
        assert!(shown.contains("roof detail"));
        assert!(shown.contains("roof progress"));

        let logged = fs::read_to_string(path).unwrap();
        assert!(!logged.contains("roof detail"));
        assert!(logged.contains("roof progress"));
    }

    #[test]
    fn test_quiet_console_shows_warnings_only() {
        let console = Captured::default();
        emit_all_levels(&console, false, None);

        let shown = console.text();
        assert!(!shown.contains("roof detail"));
        assert!(!shown.contains("roof progress"));
        assert!(shown.contains("roof clamped"));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let (_file, path) = open_log_file(&log_dir).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempdir().unwrap();
        let first = init_logging(Some(dir.path()), false);
        let second = init_logging(None, true);
        assert_eq!(first, second);
    }
}
