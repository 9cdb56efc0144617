use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Initialise logging. Without `debug` the level is fixed at `info`; with it
/// the default is `debug` and `RUST_LOG` may override it.
///
/// When `log_file` is given, output goes there instead of stderr so it
/// cannot draw over the terminal UI. If the file cannot be opened, logging
/// is discarded rather than failing startup. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init(debug: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = log_file else {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return None;
    };

    match file_appender(path) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
            Some(guard)
        }
        Err(e) => {
            // Stderr belongs to the terminal UI, so say it once, up front.
            eprintln!("Warning: logging disabled, cannot open {}: {e}", path.display());
            let _ = builder.with_writer(std::io::sink).try_init();
            None
        }
    }
}

/// Opens `path` for appending, creating its directory if needed.
fn file_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "tourguide.log".to_string(), |n| n.to_string_lossy().into_owned());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn appender_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("tourguide.log");

        file_appender(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn unopenable_log_file_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tourguide.log");
        fs::create_dir(&path).unwrap();

        assert!(file_appender(&path).is_err());
    }
}
