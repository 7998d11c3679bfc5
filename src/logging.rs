//! Logging setup for the three apps.

use crate::config::AppPaths;
use std::any::Any;
use std::fs::OpenOptions;
use std::io;
use std::panic::{self, Location};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Append log lines to `path`, creating it if needed.
///
/// Fails if the file cannot be opened; a second call in the same process is a no-op.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Log to stderr (dashboard console).
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}

/// Start logging before anything else can fail.
///
/// Logs go to `log_name` in the app directory; when that file cannot be
/// opened they go to stderr instead. Returns the log file in use, if any.
pub fn init_app_logging(data_dir: Option<&Path>, log_name: &str) -> Option<PathBuf> {
    let opened = AppPaths::resolve(data_dir, log_name)
        .map_err(|e| e.to_string())
        .and_then(|paths| {
            std::fs::create_dir_all(&paths.base_dir).map_err(|e| e.to_string())?;
            init_file_logging(&paths.log_file).map_err(|e| e.to_string())?;
            Ok(paths.log_file)
        });
    match opened {
        Ok(path) => Some(path),
        Err(reason) => {
            init_stderr_logging();
            warn!("Could not open {} ({}), logging to stderr", log_name, reason);
            None
        }
    }
}

/// Log panics before the process aborts, then hand the message to `notify`.
///
/// The previous hook still runs, so the message also reaches stderr.
pub fn install_panic_hook<F>(notify: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let message = describe_panic(info.payload(), info.location());
        error!("Unhandled panic: {}", message);
        previous(info);
        notify(&message);
    }));
}

fn describe_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    match location {
        Some(at) => format!("{} at {}:{}", text, at.file(), at.line()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_log.txt");
        init_file_logging(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_path_fails() {
        assert!(init_file_logging(Path::new("/no/such/dir/log.txt")).is_err());
    }

    #[test]
    fn test_app_logging_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("app");
        let log = init_app_logging(Some(app_dir.as_path()), "tracker_log.txt");
        assert_eq!(log, Some(dir.path().join("app").join("tracker_log.txt")));
        assert!(dir.path().join("app").join("tracker_log.txt").exists());
    }

    #[test]
    fn test_app_logging_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, "x").unwrap();
        let below_file = file.join("sub");
        assert_eq!(init_app_logging(Some(below_file.as_path()), "log.txt"), None);
    }

    #[test]
    fn test_describe_panic() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(describe_panic(text.as_ref(), None), "boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bad row 3"));
        assert_eq!(describe_panic(owned.as_ref(), None), "bad row 3");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(describe_panic(other.as_ref(), None), "unknown panic");
        let here = Location::caller();
        assert!(describe_panic(text.as_ref(), Some(here)).starts_with("boom at "));
    }
}
