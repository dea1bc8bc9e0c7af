use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;

use crate::config::ConfigManager;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Initialize the logging system
///
/// Console output goes to stderr so it never mixes with the status lines on
/// stdout. The level is controlled by `RUST_LOG` and defaults to `warn`:
/// - `RUST_LOG=info` - also report branch creation and repository init
/// - `RUST_LOG=debug` - every git command line
///
/// Each completed push is additionally appended to `git-quickpush.log` in the
/// config directory (see [`ConfigManager::log_file_path`]).
pub fn init_logger() -> Result<()> {
    ConfigManager::ensure_config_dir()?;

    let default_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(default_level)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok(); // Ignore error if logger is already initialized

    rotate_log_if_needed()?;

    Ok(())
}

/// Append a timestamped line to the log file
pub fn log_to_file(message: &str) -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;

    Ok(())
}

/// Rotate log file if it exceeds 10MB
pub fn rotate_log_if_needed() -> Result<()> {
    let log_path = ConfigManager::log_file_path()?;

    if log_path.exists() && std::fs::metadata(&log_path)?.len() > MAX_LOG_SIZE {
        let old_log_path = log_path.with_extension("log.old");

        if old_log_path.exists() {
            std::fs::remove_file(&old_log_path)?;
        }
        std::fs::rename(&log_path, &old_log_path)?;

        log::info!("Log file rotated to {}", old_log_path.display());
    }

    Ok(())
}

#[cfg(test)]
#[cfg(target_os = "linux")]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use tempfile::TempDir;

    fn with_config_home<F: FnOnce()>(f: F) {
        let temp = TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", temp.path());
        f();
        std::env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    #[serial]
    fn test_init_logger_succeeds() {
        with_config_home(|| {
            assert!(init_logger().is_ok());
            assert!(ConfigManager::config_dir().unwrap().is_dir());
        });
    }

    #[test]
    #[serial]
    fn test_log_to_file() {
        with_config_home(|| {
            ConfigManager::ensure_config_dir().unwrap();
            log_to_file("Pushed 'main' to 'origin'").unwrap();

            let log_path = ConfigManager::log_file_path().unwrap();
            let contents = std::fs::read_to_string(&log_path).unwrap();
            assert!(contents.contains("Pushed 'main' to 'origin'"));
        });
    }

    #[test]
    #[serial]
    fn test_rotate_log_creates_backup() {
        with_config_home(|| {
            ConfigManager::ensure_config_dir().unwrap();
            let log_path = ConfigManager::log_file_path().unwrap();
            let mut file = File::create(&log_path).unwrap();
            file.write_all(&vec![b'a'; 11 * 1024 * 1024]).unwrap();
            drop(file);

            rotate_log_if_needed().unwrap();

            assert!(log_path.with_extension("log.old").exists());
            assert!(!log_path.exists());
        });
    }
}
