use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "git-quickpush";

/// Credential file used when neither `--config` nor the settings name one.
pub const DEFAULT_CREDENTIALS_FILE: &str = "Git_Data/config.json";

/// Branch pushed when neither `--branch` nor the settings name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/git-quickpush or ~/.config/git-quickpush
    /// - macOS: ~/Library/Application Support/git-quickpush
    /// - Windows: %APPDATA%\git-quickpush
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join(APP_DIR))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join(APP_DIR))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join("Library").join("Application Support").join(APP_DIR))
        }

        #[cfg(target_os = "windows")]
        {
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join(APP_DIR))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".git-quickpush"))
        }
    }

    /// Get the settings file path (config.toml)
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("git-quickpush.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// User defaults stored in `config.toml`.
///
/// Unlike the credential file, this file is written deliberately by the user,
/// so a broken one is reported rather than ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Branch created, checked out and pushed
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Credential file, relative to the repository root unless absolute
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_FILE)
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_branch: default_branch(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl Settings {
    /// Load settings from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&ConfigManager::settings_path()?)
    }

    /// Load settings from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Resolve the credential file against the repository root
    pub fn credentials_path(&self, repo_root: &Path) -> PathBuf {
        if self.credentials_file.is_absolute() {
            self.credentials_file.clone()
        } else {
            repo_root.join(&self.credentials_file)
        }
    }
}
