//! Configuration file loading
//!
//! Values come from, in increasing priority: built-in defaults, the user
//! config (`<config dir>/notice-check/config.toml`), a project
//! `notice-check.toml` in the working directory (or `--config`), and finally
//! command-line flags.

use notice_check_core::{NoticeCheck, TextEncoding};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_CONFIG_FILE: &str = "notice-check.toml";
const APP_DIR: &str = "notice-check";
const USER_CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Every key is optional; unset keys fall through to the next layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub notice_file: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub expected_file_name: Option<String>,
    pub encoding: Option<TextEncoding>,
    pub max_diff_lines: Option<usize>,
}

impl Config {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// Load the layered config
    ///
    /// An explicit path must exist. Otherwise the project file in `cwd` wins
    /// over the user file, and missing files are skipped.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_with_user_dir(explicit, cwd, dirs::config_dir())
    }

    fn load_with_user_dir(
        explicit: Option<&Path>,
        cwd: &Path,
        user_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let user_file = user_dir.map(|d| d.join(APP_DIR).join(USER_CONFIG_FILE));
        let user = match user_file {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        let project = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = cwd.join(PROJECT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(user.merged(project))
    }

    /// Overlay `other` on top of `self`
    pub fn merged(self, other: Config) -> Config {
        Config {
            notice_file: other.notice_file.or(self.notice_file),
            build_dir: other.build_dir.or(self.build_dir),
            expected_file_name: other.expected_file_name.or(self.expected_file_name),
            encoding: other.encoding.or(self.encoding),
            max_diff_lines: other.max_diff_lines.or(self.max_diff_lines),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding.unwrap_or_default()
    }

    pub fn to_check(&self) -> NoticeCheck {
        let mut check = match &self.notice_file {
            Some(path) => NoticeCheck::new(path),
            None => NoticeCheck::default(),
        };
        if let Some(dir) = &self.build_dir {
            check = check.with_build_dir(dir);
        }
        if let Some(name) = &self.expected_file_name {
            check = check.with_expected_file_name(name);
        }
        check
            .with_encoding(self.encoding())
            .with_max_diff_lines(self.max_diff_lines)
    }
}
