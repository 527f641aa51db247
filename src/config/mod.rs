//! Configuration file handling and token resolution.
//!
//! The configuration lives in a small JSON document, by default at
//! `$HOME/.config/dca/config.json`. All file-system access goes through
//! `cap-std` directory handles opened on the file's parent.

use crate::chat::adapters::{HttpTransportConfig, http::DEFAULT_API_BASE_URL};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
#[cfg(unix)]
use cap_std::fs::{OpenOptionsExt, Permissions, PermissionsExt};
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted for the token when no flag is given.
pub const TOKEN_ENV: &str = "DCA_TOKEN";

const CONFIG_DIR: [&str; 2] = [".config", "dca"];
const CONFIG_FILE: &str = "config.json";
const MASK_VISIBLE: usize = 4;
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o600;

/// Errors returned while loading, saving, or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("cannot determine the home directory; pass --config explicitly")]
    NoHomeDirectory,

    /// A path is not valid UTF-8 or has no file name.
    #[error("invalid configuration path: {reason}")]
    InvalidPath {
        /// Why the path was refused.
        reason: String,
    },

    /// The configuration file does not exist.
    #[error("config file not found at {path}. Run 'dca config init' to create it")]
    NotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// Reading or writing the configuration failed.
    #[error("config file access failed at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON of the expected shape.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        /// Path being parsed.
        path: Utf8PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The configuration could not be rendered as JSON.
    #[error("failed to serialise config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No token was supplied by flag, environment, or file.
    #[error("no token configured; pass --token, set {TOKEN_ENV}, or run 'dca config init'")]
    MissingToken,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

const fn default_require_approval() -> bool {
    true
}

/// Persisted client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Account token sent as the `Authorization` header.
    #[serde(default, alias = "bot_token")]
    pub user_token: String,

    /// Whether mutating commands ask for confirmation first.
    #[serde(default = "default_require_approval")]
    pub require_approval: bool,

    /// Overrides the REST API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Overrides the per-request timeout, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_token: String::new(),
            require_approval: default_require_approval(),
            api_base_url: None,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Creates a configuration holding `user_token`.
    #[must_use]
    pub fn new(user_token: impl Into<String>, require_approval: bool) -> Self {
        Self {
            user_token: user_token.into(),
            require_approval,
            ..Self::default()
        }
    }

    /// Builds transport settings for `token` using any configured overrides.
    #[must_use]
    pub fn transport_config(&self, token: impl Into<String>) -> HttpTransportConfig {
        let mut settings = HttpTransportConfig::new(token).with_base_url(
            self.api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        );
        if let Some(secs) = self.request_timeout_secs {
            settings = settings.with_timeout(Duration::from_secs(secs));
        }
        settings
    }
}

/// Returns `$HOME/.config/dca/config.json`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when no home directory is known
/// and [`ConfigError::InvalidPath`] when it is not valid UTF-8.
pub fn default_config_path() -> ConfigResult<Utf8PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    let mut path = Utf8PathBuf::try_from(home).map_err(|err| ConfigError::InvalidPath {
        reason: format!("home directory is not valid UTF-8: {err}"),
    })?;
    path.extend(CONFIG_DIR);
    path.push(CONFIG_FILE);
    Ok(path)
}

fn open_parent_dir(path: &Utf8Path) -> ConfigResult<(Dir, &str)> {
    let file_name = path.file_name().ok_or_else(|| ConfigError::InvalidPath {
        reason: format!("{path} does not name a file"),
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            }
        }
    })?;
    Ok((dir, file_name))
}

/// Reads the configuration at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file is missing,
/// [`ConfigError::Io`] when it cannot be read, and [`ConfigError::Parse`]
/// when it is not valid configuration JSON.
pub fn load(path: &Utf8Path) -> ConfigResult<AppConfig> {
    let (dir, file_name) = open_parent_dir(path)?;
    let contents = match dir.read_to_string(file_name) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the configuration at `path`, treating a missing file as absent.
///
/// # Errors
///
/// Propagates every [`load`] failure other than [`ConfigError::NotFound`].
pub fn load_optional(path: &Utf8Path) -> ConfigResult<Option<AppConfig>> {
    match load(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Writes `config` to `path` as indented JSON, creating parent directories.
///
/// On Unix the file is created with mode `0600`, and an existing file is
/// narrowed to that mode before the new contents are written.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] when rendering fails and
/// [`ConfigError::Io`] when the directory or file cannot be written.
pub fn save(config: &AppConfig, path: &Utf8Path) -> ConfigResult<()> {
    let rendered = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|source| {
            ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            }
        })?;
    }
    let (dir, file_name) = open_parent_dir(path)?;
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(CONFIG_FILE_MODE);
    let mut file = dir.open_with(file_name, &options).map_err(io_error)?;

    // The creation mode only applies to new files.
    #[cfg(unix)]
    file.set_permissions(Permissions::from_mode(CONFIG_FILE_MODE))
        .map_err(io_error)?;
    file.write_all(rendered.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the token to use: the flag, then the environment, then the file.
///
/// Blank values are treated as absent.
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] when every source is blank.
///
/// # Examples
///
/// ```
/// use dca::config::{AppConfig, resolve_token};
///
/// let stored = AppConfig::new("from-file", true);
/// let token = resolve_token(None, Some("from-env"), Some(&stored)).expect("token");
/// assert_eq!(token, "from-env");
/// ```
pub fn resolve_token(
    flag: Option<&str>,
    env: Option<&str>,
    config: Option<&AppConfig>,
) -> ConfigResult<String> {
    non_blank(flag)
        .or_else(|| non_blank(env))
        .or_else(|| non_blank(config.map(|c| c.user_token.as_str())))
        .map(str::to_owned)
        .ok_or(ConfigError::MissingToken)
}

/// Masks a token for display, keeping four characters at each end.
///
/// Tokens of eight characters or fewer are returned unchanged.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let length = token.chars().count();
    if length <= MASK_VISIBLE * 2 {
        return token.to_owned();
    }
    let head: String = token.chars().take(MASK_VISIBLE).collect();
    let tail: String = token.chars().skip(length - MASK_VISIBLE).collect();
    format!("{head}...{tail}")
}
