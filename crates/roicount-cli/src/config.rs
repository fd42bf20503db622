//! Configuration discovery for the `roicount` binary.
//!
//! A `--config` path is always honoured, and a missing file there is an
//! error. Without it the first existing file among [`implicit_locations`]
//! is used; if there is none the library defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, trace};
use thiserror::Error;

use roicount::{RoiCountError, config::AppConfig};

/// Configuration file looked up relative to the working directory
const LOCAL_CONFIG: &str = "roicount/config.toml";

/// Errors raised while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file `{}` does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot read configuration file `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid configuration file `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<ConfigError> for RoiCountError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { path, source } => RoiCountError::Read { path, source },
            other => RoiCountError::Io(io::Error::other(other.to_string())),
        }
    }
}

/// Loads the configuration for one run.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if `explicit_path` does not exist,
/// and a read or parse error for a file that exists but is unusable.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, RoiCountError> {
    let path = match explicit_path {
        Some(path) => path.as_ref().to_path_buf(),
        None => match discover(implicit_locations()) {
            Some(path) => path,
            None => {
                debug!("No configuration file found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    info!(path = path.display().to_string(); "Loading configuration");
    Ok(read_config(&path)?)
}

/// Returns the places searched when no path is given, in lookup order.
///
/// The working directory comes first, then the platform configuration
/// directory when one can be determined.
pub fn implicit_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("org", "roicount", "roicount") {
        Some(dirs) => locations.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform configuration directory"),
    }
    locations
}

/// Returns the first of `locations` that is a file
fn discover(locations: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    locations.into_iter().find(|path| {
        let found = path.is_file();
        trace!(path = path.display().to_string(), found; "Configuration lookup");
        found
    })
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::MissingFile(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
