use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::{FoodOilConfig, CONFIG_FILE_NAME};
use crate::errors::{Error, Result};

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and check that its limits resolve.
pub fn parse_and_validate_config(contents: &str) -> Result<FoodOilConfig> {
    let config = toml::from_str::<FoodOilConfig>(contents)?;
    config.limits()?;
    Ok(config)
}

/// Load a config file the user named explicitly; every failure is an error.
pub fn load_config_from(path: &Path) -> Result<FoodOilConfig> {
    let contents = read_config_file(path).map_err(|e| {
        Error::config_at(format!("cannot read {}: {}", path.display(), e), path)
    })?;
    parse_and_validate_config(&contents)
        .map_err(|e| Error::config_at(format!("{}: {}", path.display(), e), path))
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<FoodOilConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("foodoiliq").join("config.toml"))
}

/// Search `start` and its ancestors, then the user config directory.
pub fn discover_config(start: PathBuf) -> FoodOilConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .chain(user_config_path())
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FoodOilConfig::default()
        })
}

pub fn load_config() -> FoodOilConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            FoodOilConfig::default()
        }
    }
}
