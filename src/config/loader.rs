use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::validation::validate_config_result;
use super::MetaclassifyConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".metaclassify.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate a TOML document.
pub fn parse_config(contents: &str) -> Result<MetaclassifyConfig> {
    let config = toml::from_str::<MetaclassifyConfig>(contents)
        .map_err(|e| Error::configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    validate_config_result(&config)?;
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<MetaclassifyConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
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

/// Nearest config file at or above `start`, or the defaults.
pub fn load_config_from(start: PathBuf) -> MetaclassifyConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            MetaclassifyConfig::default()
        })
}

/// Search upwards from the current directory.
pub fn load_config() -> MetaclassifyConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            MetaclassifyConfig::default()
        }
    }
}

/// Load an explicitly requested file. Unlike discovery, a missing or
/// invalid file is an error.
pub fn load_config_file(path: &Path) -> Result<MetaclassifyConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    parse_config(&contents)
}
