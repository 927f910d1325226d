//! Configuration file lookup
//!
//! The configuration file is plain text with `[section]` headers and
//! `key = value` lines. Blank lines and `#` comments are ignored.
//!
//! ```text
//! # staging cluster
//! [minio-staging]
//! endpoint_url = http://localhost:9000
//! access_key_id = minioadmin
//! secret_access_key = minioadmin
//! ```
//!
//! A lookup selects the first section whose name starts with the requested
//! prefix. The file is read once per lookup and never cached.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "KOT_CONFIG_DIR";

/// File name of the configuration file inside the configuration directory
const CONFIG_FILE_NAME: &str = "config";

/// The key/value pairs of one configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    name: String,
    values: HashMap<String, String>,
}

impl ConfigSection {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Full name of the section, as written between the brackets
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value, replacing any earlier one for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Default location of the configuration file
///
/// `$KOT_CONFIG_DIR/config` when the variable is set, otherwise
/// `<config dir>/kot/config` (e.g. `~/.config/kot/config` on Linux).
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
    Ok(config_dir.join("kot").join(CONFIG_FILE_NAME))
}

/// Return the first section of `path` whose name starts with `section_prefix`
pub fn lookup(section_prefix: &str, path: &Path) -> Result<ConfigSection> {
    let file = File::open(path).map_err(|source| Error::ConfigNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut selected: Option<ConfigSection> = None;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(line) {
            if selected.is_some() {
                break;
            }
            if name.starts_with(section_prefix) {
                selected = Some(ConfigSection::new(name));
            }
            continue;
        }

        let Some(section) = selected.as_mut() else {
            continue;
        };

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                section.insert(key.trim(), value.trim());
            }
            _ => {
                return Err(Error::MalformedConfigLine {
                    path: path.to_path_buf(),
                    line_no: index + 1,
                    line: line.to_string(),
                });
            }
        }
    }

    let section = selected.ok_or_else(|| Error::NoMatchingSection {
        prefix: section_prefix.to_string(),
        path: path.to_path_buf(),
    })?;
    tracing::debug!(section = section.name(), path = %path.display(), "config section selected");

    Ok(section)
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}
