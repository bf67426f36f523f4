//! # Configuration Loader
//!
//! Reads `key = value` configuration files. Everything after a `#` is a
//! comment and whitespace is insignificant, so `model.directory = assets # x`
//! defines `model.directory` as `assets`.
//!
//! ## Usage
//!
//! ```no_run
//! use obj2scene::config::Config;
//!
//! let config = Config::load("obj2scene.cfg").unwrap();
//! let models = config.get_var("model.directory").unwrap();
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Configuration written when the requested file does not exist
pub const DEFAULT_CONFIG: &str = "model.directory = .\ntexture.directory = .\n";

/// Parsed configuration variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    filename: String,
    vars: BTreeMap<String, String>,
}

impl Config {
    /// Loads a configuration file
    ///
    /// A missing file is created with [`DEFAULT_CONFIG`] and read again.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Unable to load {}, writing default configuration",
                    path.display()
                );
                fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;
                fs::read_to_string(path).map_err(io_error)?
            }
            Err(err) => return Err(io_error(err)),
        };

        let config = Self::parse(&path.display().to_string(), &contents);
        log::info!("Loaded {}", path.display());
        Ok(config)
    }

    /// Parses configuration text; `filename` is only used in error messages
    pub fn parse(filename: &str, contents: &str) -> Self {
        let mut vars = BTreeMap::new();
        for line in contents.lines() {
            let line = line.replace('\r', "");
            if line.starts_with('=') {
                log::warn!("Invalid config line: {line}");
                continue;
            }

            let mut key = String::new();
            let mut value = String::new();
            let mut found_equals = false;
            for c in line.chars() {
                match c {
                    '#' => break,
                    '=' => found_equals = true,
                    ' ' | '\t' => {}
                    c if found_equals => value.push(c),
                    c => key.push(c),
                }
            }

            if !key.is_empty() {
                vars.entry(key).or_insert(value);
            }
        }

        Self {
            filename: filename.to_string(),
            vars,
        }
    }

    pub fn has_var(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Looks up a variable; an undefined key is an error, never a default
    pub fn get_var(&self, key: &str) -> Result<&str, ConfigError> {
        self.vars
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                key: key.to_string(),
                file: self.filename.clone(),
            })
    }

    pub fn get_int(&self, key: &str) -> Result<i32, ConfigError> {
        self.parse_var(key, "integer")
    }

    pub fn get_float(&self, key: &str) -> Result<f32, ConfigError> {
        self.parse_var(key, "float")
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get_var(key)? {
            "true" | "True" | "1" => Ok(true),
            "false" | "False" | "0" => Ok(false),
            value => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                kind: "bool",
            }),
        }
    }

    fn parse_var<T: std::str::FromStr>(
        &self,
        key: &str,
        kind: &'static str,
    ) -> Result<T, ConfigError> {
        let value = self.get_var(key)?;
        value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            kind,
        })
    }
}
