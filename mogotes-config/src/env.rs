// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::path::Path;

/// Prefix shared by every Mogotes variable
pub const ENV_PREFIX: &str = "MOGOTES_";

/// Collects `MOGOTES_*` variables from the process and `.env` files.
///
/// Keys are kept verbatim (`MOGOTES_API_KEY`). Nothing is ever written
/// back into the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    vars: HashMap<String, String>,
}

impl EnvLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader over the current process environment.
    ///
    /// Unrelated variables are skipped whatever their encoding; a
    /// `MOGOTES_*` variable that is not valid UTF-8 is an error.
    pub fn from_process() -> Result<Self> {
        Self::from_os_vars(env::vars_os())
    }

    /// Loader over raw OS key/value pairs
    pub fn from_os_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut loaded = HashMap::new();
        for (key, value) in vars {
            if !key.as_encoded_bytes().starts_with(ENV_PREFIX.as_bytes()) {
                continue;
            }
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    loaded.insert(key, value);
                }
                (key, value) => {
                    return Err(ConfigError::InvalidValue {
                        key: lossy(key),
                        value: lossy(value),
                        expected: "valid UTF-8",
                    });
                }
            }
        }
        Ok(Self { vars: loaded })
    }

    /// Loader over explicit key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self { vars }
    }

    /// Loader over a `.env` file, with process variables taking precedence.
    ///
    /// With no path, `.env` is searched for from the current directory
    /// upwards and a missing file is not an error.
    pub fn from_dotenv(path: Option<&Path>) -> Result<Self> {
        let iter = match path {
            Some(path) => dotenvy::from_path_iter(path)
                .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?,
            None => match dotenvy::dotenv_iter() {
                Ok(iter) => iter,
                Err(e) if e.not_found() => return Self::from_process(),
                Err(e) => return Err(ConfigError::LoadError(e.to_string())),
            },
        };

        let mut file_vars = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::ParseError(e.to_string()))?;
            file_vars.push((key, value));
        }

        let mut loader = Self::from_vars(file_vars);
        loader.merge(Self::from_process()?);
        Ok(loader)
    }

    /// Overlay another loader; its values win
    pub fn merge(&mut self, other: EnvLoader) {
        self.vars.extend(other.vars);
    }

    /// Raw value of a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of a variable, with blank values treated as unset
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a signed integer variable
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.parse_with(key, "an integer", |value| value.parse().ok())
    }

    /// Parse an unsigned integer variable
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.parse_with(key, "a non-negative integer", |value| value.parse().ok())
    }

    /// Parse a boolean variable (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`)
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.parse_with(key, "a boolean", parse_bool)
    }

    /// Number of collected variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables were collected
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn parse_with<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(raw) = self.get_non_empty(key) else {
            return Ok(None);
        };

        parse(raw.trim())
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected,
            })
    }
}

fn lossy(raw: std::result::Result<String, OsString>) -> String {
    raw.unwrap_or_else(|os| os.to_string_lossy().into_owned())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
