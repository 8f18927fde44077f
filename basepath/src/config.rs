use std::borrow::Cow;
use std::env;
use std::fmt;
use std::path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const SEPARATORS_ENV: &str = "BASEPATH_SEPARATORS";
pub const MAX_FILE_SIZE_ENV: &str = "BASEPATH_MAX_FILE_SIZE";

const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024;

/// Which characters delimit segments of an untrusted relative path.
///
/// Forward slash and the platform separator are always delimiters, so `Forward`
/// only differs from `ForwardAndBackslash` where the platform separator is `/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separators {
    Forward,
    ForwardAndBackslash,
}

impl Separators {
    /// Separator every recognized variant is folded into before scanning.
    pub const CANONICAL: char = '/';

    pub fn native() -> Self {
        if cfg!(windows) {
            Self::ForwardAndBackslash
        } else {
            Self::Forward
        }
    }

    fn folds_backslash(self) -> bool {
        self == Self::ForwardAndBackslash || path::MAIN_SEPARATOR == '\\'
    }

    pub fn is_separator(self, ch: char) -> bool {
        ch == '/' || (ch == '\\' && self.folds_backslash())
    }

    pub fn normalize(self, relative_path: &str) -> Cow<'_, str> {
        if self.folds_backslash() && relative_path.contains('\\') {
            Cow::Owned(relative_path.replace('\\', "/"))
        } else {
            Cow::Borrowed(relative_path)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::ForwardAndBackslash => "forward-and-backslash",
        }
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for Separators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Separators {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "forward-and-backslash" => Ok(Self::ForwardAndBackslash),
            "native" => Ok(Self::native()),
            _ => Err(ConfigError::UnknownSeparators(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasepathConfig {
    pub separators: Separators,
    pub max_file_size: u64,
}

impl Default for BasepathConfig {
    fn default() -> Self {
        Self {
            separators: Separators::native(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl BasepathConfig {
    /// Reads `BASEPATH_SEPARATORS` and `BASEPATH_MAX_FILE_SIZE`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(SEPARATORS_ENV) {
            config.separators = raw.parse()?;
        }
        if let Some(raw) = lookup(MAX_FILE_SIZE_ENV) {
            config.max_file_size = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxFileSize(raw.clone()))?;
        }
        Ok(config)
    }
}
