//! Option resolution for docker-machine
//!
//! Merges the built-in defaults, an optional YAML user config and the
//! command-line driver flags into one ordered [`OptionSet`]. Only flags in the
//! active driver's namespace (`--<driver>-...`) and `--driver` itself survive.

pub mod drivers;

use crate::error::{Result, SwarmError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust::{Yaml, YamlLoader};

pub const DEFAULT_DRIVER: &str = "amazonec2";
pub const DRIVER_FLAG: &str = "--driver";

/// Placeholder meaning "not set" in user config files
const NONE_PLACEHOLDER: &str = "none";

const SECRET_SUFFIXES: &[&str] = &[
    "-access-key",
    "-secret-key",
    "-session-token",
    "-access-token",
];

/// A single flag passed to docker-machine. Switches have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineOption {
    pub flag: String,
    pub value: Option<String>,
}

impl MachineOption {
    pub fn value(flag: &str, value: &str) -> Self {
        Self {
            flag: flag.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn switch(flag: &str) -> Self {
        Self {
            flag: flag.to_string(),
            value: None,
        }
    }

    fn is_secret(&self) -> bool {
        SECRET_SUFFIXES.iter().any(|s| self.flag.ends_with(s))
    }
}

/// Ordered, deduplicated flags for one docker-machine invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<MachineOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.entries.iter().any(|e| e.flag == flag)
    }

    /// Add an option unless its flag is already present. Returns whether it was added.
    pub fn insert(&mut self, option: MachineOption) -> bool {
        if self.contains(&option.flag) {
            return false;
        }
        self.entries.push(option);
        true
    }

    pub fn get(&self, flag: &str) -> Option<&MachineOption> {
        self.entries.iter().find(|e| e.flag == flag)
    }

    /// The driver named by `--driver`, if any
    pub fn driver(&self) -> Option<&str> {
        self.get(DRIVER_FLAG).and_then(|o| o.value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineOption> {
        self.entries.iter()
    }

    /// Flatten into the argument vector handed to docker-machine
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            args.push(entry.flag.clone());
            if let Some(value) = &entry.value {
                args.push(value.clone());
            }
        }
        args
    }

    /// Argument vector with credential values masked, for logging
    pub fn redacted_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            args.push(entry.flag.clone());
            if let Some(value) = &entry.value {
                if entry.is_secret() {
                    args.push("****".to_string());
                } else {
                    args.push(value.clone());
                }
            }
        }
        args
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted_args().join(" "))
    }
}

/// A value read from the user config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Value(String),
    Switch,
    /// `none`, `null` or `false`
    Unset,
}

/// Flags loaded from a `--userconfig` YAML file, in file order
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    pub path: PathBuf,
    pub entries: Vec<(String, ConfigValue)>,
}

impl UserConfig {
    pub fn get(&self, flag: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == flag).map(|(_, v)| v)
    }

    /// The `--driver` named in the file, if set
    pub fn driver(&self) -> Option<&str> {
        match self.get(DRIVER_FLAG) {
            Some(ConfigValue::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Read and parse a user config file
pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Err(SwarmError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| SwarmError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_user_config(path, &content)
}

/// Parse user config content. The document must be a flat mapping of flag to scalar.
pub fn parse_user_config(path: &Path, content: &str) -> Result<UserConfig> {
    let parse_error = |message: String| SwarmError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let docs = YamlLoader::load_from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let mut config = UserConfig {
        path: path.to_path_buf(),
        entries: Vec::new(),
    };

    let hash = match docs.first() {
        None | Some(Yaml::Null) => return Ok(config),
        Some(Yaml::Hash(hash)) => hash,
        Some(_) => return Err(parse_error("expected a mapping of flags to values".to_string())),
    };

    for (key, value) in hash {
        let key = match key {
            Yaml::String(s) => s.clone(),
            other => {
                return Err(parse_error(format!("flag names must be strings, got {:?}", other)));
            }
        };

        let value = match value {
            Yaml::String(s) if s.eq_ignore_ascii_case(NONE_PLACEHOLDER) => ConfigValue::Unset,
            Yaml::String(s) => ConfigValue::Value(s.clone()),
            Yaml::Integer(i) => ConfigValue::Value(i.to_string()),
            Yaml::Real(r) => ConfigValue::Value(r.clone()),
            Yaml::Boolean(true) => ConfigValue::Switch,
            Yaml::Boolean(false) | Yaml::Null => ConfigValue::Unset,
            _ => return Err(parse_error(format!("value for {} must be a scalar", key))),
        };

        config.entries.push((key, value));
    }

    Ok(config)
}

/// Whether `flag` belongs to `driver`'s namespace (or is `--driver` itself)
pub fn flag_applies(flag: &str, driver: &str) -> bool {
    if flag == DRIVER_FLAG {
        return true;
    }
    if driver.is_empty() {
        return false;
    }
    flag.strip_prefix("--")
        .and_then(|rest| rest.strip_prefix(driver))
        .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

/// Pick the active driver: command line, then user config, then the default
pub fn active_driver<'a>(cli_driver: Option<&'a str>, user_config: Option<&'a UserConfig>) -> &'a str {
    cli_driver
        .filter(|d| !d.is_empty())
        .or_else(|| user_config.and_then(UserConfig::driver))
        .unwrap_or(DEFAULT_DRIVER)
}

/// Merge command-line flags over the user config into an [`OptionSet`].
///
/// `--driver` always comes first. Command-line flags follow in the order given,
/// then config file flags that were not already set. The first assignment of a
/// flag wins, so the command line takes precedence over the file.
pub fn resolve_options(
    cli_driver: Option<&str>,
    cli_flags: &[MachineOption],
    user_config: Option<&UserConfig>,
) -> OptionSet {
    let driver = active_driver(cli_driver, user_config);

    let mut options = OptionSet::new();
    options.insert(MachineOption::value(DRIVER_FLAG, driver));

    for option in cli_flags {
        let placeholder = option
            .value
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case(NONE_PLACEHOLDER));
        if placeholder || !flag_applies(&option.flag, driver) {
            continue;
        }
        options.insert(option.clone());
    }

    if let Some(config) = user_config {
        for (flag, value) in &config.entries {
            if !flag_applies(flag, driver) {
                continue;
            }
            match value {
                ConfigValue::Value(v) => {
                    options.insert(MachineOption::value(flag, v));
                }
                ConfigValue::Switch => {
                    options.insert(MachineOption::switch(flag));
                }
                ConfigValue::Unset => {}
            }
        }
    }

    tracing::debug!(driver, options = %options, "resolved docker-machine options");
    options
}
