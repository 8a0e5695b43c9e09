//! Application identity and settings.

use crate::{Container, Options};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// Names of the identity strings registered by `setup`.
pub const APP_NAME: &str = "$app_name";
pub const APP_NAMESPACE: &str = "$app_namespace";
pub const APP_SUBSYSTEM: &str = "$app_subsystem";
pub const APP_VERSION: &str = "$app_version";
pub const HOSTNAME: &str = "$hostname";

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration file {path:?}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse configuration: {0}")]
  Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
  #[default]
  Plain,
  Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
  /// An `EnvFilter` directive, e.g. `info` or `my_app=debug,warn`.
  #[serde(default = "default_level")]
  pub level: String,
  #[serde(default)]
  pub format: LogFormat,
  /// Install as the global subscriber instead of the thread default.
  #[serde(default = "default_global")]
  pub global: bool,
}

fn default_level() -> String {
  "info".to_owned()
}

fn default_global() -> bool {
  true
}

impl Default for LogSettings {
  fn default() -> Self {
    Self {
      level: default_level(),
      format: LogFormat::default(),
      global: default_global(),
    }
  }
}

/// Runtime settings of the application.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
  /// Instance name; overrides the `namespace_subsystem` name in logs when set.
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub log: LogSettings,
}

impl Settings {
  pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml_str(&yaml)
  }

  /// Loads the file named by `APP_CONFIG`, or the defaults, then applies the
  /// `LOG_LEVEL` and `APP_INSTANCE_NAME` overrides.
  pub fn load() -> Result<Self, ConfigError> {
    let settings = match env::var_os(CONFIG_PATH_ENV) {
      Some(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
      _ => Self::default(),
    };
    Ok(settings.with_overrides(|var| env::var(var).ok()))
  }

  /// Applies overrides looked up through `lookup`. Empty values are ignored.
  pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
    let set = |var: &str| lookup(var).filter(|v| !v.is_empty());
    if let Some(level) = set("LOG_LEVEL") {
      self.log.level = level;
    }
    if let Some(name) = set("APP_INSTANCE_NAME") {
      self.name = name;
    }
    self
  }
}

fn os_hostname() -> Result<String, crate::BoxError> {
  hostname::get()?
    .into_string()
    .map_err(|raw| format!("hostname is not valid UTF-8: {:?}", raw).into())
}

/// Registers the identity strings and the anonymous [`Settings`].
pub fn setup(c: &Container, namespace: &str, subsystem: &str) {
  let namespace = namespace.replace('-', "_");
  let subsystem = subsystem.replace('-', "_");

  c.set_named(
    APP_VERSION,
    Options::new().value(option_env!("APP_VERSION").unwrap_or("dev").to_owned()),
  );
  c.set_named(APP_NAMESPACE, Options::new().value(namespace));
  c.set_named(APP_SUBSYSTEM, Options::new().value(subsystem));
  c.set_named(
    APP_NAME,
    Options::new().init(|c| {
      let namespace = c.get_named::<String>(APP_NAMESPACE)?;
      let subsystem = c.get_named::<String>(APP_SUBSYSTEM)?;
      Ok(format!("{}_{}", namespace, subsystem))
    }),
  );
  c.set_named(HOSTNAME, Options::new().init(|_| os_hostname()));
  c.set(Options::new().init(|_| Ok(Settings::load()?)));
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn missing_sections_take_defaults() {
    let settings = Settings::from_yaml_str("name: billing").unwrap();
    assert_eq!(
      settings,
      Settings {
        name: "billing".to_owned(),
        log: LogSettings::default(),
      }
    );
  }

  #[test]
  fn hostname_resolves_from_the_os() {
    let c = Container::new();
    setup(&c, "example", "api");

    let name = c.get_named::<String>(HOSTNAME).unwrap();

    assert!(!name.is_empty());
    assert!(c.errors().is_empty());
  }

  #[test]
  fn overrides_skip_empty_values() {
    let settings = Settings::default().with_overrides(|var| match var {
      "LOG_LEVEL" => Some("debug".to_owned()),
      "APP_INSTANCE_NAME" => Some(String::new()),
      _ => None,
    });
    assert_eq!(settings.log.level, "debug");
    assert_eq!(settings.name, "");
  }
}
