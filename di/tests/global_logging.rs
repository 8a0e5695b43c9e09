//! Installs the global subscriber, which can happen once per process, so this
//! binary holds a single test.

use strap_di::bootstrap::config::{self, LogFormat, LogSettings, Settings, HOSTNAME};
use strap_di::bootstrap::logging::{self, LoggingHandle};
use strap_di::{Container, Options};

#[test]
fn test_global_logging_bridges_the_log_crate() {
  // Arrange
  let c = Container::new();
  config::setup(&c, "billing", "worker");
  c.set_named(HOSTNAME, Options::new().value(String::from("test-host")));
  c.set(Options::new().value(Settings {
    name: String::new(),
    log: LogSettings {
      level: "info".to_owned(),
      format: LogFormat::Json,
      global: true,
    },
  }));
  logging::setup(&c);
  assert_eq!(log::max_level(), log::LevelFilter::Off);

  // Act
  let handle = c.get::<LoggingHandle>().unwrap();
  log::info!("from the log crate");

  // Assert
  assert!(handle.is_active());
  assert_ne!(log::max_level(), log::LevelFilter::Off);
  assert!(c.release().is_ok());
  assert!(!handle.is_active());
}
