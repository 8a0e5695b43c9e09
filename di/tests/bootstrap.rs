use pretty_assertions::assert_eq;
use std::io::Write;
use strap_di::bootstrap::config::{
  self, LogFormat, LogSettings, Settings, APP_NAME, APP_NAMESPACE, APP_SUBSYSTEM, HOSTNAME,
};
use strap_di::bootstrap::context::{self, CancelHandle, ShutdownToken};
use strap_di::bootstrap::logging::{self, LoggingHandle};
use strap_di::{Container, Options};

// --- Test Fixtures ---

fn thread_local_settings(name: &str) -> Settings {
  Settings {
    name: name.to_owned(),
    log: LogSettings {
      level: "debug".to_owned(),
      format: LogFormat::Plain,
      global: false,
    },
  }
}

fn container_with_identity() -> Container {
  let c = Container::new();
  config::setup(&c, "billing-team", "invoice-api");
  // Later registrations replace the factories that read the environment.
  c.set_named(HOSTNAME, Options::new().value(String::from("test-host")));
  c.set(Options::new().value(thread_local_settings("")));
  c
}

// --- Config Tests ---

#[test]
fn test_identity_strings_are_normalized() {
  // Arrange
  let c = container_with_identity();

  // Act
  let namespace = c.get_named::<String>(APP_NAMESPACE).unwrap();
  let subsystem = c.get_named::<String>(APP_SUBSYSTEM).unwrap();
  let name = c.get_named::<String>(APP_NAME).unwrap();

  // Assert
  assert_eq!(namespace, "billing_team");
  assert_eq!(subsystem, "invoice_api");
  assert_eq!(name, "billing_team_invoice_api");
}

#[test]
fn test_settings_from_yaml() {
  // Arrange
  let yaml = "name: worker-1\nlog:\n  level: warn\n  format: json\n  global: false\n";

  // Act
  let settings = Settings::from_yaml_str(yaml).unwrap();

  // Assert
  assert_eq!(
    settings,
    Settings {
      name: "worker-1".to_owned(),
      log: LogSettings {
        level: "warn".to_owned(),
        format: LogFormat::Json,
        global: false,
      },
    }
  );
}

#[test]
fn test_settings_reject_unknown_fields() {
  let err = Settings::from_yaml_str("log:\n  colour: true\n").unwrap_err();
  assert!(err.to_string().starts_with("Failed to parse configuration"));
}

#[test]
fn test_settings_from_file() {
  // Arrange
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "name: from-file").unwrap();

  // Act
  let settings = Settings::from_file(file.path()).unwrap();
  let missing = Settings::from_file(&file.path().with_extension("missing"));

  // Assert
  assert_eq!(settings.name, "from-file");
  assert_eq!(settings.log, LogSettings::default());
  assert!(matches!(missing, Err(config::ConfigError::Read { .. })));
}

#[test]
fn test_settings_load_reads_the_environment() {
  // All environment cases live in one test; tests share the process env.
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "name: from-env-file\nlog:\n  level: warn\n  global: false").unwrap();

  // File plus overrides, an empty override is ignored.
  std::env::set_var(config::CONFIG_PATH_ENV, file.path());
  std::env::set_var("LOG_LEVEL", "debug");
  std::env::set_var("APP_INSTANCE_NAME", "");
  let from_file = Settings::load();

  // No file configured: defaults plus overrides.
  std::env::remove_var(config::CONFIG_PATH_ENV);
  std::env::set_var("APP_INSTANCE_NAME", "worker-9");
  let with_override = Settings::load();

  // Nothing set.
  std::env::remove_var("LOG_LEVEL");
  std::env::remove_var("APP_INSTANCE_NAME");
  let defaults = Settings::load();

  // A missing file is a read error.
  std::env::set_var(config::CONFIG_PATH_ENV, file.path().with_extension("missing"));
  let missing = Settings::load();
  std::env::remove_var(config::CONFIG_PATH_ENV);

  let from_file = from_file.unwrap();
  assert_eq!(from_file.name, "from-env-file");
  assert_eq!(from_file.log.level, "debug");
  assert!(!from_file.log.global);

  let with_override = with_override.unwrap();
  assert_eq!(with_override.name, "worker-9");
  assert_eq!(with_override.log.level, "debug");

  assert_eq!(defaults.unwrap(), Settings::default());
  assert!(matches!(missing, Err(config::ConfigError::Read { .. })));
}

// --- Context Tests ---

#[test]
fn test_release_cancels_the_shutdown_token() {
  // Arrange
  let c = Container::new();
  context::setup(&c);
  let token = c.get::<ShutdownToken>().unwrap();
  c.get::<CancelHandle>().unwrap();
  assert!(!token.is_cancelled());

  // Act
  c.release().unwrap();

  // Assert
  assert!(token.is_cancelled());
}

#[test]
fn test_unresolved_cancel_handle_leaves_token_alone() {
  let c = Container::new();
  context::setup(&c);
  let token = c.get::<ShutdownToken>().unwrap();

  c.release().unwrap();

  assert!(!token.is_cancelled());
}

#[test]
fn test_cancel_handle_cancels_on_demand() {
  let c = Container::new();
  context::setup(&c);
  let token = c.get::<ShutdownToken>().unwrap();
  let handle = c.get::<CancelHandle>().unwrap();

  handle.cancel();

  assert!(token.is_cancelled());
  assert!(c.release().is_ok());
}

// --- Logging Tests ---

#[test]
fn test_logging_handle_uses_app_name_and_is_flushed_on_release() {
  // Arrange
  let c = container_with_identity();
  logging::setup(&c);

  // Act
  let handle = c.get::<LoggingHandle>().unwrap();
  tracing::debug!("from the test");

  // Assert
  assert_eq!(handle.instance(), "billing_team_invoice_api");
  assert!(handle.is_active());

  c.release().unwrap();
  assert!(!handle.is_active());
}

#[test]
fn test_logging_prefers_configured_instance_name() {
  // Arrange
  let c = container_with_identity();
  c.set(Options::new().value(thread_local_settings("invoice-7")));
  logging::setup(&c);

  // Act
  let handle = c.get::<LoggingHandle>().unwrap();

  // Assert
  assert_eq!(handle.instance(), "invoice-7");
  assert!(c.release().is_ok());
}

#[test]
fn test_invalid_log_level_is_an_init_error() {
  // Arrange
  let c = container_with_identity();
  let mut settings = thread_local_settings("");
  settings.log.level = "invoice=verbose".to_owned();
  c.set(Options::new().value(settings));
  logging::setup(&c);

  // Act
  let err = c.get::<LoggingHandle>().unwrap_err();

  // Assert
  assert!(matches!(err, strap_di::Error::Init { .. }));
  assert!(c.release().is_err());
}

#[test]
fn test_shutdown_reports_release_failures() {
  // Arrange
  let c = Container::new();
  c.set(Options::new().value(1u8).deinit(|_: u8| Err("close failed".into())));
  c.get::<u8>().unwrap();

  // Act
  let err = strap_di::bootstrap::shutdown(&c).unwrap_err();

  // Assert
  assert_eq!(err.to_string(), "close failed");
  assert_eq!(err.errors().len(), 1);
}

#[test]
fn test_shutdown_succeeds_on_clean_release() {
  let c = Container::new();
  c.set(Options::new().value(1u8).deinit(|_: u8| Ok(())));
  c.get::<u8>().unwrap();

  assert!(strap_di::bootstrap::shutdown(&c).is_ok());
}

#[test]
fn test_setup_only_registers() {
  // Arrange
  let c = Container::new();

  // Act
  strap_di::bootstrap::setup(&c, "example", "api");

  // Assert
  assert!(c.contains_named::<String>(APP_NAME));
  assert!(c.contains_named::<String>(HOSTNAME));
  assert!(c.contains::<Settings>());
  assert!(c.contains::<ShutdownToken>());
  assert!(c.contains::<CancelHandle>());
  assert!(c.contains::<LoggingHandle>());
  assert!(c.errors().is_empty());
  assert!(c.release().is_ok());
}
