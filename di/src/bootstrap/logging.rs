//! Logging registered as a container service.

use super::config::{LogFormat, LogSettings, Settings, APP_NAME, APP_VERSION, HOSTNAME};
use crate::{BoxError, Container, Options};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// Keeps the non-blocking writer and, for thread-local installs, the
// subscriber alive. Dropping it flushes buffered records.
struct Guards {
  _worker: WorkerGuard,
  _default: Option<DefaultGuard>,
}

/// A handle to the installed logging pipeline.
///
/// Clones share the pipeline. [`LoggingHandle::shutdown`] flushes it for all
/// clones; the container does so when it is released.
#[derive(Clone)]
pub struct LoggingHandle {
  instance: String,
  guards: Rc<RefCell<Option<Guards>>>,
}

impl LoggingHandle {
  /// The instance name attached to the startup record.
  pub fn instance(&self) -> &str {
    &self.instance
  }

  pub fn is_active(&self) -> bool {
    self.guards.borrow().is_some()
  }

  /// Flushes pending records and stops the writer. Idempotent.
  pub fn shutdown(&self) {
    self.guards.borrow_mut().take();
  }
}

impl fmt::Debug for LoggingHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoggingHandle")
      .field("instance", &self.instance)
      .field("active", &self.is_active())
      .finish()
  }
}

fn register<S>(subscriber: S, global: bool) -> Result<Option<DefaultGuard>, BoxError>
where
  S: Subscriber + Send + Sync + 'static,
{
  if global {
    // Route records from the `log` crate into the subscriber.
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(None)
  } else {
    Ok(Some(tracing::subscriber::set_default(subscriber)))
  }
}

fn install(settings: &LogSettings) -> Result<Guards, BoxError> {
  let filter = EnvFilter::try_new(&settings.level)?;
  let (writer, worker) = tracing_appender::non_blocking(std::io::stdout());
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer);

  let default = match settings.format {
    LogFormat::Plain => register(builder.finish(), settings.global)?,
    LogFormat::Json => register(builder.json().finish(), settings.global)?,
  };

  Ok(Guards {
    _worker: worker,
    _default: default,
  })
}

/// Registers the anonymous [`LoggingHandle`].
///
/// Its factory reads [`Settings`] and the identity strings from the
/// container; its destructor flushes the writer.
pub fn setup(c: &Container) {
  c.set(
    Options::new()
      .init(|c| {
        let settings = c.get::<Settings>()?;
        let version = c.get_named::<String>(APP_VERSION)?;
        let hostname = c.get_named::<String>(HOSTNAME)?;
        let instance = if settings.name.is_empty() {
          c.get_named::<String>(APP_NAME)?
        } else {
          settings.name.clone()
        };

        let guards = install(&settings.log)?;
        tracing::info!(%version, %hostname, name = %instance, "logging initialized");

        Ok(LoggingHandle {
          instance,
          guards: Rc::new(RefCell::new(Some(guards))),
        })
      })
      .deinit(|handle: LoggingHandle| {
        handle.shutdown();
        Ok(())
      }),
  );
}
