use crate::key::ServiceKey;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The error type factories, middlewares and destructors return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A shared, cloneable handle to a user error.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors recorded by a [`Container`](crate::Container).
///
/// Every error returned from a resolution is also kept in the container's
/// error list, so the variants are cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("dependency not found: {0}")]
  NotFound(ServiceKey),

  #[error("init dependency {key}: {source}")]
  Init {
    key: ServiceKey,
    #[source]
    source: SharedError,
  },

  #[error("dependency {0} has no factory and no constructed value")]
  NotConstructed(ServiceKey),

  // Teardown failures surface with the destructor's own message.
  #[error("{source}")]
  Deinit {
    key: ServiceKey,
    #[source]
    source: SharedError,
  },
}

impl Error {
  /// The key of the service this error is about.
  pub fn key(&self) -> &ServiceKey {
    match self {
      Error::NotFound(key) | Error::NotConstructed(key) => key,
      Error::Init { key, .. } | Error::Deinit { key, .. } => key,
    }
  }

  pub(crate) fn init(key: ServiceKey, source: BoxError) -> Self {
    Error::Init {
      key,
      source: Arc::from(source),
    }
  }

  pub(crate) fn deinit(key: ServiceKey, source: BoxError) -> Self {
    Error::Deinit {
      key,
      source: Arc::from(source),
    }
  }
}

/// All errors a container collected by the end of [`Container::release`](crate::Container::release).
///
/// Displays as every message in record order, joined with `": "`.
#[derive(Debug, Clone)]
pub struct ReleaseError {
  errors: Vec<Error>,
}

impl ReleaseError {
  pub(crate) fn new(errors: Vec<Error>) -> Self {
    Self { errors }
  }

  pub fn errors(&self) -> &[Error] {
    &self.errors
  }

  pub fn into_errors(self) -> Vec<Error> {
    self.errors
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, err) in self.errors.iter().enumerate() {
      if i > 0 {
        f.write_str(": ")?;
      }
      write!(f, "{}", err)?;
    }
    Ok(())
  }
}

impl std::error::Error for ReleaseError {}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn release_error_joins_in_record_order() {
    let key = ServiceKey::of::<u8>();
    let err = ReleaseError::new(vec![
      Error::deinit(key.clone(), "1".into()),
      Error::deinit(key.clone(), "2".into()),
    ]);
    assert_eq!(err.to_string(), "1: 2");

    let single = ReleaseError::new(vec![Error::deinit(key, "1".into())]);
    assert_eq!(single.to_string(), "1");
  }

  #[test]
  fn init_error_names_the_key() {
    let err = Error::init(ServiceKey::named::<String>("format"), "boom".into());
    assert_eq!(
      err.to_string(),
      "init dependency format<alloc::string::String>: boom"
    );
    assert_eq!(err.key().name(), "format");
  }
}
