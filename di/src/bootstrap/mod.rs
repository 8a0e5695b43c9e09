//! Application bootstrap built on the container.
//!
//! These collaborators only register factories and destructors; nothing is
//! constructed until a service is resolved.

pub mod config;
pub mod context;
pub mod logging;

use crate::{Container, ReleaseError};

/// Registers the application identity, [`config::Settings`], the shutdown
/// context and logging.
pub fn setup(c: &Container, namespace: &str, subsystem: &str) {
  config::setup(c, namespace, subsystem);
  context::setup(c);
  logging::setup(c);
}

/// Releases the container, logging the combined error if there is one.
///
/// The logging service is usually released by this call as well, so the
/// record may never reach a writer. Callers that must surface the failure
/// should report the returned error themselves.
pub fn shutdown(c: &Container) -> Result<(), ReleaseError> {
  c.release().map_err(|err| {
    tracing::error!(error = %err, "container release failed");
    err
  })
}
