//! Process-wide shutdown signalling.
//!
//! `setup` registers three services:
//! - a private signal watch that flips a flag on `SIGTERM`/`SIGINT`,
//! - [`ShutdownToken`], a cheap, thread-safe view of that flag,
//! - [`CancelHandle`], which cancels the token when the container is released.
//!
//! Resolving the token installs the signal hooks. Once hooked, the signals no
//! longer terminate the process; the application is expected to watch the
//! token and shut down itself.

use crate::{BoxError, Container, Options};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;

const SIGNALS: [i32; 2] = [SIGTERM, SIGINT];

/// Set once the process was asked to stop.
#[derive(Clone, Default)]
pub struct ShutdownToken {
  flag: Arc<AtomicBool>,
}

impl ShutdownToken {
  pub fn is_cancelled(&self) -> bool {
    self.flag.load(Ordering::SeqCst)
  }

  fn cancel(&self) {
    self.flag.store(true, Ordering::SeqCst);
  }
}

impl fmt::Debug for ShutdownToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ShutdownToken")
      .field("cancelled", &self.is_cancelled())
      .finish()
  }
}

/// Cancels the [`ShutdownToken`] on demand, and on container release.
#[derive(Clone, Debug)]
pub struct CancelHandle {
  token: ShutdownToken,
}

impl CancelHandle {
  pub fn cancel(&self) {
    if !self.token.is_cancelled() {
      tracing::debug!("shutdown requested");
    }
    self.token.cancel();
  }
}

// Keeps the registered hooks so they can be removed on release.
#[derive(Clone)]
struct SignalWatch {
  token: ShutdownToken,
  hooks: Rc<RefCell<Vec<SigId>>>,
}

impl SignalWatch {
  fn install() -> Result<Self, BoxError> {
    let token = ShutdownToken::default();
    let mut hooks = Vec::with_capacity(SIGNALS.len());
    for signal in SIGNALS {
      hooks.push(signal_hook::flag::register(signal, token.flag.clone())?);
    }
    tracing::debug!(signals = ?SIGNALS, "shutdown signals hooked");
    Ok(Self {
      token,
      hooks: Rc::new(RefCell::new(hooks)),
    })
  }

  fn uninstall(&self) {
    for id in self.hooks.borrow_mut().drain(..) {
      signal_hook::low_level::unregister(id);
    }
  }
}

/// Registers [`ShutdownToken`] and [`CancelHandle`].
pub fn setup(c: &Container) {
  c.set(
    Options::new()
      .init(|_| SignalWatch::install())
      .deinit(|watch: SignalWatch| {
        watch.uninstall();
        Ok(())
      }),
  );
  c.set(Options::new().init(|c| Ok(c.get::<SignalWatch>()?.token)));
  c.set(
    Options::new()
      .init(|c| {
        Ok(CancelHandle {
          token: c.get::<ShutdownToken>()?,
        })
      })
      .deinit(|handle: CancelHandle| {
        handle.cancel();
        Ok(())
      }),
  );
}
