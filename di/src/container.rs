//! The main `Container` struct and its associated methods.

use crate::error::{Error, ReleaseError, Result};
use crate::key::ServiceKey;
use crate::slot::{Options, Service, Slot};

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

type SharedSlot = Rc<RefCell<dyn Service>>;

/// A lazy, single-threaded dependency injection container.
///
/// Services are registered per [`ServiceKey`] with [`Options`] and built on
/// first resolution. Factories receive the container and may resolve their own
/// dependencies from it. [`Container::release`] runs destructors in reverse
/// order of first resolution.
///
/// The container uses interior mutability and is neither `Send` nor `Sync`;
/// all registration and resolution happen on the bootstrap thread.
#[derive(Default)]
pub struct Container {
  slots: RefCell<HashMap<ServiceKey, SharedSlot>>,
  teardown: RefCell<Vec<SharedSlot>>,
  errors: RefCell<Vec<Error>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn record(&self, err: Error) -> Error {
    self.errors.borrow_mut().push(err.clone());
    err
  }

  fn set_internal<T: Any>(&self, key: ServiceKey, options: Options<T>) {
    let existing = self.slots.borrow().get(&key).cloned();
    let slot = match existing {
      Some(slot) => slot,
      None => {
        let slot: SharedSlot = Rc::new(RefCell::new(Slot::<T>::new(key.clone())));
        self.slots.borrow_mut().insert(key.clone(), slot.clone());
        slot
      }
    };

    let mut guard = slot.borrow_mut();
    if let Some(typed) = guard.as_any_mut().downcast_mut::<Slot<T>>() {
      options.apply(typed);
    }
    debug!(%key, "service registered");
  }

  /// Runs `f` against the typed slot without holding the borrow past it.
  fn with_slot<T, R, F>(slot: &SharedSlot, f: F) -> Option<R>
  where
    T: Any,
    F: FnOnce(&mut Slot<T>) -> R,
  {
    let mut guard = slot.borrow_mut();
    let result = guard.as_any_mut().downcast_mut::<Slot<T>>().map(f);
    result
  }

  fn get_internal<T: Any + Clone>(&self, key: ServiceKey) -> Result<T> {
    let slot = self.slots.borrow().get(&key).cloned();
    let Some(slot) = slot else {
      debug!(%key, "dependency not found");
      return Err(self.record(Error::NotFound(key)));
    };

    let pending = Self::with_slot::<T, _, _>(&slot, |s| s.init.take()).flatten();
    if let Some(mut factory) = pending {
      debug!(%key, "constructing service");
      // No borrow is held here: the factory may resolve from this container.
      match factory(self) {
        Ok(value) => {
          Self::with_slot::<T, _, _>(&slot, |s| {
            s.value = Some(value);
            if s.no_reuse && s.init.is_none() {
              s.init = Some(factory);
            }
          });
        }
        Err(source) => {
          Self::with_slot::<T, _, _>(&slot, |s| {
            if s.init.is_none() {
              s.init = Some(factory);
            }
          });
          debug!(%key, error = %source, "service construction failed");
          return Err(self.record(Error::init(key, source)));
        }
      }
    }

    let resolved = Self::with_slot::<T, _, _>(&slot, |s| {
      let value = s.value.clone()?;
      let enqueue = s.no_reuse || !s.enqueued;
      s.enqueued = true;
      Some((value, enqueue))
    })
    .flatten();

    match resolved {
      Some((value, enqueue)) => {
        if enqueue {
          self.teardown.borrow_mut().push(slot);
        }
        Ok(value)
      }
      None => Err(self.record(Error::NotConstructed(key))),
    }
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Configures the anonymous slot for `T`.
  pub fn set<T: Any>(&self, options: Options<T>) {
    self.set_internal(ServiceKey::of::<T>(), options);
  }

  /// Configures the slot for `T` registered under `name`.
  pub fn set_named<T: Any>(&self, name: &str, options: Options<T>) {
    self.set_internal(ServiceKey::named::<T>(name), options);
  }

  pub fn contains<T: Any>(&self) -> bool {
    self.slots.borrow().contains_key(&ServiceKey::of::<T>())
  }

  pub fn contains_named<T: Any>(&self, name: &str) -> bool {
    self.slots.borrow().contains_key(&ServiceKey::named::<T>(name))
  }

  // --- Resolution ---

  /// Resolves the anonymous `T`, constructing it on first use.
  ///
  /// Errors are also recorded and reported again by [`Container::release`].
  /// A missing or failing dependency is a bootstrap error; see [`resolve!`](crate::resolve)
  /// for the panicking form.
  pub fn get<T: Any + Clone>(&self) -> Result<T> {
    self.get_internal(ServiceKey::of::<T>())
  }

  /// Resolves `T` registered under `name`.
  pub fn get_named<T: Any + Clone>(&self, name: &str) -> Result<T> {
    self.get_internal(ServiceKey::named::<T>(name))
  }

  // --- Teardown ---

  /// Runs destructors in reverse order of resolution.
  ///
  /// Every destructor runs even if earlier ones fail. Returns all errors the
  /// container recorded so far, construction failures included. Each
  /// destructor runs at most once, so calling `release` again only reports
  /// the errors already collected.
  pub fn release(&self) -> Result<(), ReleaseError> {
    let order: Vec<SharedSlot> = self.teardown.borrow().clone();
    for slot in order.iter().rev() {
      let teardown = slot.borrow_mut().take_teardown();
      let Some(teardown) = teardown else {
        continue;
      };

      debug!(key = %slot.borrow().key(), "releasing service");
      if let Err(err) = teardown() {
        warn!(key = %err.key(), error = %err, "service release failed");
        self.record(err);
      }
    }

    let errors = self.errors.borrow();
    if errors.is_empty() {
      Ok(())
    } else {
      Err(ReleaseError::new(errors.clone()))
    }
  }

  /// The errors recorded so far, in order.
  pub fn errors(&self) -> Vec<Error> {
    self.errors.borrow().clone()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("slots", &self.slots.borrow().keys().collect::<Vec<_>>())
      .field("resolved", &self.teardown.borrow().len())
      .field("errors", &self.errors.borrow().len())
      .finish()
  }
}
