//! Service slots and the options that configure them.

use crate::container::Container;
use crate::error::{BoxError, Error};
use crate::key::ServiceKey;

use std::any::Any;
use std::fmt;

pub(crate) type Factory<T> = Box<dyn FnMut(&Container) -> Result<T, BoxError>>;
pub(crate) type Destructor<T> = Box<dyn FnOnce(T) -> Result<(), BoxError>>;

/// A destructor bound to the value it releases, ready to run.
pub(crate) type Teardown = Box<dyn FnOnce() -> Result<(), Error>>;

/// The type-erased view of a slot the container stores.
pub(crate) trait Service {
  fn key(&self) -> &ServiceKey;

  /// Takes the destructor and the value out of the slot.
  ///
  /// Returns `None` once the destructor has run, or if nothing was constructed.
  fn take_teardown(&mut self) -> Option<Teardown>;

  fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Holds the factory, destructor and cached value for one service key.
pub(crate) struct Slot<T> {
  key: ServiceKey,
  pub(crate) init: Option<Factory<T>>,
  pub(crate) deinit: Option<Destructor<T>>,
  pub(crate) no_reuse: bool,
  pub(crate) value: Option<T>,
  pub(crate) enqueued: bool,
}

impl<T: 'static> Slot<T> {
  pub(crate) fn new(key: ServiceKey) -> Self {
    Self {
      key,
      init: None,
      deinit: None,
      no_reuse: false,
      value: None,
      enqueued: false,
    }
  }
}

impl<T: 'static> Service for Slot<T> {
  fn key(&self) -> &ServiceKey {
    &self.key
  }

  fn take_teardown(&mut self) -> Option<Teardown> {
    let deinit = self.deinit.take()?;
    let Some(value) = self.value.take() else {
      // Registered after the last construction; keep it for the next one.
      self.deinit = Some(deinit);
      return None;
    };
    let key = self.key.clone();
    Some(Box::new(move || {
      deinit(value).map_err(|source| Error::deinit(key, source))
    }))
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}

type Apply<T> = Box<dyn FnOnce(&mut Slot<T>)>;

/// Configuration applied to a slot by [`Container::set`].
///
/// Options run in the order they were added, so a later option of the same
/// kind overwrites an earlier one. A slot keeps its configuration across
/// calls: registering a factory and then, separately, a destructor for the
/// same key configures one slot.
///
/// ```
/// use strap_di::{Container, Options};
///
/// let c = Container::new();
/// c.set(
///   Options::new()
///     .init(|_| Ok(40u32))
///     .middleware(|_, v| Ok(v + 2))
///     .deinit(|v| {
///       println!("releasing {}", v);
///       Ok(())
///     }),
/// );
/// assert_eq!(c.get::<u32>().unwrap(), 42);
/// ```
pub struct Options<T> {
  ops: Vec<Apply<T>>,
}

impl<T: 'static> Options<T> {
  pub fn new() -> Self {
    Self { ops: Vec::new() }
  }

  /// Sets the factory. It receives the container to resolve its own dependencies.
  pub fn init<F>(mut self, factory: F) -> Self
  where
    F: FnMut(&Container) -> Result<T, BoxError> + 'static,
  {
    self.ops.push(Box::new(move |slot: &mut Slot<T>| {
      slot.init = Some(Box::new(factory));
    }));
    self
  }

  /// Sets a factory that hands out clones of `value`.
  pub fn value(self, value: T) -> Self
  where
    T: Clone,
  {
    self.init(move |_| Ok(value.clone()))
  }

  /// Wraps the factory currently on the slot.
  ///
  /// The wrapped factory runs the previous one and passes its result through
  /// `middleware`. Ignored when the slot has no pending factory.
  pub fn middleware<F>(mut self, mut middleware: F) -> Self
  where
    F: FnMut(&Container, T) -> Result<T, BoxError> + 'static,
  {
    self.ops.push(Box::new(move |slot: &mut Slot<T>| match slot.init.take() {
      Some(mut inner) => {
        slot.init = Some(Box::new(move |c: &Container| {
          let value = inner(c)?;
          middleware(c, value)
        }));
      }
      None => {
        tracing::warn!(key = %slot.key, "middleware ignored: no pending factory");
      }
    }));
    self
  }

  /// Sets the destructor run by [`Container::release`].
  pub fn deinit<F>(mut self, destructor: F) -> Self
  where
    F: FnOnce(T) -> Result<(), BoxError> + 'static,
  {
    self.ops.push(Box::new(move |slot: &mut Slot<T>| {
      slot.deinit = Some(Box::new(destructor));
    }));
    self
  }

  /// Runs the factory on every resolution instead of caching its value.
  pub fn no_reuse(mut self) -> Self {
    self.ops.push(Box::new(|slot: &mut Slot<T>| slot.no_reuse = true));
    self
  }

  pub(crate) fn apply(self, slot: &mut Slot<T>) {
    for op in self.ops {
      op(slot);
    }
  }
}

impl<T: 'static> Default for Options<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for Options<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Options").field("ops", &self.ops.len()).finish()
  }
}
