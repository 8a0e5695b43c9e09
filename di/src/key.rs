//! The composite key used to address services in a container.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a service slot: the value type plus a name.
///
/// The anonymous name is the empty string. Two keys are equal when both the
/// `TypeId` and the name match; the type name is carried for diagnostics only.
#[derive(Clone)]
pub struct ServiceKey {
  type_id: TypeId,
  type_name: &'static str,
  name: String,
}

impl ServiceKey {
  /// Key for the anonymous registration of `T`.
  pub fn of<T: Any>() -> Self {
    Self::named::<T>("")
  }

  /// Key for the registration of `T` under `name`.
  pub fn named<T: Any>(name: &str) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: type_name::<T>(),
      name: name.to_owned(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is_anonymous(&self) -> bool {
    self.name.is_empty()
  }
}

impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Display for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}<{}>", self.name, self.type_name)
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_anonymous() {
      write!(f, "Key({})", self.type_name)
    } else {
      write!(f, "Key({}, Name({}))", self.type_name, self.name)
    }
  }
}
