//! Public macros for ergonomic service resolution.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// This is the fatal boundary of the bootstrap phase: a missing registration
/// or a failing factory means the application cannot start. The container API
/// itself only returns errors; use `get`/`get_named` to handle them.
///
/// # Panics
///
/// Panics with the resolution error if the service is missing or its factory
/// fails.
///
/// # Examples
///
/// ```
/// use strap_di::{resolve, Container, Options};
///
/// let c = Container::new();
/// c.set(Options::new().value(String::from("hello")));
/// c.set_named("port", Options::new().value(8080u16));
///
/// let message = resolve!(c, String);
/// let port = resolve!(c, u16, "port");
/// assert_eq!(message, "hello");
/// assert_eq!(port, 8080);
/// ```
#[macro_export]
macro_rules! resolve {
  // Anonymous service: resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container
      .get::<$type>()
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };

  // Named service: resolve!(container, MyService, "name")
  ($container:expr, $type:ty, $name:expr) => {
    $container
      .get_named::<$type>($name)
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };
}
