use std::panic;
use strap_di::{resolve, Container, Error};

#[derive(Clone)]
struct UnregisteredService;

fn main() {
  let c = Container::new();

  // --- Using the fallible `get()` method ---
  println!("Attempting to resolve a service that was never registered...");

  match c.get::<UnregisteredService>() {
    Ok(_) => panic!("Should not have found the service!"),
    Err(Error::NotFound(key)) => println!("Correctly received NotFound for {}", key),
    Err(other) => panic!("Unexpected error: {}", other),
  }

  // --- Using the panicking `resolve!` macro ---
  println!("\nNow, attempting the same with resolve!...");

  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _service = resolve!(c, UnregisteredService);
  }));

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // Both failures were recorded and surface again on release.
  let err = c.release().unwrap_err();
  println!("\nRelease reported: {}", err);
  assert_eq!(err.errors().len(), 2);
}
