//! # Strap DI
//!
//! A lazy, type-keyed dependency injection container for the bootstrap phase
//! of an application.
//!
//! Services are registered as factories and destructors keyed by their type
//! and an optional name. Nothing is built at registration time: a service is
//! constructed the first time it is resolved, and its factory may resolve the
//! services it depends on from the same container. When the application
//! stops, [`Container::release`] runs the destructors in the reverse order the
//! services were first resolved and reports every failure at once.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of service slots. Single-threaded.
//! - **Options**: configure a slot's factory, destructor, middleware and reuse.
//! - **Resolution**: `get`/`get_named` return a `Result`; the [`resolve!`] macro
//!   panics instead, for dependencies the application cannot start without.
//! - **Release**: ordered teardown with aggregated errors.
//!
//! ## Quick Start
//!
//! ```
//! use strap_di::{resolve, Container, Options};
//! use std::rc::Rc;
//!
//! struct Database {
//!   url: String,
//! }
//!
//! let c = Container::new();
//!
//! c.set_named("db_url", Options::new().value(String::from("postgres://primary")));
//! c.set(
//!   Options::new()
//!     .init(|c| {
//!       let url = c.get_named::<String>("db_url")?;
//!       Ok(Rc::new(Database { url }))
//!     })
//!     .deinit(|db: Rc<Database>| {
//!       println!("closing {}", db.url);
//!       Ok(())
//!     }),
//! );
//!
//! let db = resolve!(c, Rc<Database>);
//! assert_eq!(db.url, "postgres://primary");
//!
//! c.release().expect("clean shutdown");
//! ```

mod container;
mod error;
mod key;
mod macros;
mod slot;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

pub use container::Container;
pub use error::{BoxError, Error, ReleaseError, Result, SharedError};
pub use key::ServiceKey;
pub use slot::Options;
