use std::rc::Rc;
use strap_di::{resolve, Container, Options};

// --- A handle registered twice under different names ---
struct DbPool {
  role: &'static str,
  dsn: String,
}

impl DbPool {
  fn connect(role: &'static str, dsn: String) -> Rc<Self> {
    println!("Connecting {} pool to {}", role, dsn);
    Rc::new(DbPool { role, dsn })
  }
}

fn pool_options(role: &'static str) -> Options<Rc<DbPool>> {
  Options::new()
    .init(move |c| {
      let dsn = c.get_named::<String>(&format!("{}_dsn", role))?;
      Ok(DbPool::connect(role, dsn))
    })
    .deinit(|pool: Rc<DbPool>| {
      println!("Closing {} pool ({})", pool.role, pool.dsn);
      Ok(())
    })
}

fn main() {
  let c = Container::new();

  // --- Registration ---
  c.set_named("primary_dsn", Options::new().value(String::from("mysql://primary:3306")));
  c.set_named("replica_dsn", Options::new().value(String::from("mysql://replica:3306")));
  c.set_named("primary", pool_options("primary"));
  c.set_named("replica", pool_options("replica"));

  // --- Resolution ---
  // Only the handles that are asked for get connected.
  let replica = resolve!(c, Rc<DbPool>, "replica");
  let primary = resolve!(c, Rc<DbPool>, "primary");

  assert_eq!(replica.dsn, "mysql://replica:3306");
  assert_eq!(primary.dsn, "mysql://primary:3306");

  // Primary closes first: it was resolved last.
  c.release().expect("pools close cleanly");
}
