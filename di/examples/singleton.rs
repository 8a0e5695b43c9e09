use std::cell::Cell;
use std::rc::Rc;
use strap_di::{resolve, Container, Options};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() {
  let c = Container::new();
  let ids = Rc::new(Cell::new(0));

  // --- Reusable Registration ---
  // This factory will only be called ONCE.
  let next = ids.clone();
  c.set_named(
    "cached_tracker",
    Options::new().init(move |_| {
      println!("Creating cached RequestTracker...");
      next.set(next.get() + 1);
      Ok(Rc::new(RequestTracker { id: next.get() - 1 }))
    }),
  );

  // --- Non-reusable Registration ---
  // This factory will be called EVERY time the service is resolved.
  let next = ids.clone();
  c.set_named(
    "fresh_tracker",
    Options::new()
      .init(move |_| {
        println!("Creating fresh RequestTracker...");
        next.set(next.get() + 1);
        Ok(Rc::new(RequestTracker { id: next.get() - 1 }))
      })
      .no_reuse(),
  );

  println!("--- Resolving cached ---");
  let s1 = resolve!(c, Rc<RequestTracker>, "cached_tracker");
  let s2 = resolve!(c, Rc<RequestTracker>, "cached_tracker");
  println!("Cached 1 ID: {}, Cached 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Rc::ptr_eq(&s1, &s2), "Cached instances should be identical");

  println!("--- Resolving fresh ---");
  let t1 = resolve!(c, Rc<RequestTracker>, "fresh_tracker");
  let t2 = resolve!(c, Rc<RequestTracker>, "fresh_tracker");
  println!("Fresh 1 ID: {}, Fresh 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Rc::ptr_eq(&t1, &t2), "Fresh instances should be different");
}
