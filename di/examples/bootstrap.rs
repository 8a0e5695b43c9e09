use std::process::ExitCode;
use std::rc::Rc;

use strap_di::bootstrap::{self, config::APP_NAME, logging::LoggingHandle};
use strap_di::{resolve, Container, Options};

struct Server {
  name: String,
}

fn main() -> ExitCode {
  let c = Container::new();
  bootstrap::setup(&c, "example", "api");

  c.set(
    Options::new()
      .init(|c| {
        // Logging comes up before the server and goes down after it.
        c.get::<LoggingHandle>()?;
        let name = c.get_named::<String>(APP_NAME)?;
        tracing::info!(%name, "server created");
        Ok(Rc::new(Server { name }))
      })
      .deinit(|server: Rc<Server>| {
        tracing::info!(name = %server.name, "server stopped");
        Ok(())
      }),
  );

  let server = resolve!(c, Rc<Server>);
  tracing::info!(name = %server.name, "serving");

  match bootstrap::shutdown(&c) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      // The logger is already released at this point.
      eprintln!("shutdown failed: {}", err);
      ExitCode::FAILURE
    }
  }
}
