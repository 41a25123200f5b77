//! The service's procedures, one per module, and the function that
//! registers them.

pub mod divide;
pub mod greet;
pub mod hello;
pub mod time;
pub mod todos;

use procroute_router::Registry;

pub use divide::{DivideInput, DivideOutput};
pub use greet::{GreetInput, GreetOutput};
pub use hello::HelloOutput;
pub use time::TimeOutput;
pub use todos::Todo;

use crate::error::Result;
use crate::settings::AppSettings;

/// Build the registry of every procedure the service exposes.
pub fn registry(settings: &AppSettings) -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register(hello::procedure()?)?;
    registry.register(greet::procedure()?)?;
    registry.register(divide::procedure()?)?;
    registry.register(todos::procedure()?)?;
    registry.register(time::procedure(settings)?)?;
    Ok(registry)
}
