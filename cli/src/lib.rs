//! Command-line front end: parses flags, builds the [`crm::AppContext`],
//! loads the stores and prints one screen.

mod commands;
mod error;
mod logging;
mod output;

pub use commands::Cli;
pub use error::Error;
pub use logging::init_logging;
