// Library surface for headless/integration tests and reuse.
// The controller and its collaborators stay free of terminal drawing;
// the ratatui front end lives in the binary.
pub mod announcer;
pub mod app_dirs;
pub mod clock;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod runtime;
pub mod session;

pub use controller::SessionController;
pub use error::{Result, TomatempoError};
