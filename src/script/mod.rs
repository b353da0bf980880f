//! Setup script module
//!
//! Renders the shell script served at `/setup.sh/:uuid`.

mod identity;
mod setup;

pub use identity::GfWrt;
pub use setup::{SetupScript, DEFAULT_SERVICE};
