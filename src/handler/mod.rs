//! Request handler module
//!
//! Responsible for request routing dispatch and the locally generated
//! responses (connect command, setup scripts). Relay traffic is handed to
//! the relay module.

pub mod info;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
