//! HTTP protocol layer module
//!
//! Body types and response builders shared by the local handlers and the relay.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::{RequestBody, ResponseBody};
pub use response::{
    build_404_response, build_405_response, build_gateway_error_response, build_text_response,
};
