//! Body types shared by locally generated and proxied messages.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;

/// Request body as seen by handlers (incoming stream, boxed)
pub type RequestBody = BoxBody<Bytes, hyper::Error>;

/// Response body: either a generated buffer or a streamed upstream body
pub type ResponseBody = BoxBody<Bytes, hyper::Error>;

/// Create an empty body.
pub fn empty_body() -> BoxBody<Bytes, hyper::Error> {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Create a body with content.
pub fn full_body(content: impl Into<Bytes>) -> BoxBody<Bytes, hyper::Error> {
    Full::new(content.into())
        .map_err(|never| match never {})
        .boxed()
}
