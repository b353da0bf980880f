//! Routing module
//!
//! Ordered (path matcher, action) table:
//! - Exact path match
//! - Prefix (mount point) match
//! - Template match with `:name` captures

mod matcher;
mod table;

pub use matcher::{match_route, strip_mount, Route, RouteAction};
pub use table::build_routes;
