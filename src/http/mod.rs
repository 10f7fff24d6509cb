//! HTTP layer: route patterns, the route table, and templates.

pub mod route_pattern;
pub mod route_table;
pub mod templates;

pub use route_pattern::RoutePattern;
pub use route_table::RouteTable;
pub use templates::{Bindings, Templates};
