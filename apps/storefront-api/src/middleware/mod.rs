//! HTTP middleware applied to every route.

pub mod cors;
pub mod timeout;

pub use cors::cors;
pub use timeout::{request_timeout, RequestTimeout};
