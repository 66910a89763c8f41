//! HTTP surface of the proxy.

pub mod handlers;
pub mod routes;
