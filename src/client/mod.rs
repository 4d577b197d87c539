//! HTTP transport to the store API.

pub mod http;
