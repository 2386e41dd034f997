//! HTTP request handlers for the mock server.

pub mod iterations;

pub use iterations::*;
