//! Resource endpoints.
//!
//! Each endpoint borrows a [`Transport`](crate::Transport) and turns method
//! calls into requests: options are validated against the operation's
//! schema, identifiers are encoded into the path, and the response is
//! handed back as received.

mod group_iterations;

pub use group_iterations::{GroupIterations, LIST_SCHEMA as GROUP_ITERATIONS_LIST_SCHEMA};
