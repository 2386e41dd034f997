//! GitLab API model types.

mod iteration;

pub use iteration::*;
