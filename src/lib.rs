//! GitLab API client library.
//!
//! A Rust library for the GitLab REST API's group iterations resource.
//! Each operation validates its options locally, encodes identifiers into
//! the request path and sends the request through a [`Transport`].
//!
//! # Quick Start
//!
//! ```no_run
//! use gitlabapi::{GitLabClient, Iteration, IterationListQuery, IterationState};
//!
//! #[tokio::main]
//! async fn main() -> gitlabapi::Result<()> {
//!     // Create client from environment variables
//!     let client = GitLabClient::from_env()?;
//!     let iterations = client.group_iterations();
//!
//!     // List the opened iterations of a group, by full path
//!     let query = IterationListQuery {
//!         state: Some(IterationState::Opened),
//!         ..Default::default()
//!     };
//!     let listed = iterations.all("gitlab-org/plan-stage", &query).await?;
//!     let listed: Vec<Iteration> = serde_json::from_value(listed)?;
//!     println!("Found {} iterations", listed.len());
//!
//!     // Issues scheduled in the first one
//!     if let Some(first) = listed.first() {
//!         let issues = iterations.issues("gitlab-org/plan-stage", first.id).await?;
//!         println!("{issues:#}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`options`] - Option schemas and the validation engine
//! - [`Transport`] - The request seam; [`GitLabClient`] implements it with reqwest
//! - [`GroupIterations`] - The group iterations endpoint
//! - [`encode_path`] / [`ResourceLocator`] - Path construction
//!
//! Invalid options fail with [`ValidationError`] before any request is sent.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITLAB_TOKEN` (required) - Personal access or OAuth token
//! - `GITLAB_URL` (optional) - API base URL (defaults to `https://gitlab.com/api/v4`)

pub mod api;
pub mod cli;
mod client;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod options;
pub mod output;
mod path;
mod query;
mod transport;

// Re-export core types
pub use api::GroupIterations;
pub use client::GitLabClient;
pub use error::{GitLabError, Result, ValidationError};
pub use path::{encode_path, GroupId, ResourceLocator, Segment};
pub use query::encode_query;
pub use transport::{to_payload, Method, Payload, Transport};

// Re-export models
pub use models::{Iteration, IterationListQuery, IterationParams, IterationState};
