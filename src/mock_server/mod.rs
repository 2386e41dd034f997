//! Mock GitLab API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the group
//! iterations API for integration and end-to-end testing. Unlike wiremock
//! which mocks at the HTTP level per-test, this server maintains state
//! across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use gitlabapi::mock_server::MockServer;
//! use gitlabapi::GitLabClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GitLabClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let iteration = client.group_iterations().show(5, 102).await.unwrap();
//!     assert_eq!(iteration["title"], "Sprint 2");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{IterationFilter, MockState};
