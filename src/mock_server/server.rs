//! Mock GitLab API server.
//!
//! Provides an axum-based HTTP server that simulates the group iterations API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock GitLab API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `GitLabClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Requests received so far, as `METHOD path`.
    pub async fn requests(&self) -> Vec<String> {
        self.state.read().await.requests.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let state = scenario
            .groups
            .iter()
            .fold(MockState::new(), |state, (id, path)| state.with_group(*id, path));
        let state = scenario
            .iterations
            .into_iter()
            .fold(state, MockState::with_iteration);
        let state = scenario
            .issues
            .into_iter()
            .fold(state, |state, (id, issues)| state.with_issues(id, issues));
        let state = scenario
            .discussions
            .into_iter()
            .fold(state, |state, (id, discussions)| {
                state.with_discussions(id, discussions)
            });
        scenario
            .notes
            .into_iter()
            .fold(state, |state, (id, notes)| state.with_notes(id, notes))
    }

    /// Create the axum router with all routes.
    pub fn router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route(
                "/groups/:group/iterations",
                get(handlers::list_iterations).post(handlers::create_iteration),
            )
            .route(
                "/groups/:group/iterations/:id",
                get(handlers::get_iteration)
                    .put(handlers::update_iteration)
                    .delete(handlers::delete_iteration),
            )
            .route(
                "/groups/:group/iterations/:id/issues",
                get(handlers::list_issues),
            )
            .route(
                "/groups/:group/iterations/:id/discussions",
                get(handlers::list_discussions),
            )
            .route(
                "/groups/:group/iterations/:id/notes",
                get(handlers::list_notes),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
