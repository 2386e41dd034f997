//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitLab API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Iteration, IterationParams};

/// Filters understood by the list route.
#[derive(Debug, Clone, Default)]
pub struct IterationFilter {
    pub iids: Vec<u64>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub updated_after: Option<DateTime<Utc>>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Group full paths indexed by group ID.
    pub groups: HashMap<u64, String>,

    /// Iterations indexed by global ID.
    pub iterations: BTreeMap<u64, Iteration>,

    /// Issues indexed by iteration ID.
    pub issues: HashMap<u64, Vec<Value>>,

    /// Discussions indexed by iteration ID.
    pub discussions: HashMap<u64, Vec<Value>>,

    /// Notes indexed by iteration ID.
    pub notes: HashMap<u64, Vec<Value>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Every request seen, as `METHOD path` with the path decoded. Query strings are not kept.
    pub requests: Vec<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a group to the state.
    pub fn with_group(mut self, id: u64, full_path: &str) -> Self {
        self.groups.insert(id, full_path.to_string());
        self
    }

    /// Add an iteration to the state. Its `group_id` must be set.
    pub fn with_iteration(mut self, iteration: Iteration) -> Self {
        self.iterations.insert(iteration.id, iteration);
        self
    }

    /// Add issues for an iteration.
    pub fn with_issues(mut self, iteration_id: u64, issues: Vec<Value>) -> Self {
        self.issues.insert(iteration_id, issues);
        self
    }

    /// Add discussions for an iteration.
    pub fn with_discussions(mut self, iteration_id: u64, discussions: Vec<Value>) -> Self {
        self.discussions.insert(iteration_id, discussions);
        self
    }

    /// Add notes for an iteration.
    pub fn with_notes(mut self, iteration_id: u64, notes: Vec<Value>) -> Self {
        self.notes.insert(iteration_id, notes);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Resolve a group reference (numeric ID or full path) to its ID.
    pub fn resolve_group(&self, reference: &str) -> Option<u64> {
        if let Ok(id) = reference.parse::<u64>() {
            return self.groups.contains_key(&id).then_some(id);
        }
        self.groups
            .iter()
            .find(|(_, path)| path.as_str() == reference)
            .map(|(id, _)| *id)
    }

    /// Get an iteration by ID, if it belongs to the group.
    pub fn get_iteration(&self, group_id: u64, id: u64) -> Option<&Iteration> {
        self.iterations
            .get(&id)
            .filter(|i| i.group_id == Some(group_id))
    }

    /// List a group's iterations matching the filter, ordered by ID.
    pub fn list_iterations(&self, group_id: u64, filter: &IterationFilter) -> Vec<&Iteration> {
        self.iterations
            .values()
            .filter(|i| i.group_id == Some(group_id))
            .filter(|i| filter.iids.is_empty() || filter.iids.contains(&i.iid))
            .filter(|i| match filter.state.as_deref() {
                Some("opened") => i.is_opened(),
                Some("closed") => i.is_closed(),
                _ => true,
            })
            .filter(|i| {
                filter.search.as_deref().map_or(true, |s| {
                    i.title
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&s.to_lowercase()))
                })
            })
            .filter(|i| {
                filter
                    .updated_after
                    .map_or(true, |after| i.updated_at.is_some_and(|u| u > after))
            })
            .collect()
    }

    /// Create an iteration in a group and return it.
    pub fn create_iteration(&mut self, group_id: u64, params: IterationParams) -> Iteration {
        let id = self.iterations.keys().next_back().map_or(1, |id| id + 1);
        let iid = self
            .iterations
            .values()
            .filter(|i| i.group_id == Some(group_id))
            .map(|i| i.iid)
            .max()
            .unwrap_or(0)
            + 1;
        let now = Utc::now();

        let iteration = Iteration {
            id,
            iid,
            sequence: Some(iid),
            group_id: Some(group_id),
            title: params.title,
            description: params.description,
            state: Iteration::UPCOMING,
            created_at: Some(now),
            updated_at: Some(now),
            start_date: params.start_date,
            due_date: params.due_date,
            web_url: self
                .groups
                .get(&group_id)
                .map(|path| format!("https://gitlab.example.com/groups/{path}/-/iterations/{id}")),
        };

        self.iterations.insert(id, iteration.clone());
        iteration
    }

    /// Update an iteration and return the updated version.
    pub fn update_iteration(
        &mut self,
        group_id: u64,
        id: u64,
        params: IterationParams,
    ) -> Option<&Iteration> {
        let iteration = self
            .iterations
            .get_mut(&id)
            .filter(|i| i.group_id == Some(group_id))?;

        if let Some(title) = params.title {
            iteration.title = Some(title);
        }
        if let Some(description) = params.description {
            iteration.description = Some(description);
        }
        if let Some(start) = params.start_date {
            iteration.start_date = Some(start);
        }
        if let Some(due) = params.due_date {
            iteration.due_date = Some(due);
        }
        iteration.updated_at = Some(Utc::now());

        self.iterations.get(&id)
    }

    /// Remove an iteration. Returns false if it did not exist in the group.
    pub fn delete_iteration(&mut self, group_id: u64, id: u64) -> bool {
        if self.get_iteration(group_id, id).is_none() {
            return false;
        }
        self.iterations.remove(&id);
        self.issues.remove(&id);
        self.discussions.remove(&id);
        self.notes.remove(&id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    fn sample_state() -> MockState {
        MockState::new()
            .with_group(5, "my-group")
            .with_group(9, "parent/child")
            .with_iteration(Fixtures::iteration(1, 1, 5, "Sprint 1", Iteration::CLOSED))
            .with_iteration(Fixtures::iteration(2, 2, 5, "Sprint 2", Iteration::CURRENT))
            .with_iteration(Fixtures::iteration(3, 1, 9, "Child Sprint", Iteration::UPCOMING))
    }

    #[test]
    fn test_resolve_group_by_id_and_path() {
        let state = sample_state();
        assert_eq!(state.resolve_group("5"), Some(5));
        assert_eq!(state.resolve_group("parent/child"), Some(9));
        assert_eq!(state.resolve_group("42"), None);
        assert_eq!(state.resolve_group("unknown"), None);
    }

    #[test]
    fn test_list_iterations_with_filters() {
        let state = sample_state();

        assert_eq!(state.list_iterations(5, &IterationFilter::default()).len(), 2);

        let opened = IterationFilter {
            state: Some("opened".to_string()),
            ..Default::default()
        };
        let listed = state.list_iterations(5, &opened);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 2);

        let by_iid = IterationFilter {
            iids: vec![1],
            ..Default::default()
        };
        assert_eq!(state.list_iterations(5, &by_iid)[0].id, 1);

        let search = IterationFilter {
            search: Some("child".to_string()),
            ..Default::default()
        };
        assert_eq!(state.list_iterations(9, &search).len(), 1);
        assert!(state.list_iterations(5, &search).is_empty());
    }

    #[test]
    fn test_get_iteration_checks_group() {
        let state = sample_state();
        assert!(state.get_iteration(5, 1).is_some());
        assert!(state.get_iteration(9, 1).is_none());
    }

    #[test]
    fn test_create_assigns_next_ids() {
        let mut state = sample_state();
        let created = state.create_iteration(
            5,
            IterationParams {
                title: Some("Sprint 3".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(created.id, 4);
        assert_eq!(created.iid, 3);
        assert_eq!(created.state, Iteration::UPCOMING);
        assert!(state.get_iteration(5, 4).is_some());
    }

    #[test]
    fn test_update_and_delete() {
        let mut state = sample_state();

        let updated = state.update_iteration(
            5,
            2,
            IterationParams {
                description: Some("Focus on search".to_string()),
                ..Default::default()
            },
        );
        let updated = updated.expect("iteration exists");
        assert_eq!(updated.description.as_deref(), Some("Focus on search"));
        assert_eq!(updated.title.as_deref(), Some("Sprint 2"));

        assert!(state.update_iteration(9, 2, IterationParams::default()).is_none());

        assert!(state.delete_iteration(5, 2));
        assert!(!state.delete_iteration(5, 2));
        assert!(state.get_iteration(5, 2).is_none());
    }
}
