//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::Iteration;

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The data set the default mock server starts with.
pub struct DefaultScenario {
    pub groups: Vec<(u64, String)>,
    pub iterations: Vec<Iteration>,
    pub issues: Vec<(u64, Vec<Value>)>,
    pub discussions: Vec<(u64, Vec<Value>)>,
    pub notes: Vec<(u64, Vec<Value>)>,
}

impl Fixtures {
    // =========================================================================
    // Iteration Fixtures
    // =========================================================================

    /// Create an iteration with two-week dates derived from its IID.
    pub fn iteration(id: u64, iid: u64, group_id: u64, title: &str, state: u8) -> Iteration {
        let offset = i64::try_from(iid).unwrap_or(0) * 14;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.checked_add_signed(chrono::Duration::days(offset - 14)));
        let due = start.and_then(|d| d.checked_add_signed(chrono::Duration::days(13)));
        let updated = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().map(|t| {
            t + chrono::Duration::days(offset)
        });

        Iteration {
            id,
            iid,
            sequence: Some(iid),
            group_id: Some(group_id),
            title: Some(title.to_string()),
            description: None,
            state,
            created_at: updated,
            updated_at: updated,
            start_date: start,
            due_date: due,
            web_url: Some(format!(
                "https://gitlab.example.com/groups/{group_id}/-/iterations/{id}"
            )),
        }
    }

    // =========================================================================
    // Sub-resource Fixtures
    // =========================================================================

    /// Create an issue as returned by the iteration issues route.
    pub fn issue(id: u64, iid: u64, title: &str) -> Value {
        json!({
            "id": id,
            "iid": iid,
            "title": title,
            "state": "opened",
            "labels": [],
            "web_url": format!("https://gitlab.example.com/my-group/app/-/issues/{iid}")
        })
    }

    /// Create a note.
    pub fn note(id: u64, body: &str) -> Value {
        json!({
            "id": id,
            "body": body,
            "system": false,
            "author": {"id": 1, "username": "root"}
        })
    }

    /// Create a discussion wrapping a single note.
    pub fn discussion(id: &str, note: Value) -> Value {
        json!({
            "id": id,
            "individual_note": true,
            "notes": [note]
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Two groups, a closed, a current and an upcoming iteration in
    /// `my-group` (ID 5) and one iteration in `parent/child` (ID 9).
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            groups: vec![(5, "my-group".to_string()), (9, "parent/child".to_string())],
            iterations: vec![
                Self::iteration(101, 1, 5, "Sprint 1", Iteration::CLOSED),
                Self::iteration(102, 2, 5, "Sprint 2", Iteration::CURRENT),
                Self::iteration(103, 3, 5, "Sprint 3", Iteration::UPCOMING),
                Self::iteration(201, 1, 9, "Child Sprint 1", Iteration::CURRENT),
            ],
            issues: vec![(
                102,
                vec![
                    Self::issue(1001, 12, "Fix login redirect"),
                    Self::issue(1002, 13, "Add iteration report"),
                ],
            )],
            discussions: vec![(
                102,
                vec![Self::discussion("6a9c1750", Self::note(501, "Scope agreed"))],
            )],
            notes: vec![(102, vec![Self::note(501, "Scope agreed")])],
        }
    }
}
