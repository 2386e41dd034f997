//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::Iteration;

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Iteration {
    fn pretty_print(&self) -> String {
        let header = format!("Iteration #{} ({})", self.iid, self.display_title());
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("ID:             {}", self.id),
            format!("State:          {}", self.state_name()),
        ];

        match (self.start_date, self.due_date) {
            (Some(start), Some(due)) => lines.push(format!("Dates:          {start} → {due}")),
            (Some(start), None) => lines.push(format!("Starts:         {start}")),
            (None, Some(due)) => lines.push(format!("Due:            {due}")),
            (None, None) => {}
        }

        if let Some(ref description) = self.description {
            if !description.is_empty() {
                lines.push(format!("Description:    {}", description));
            }
        }

        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", updated.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if let Some(ref url) = self.web_url {
            lines.push(format!("URL:            {}", url));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_pretty_print_format() {
        let iteration: Iteration = serde_json::from_value(serde_json::json!({
            "id": 53,
            "iid": 13,
            "title": "Sprint 13",
            "state": 3,
            "start_date": "2024-01-01",
            "due_date": "2024-01-14"
        }))
        .unwrap();

        let output = iteration.pretty_print();
        assert!(output.starts_with("Iteration #13 (Sprint 13)"));
        assert!(output.contains("State:          closed"));
        assert!(output.contains("2024-01-01 → 2024-01-14"));
        assert!(!output.contains("URL:"));
    }
}
