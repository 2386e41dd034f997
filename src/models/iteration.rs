//! Iteration model and request parameter types.
//!
//! Iterations are time-boxed planning periods attached to a group.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A group iteration as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    /// Global iteration ID.
    pub id: u64,

    /// Iteration ID within the group.
    pub iid: u64,

    /// Position within the iteration cadence.
    #[serde(default)]
    pub sequence: Option<u64>,

    /// Owning group ID.
    #[serde(default)]
    pub group_id: Option<u64>,

    /// Iteration title. Cadence-generated iterations have none.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Numeric state: 1 upcoming, 2 current, 3 closed.
    pub state: u8,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub web_url: Option<String>,
}

impl Iteration {
    /// State code for upcoming iterations.
    pub const UPCOMING: u8 = 1;
    /// State code for the running iteration.
    pub const CURRENT: u8 = 2;
    /// State code for closed iterations.
    pub const CLOSED: u8 = 3;

    /// Readable name of the state code.
    pub fn state_name(&self) -> &'static str {
        match self.state {
            Self::UPCOMING => "upcoming",
            Self::CURRENT => "current",
            Self::CLOSED => "closed",
            _ => "unknown",
        }
    }

    /// Upcoming and current iterations count as opened.
    pub fn is_opened(&self) -> bool {
        matches!(self.state, Self::UPCOMING | Self::CURRENT)
    }

    pub fn is_closed(&self) -> bool {
        self.state == Self::CLOSED
    }

    /// Title, or `#iid` when the iteration has none.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("#{}", self.iid))
    }
}

/// State filter for listing iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationState {
    All,
    Opened,
    Closed,
}

impl IterationState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Opened => "opened",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IterationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IterationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "opened" => Ok(Self::Opened),
            "closed" => Ok(Self::Closed),
            other => Err(format!(
                "invalid state '{other}', expected one of: all, opened, closed"
            )),
        }
    }
}

/// Typed filters for listing iterations.
///
/// Serializes to the same option names the list operation validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IterationListQuery {
    /// Only iterations with these group-level IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iids: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IterationState>,

    /// Match against title (or the fields chosen with `in_fields`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_after: Option<DateTime<Utc>>,

    /// Fields searched by `search`, e.g. `title` or `cadence_title`.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_fields: Option<Vec<String>>,
}

/// Body for creating or updating an iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}
