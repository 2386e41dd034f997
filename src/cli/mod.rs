//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the gitlabapi binary.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::{GroupId, IterationListQuery, IterationParams, IterationState};

/// GitLab group iterations command-line interface.
#[derive(Parser, Debug)]
#[command(name = "gitlabapi", about = "GitLab group iterations CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API base URL.
    #[arg(long, global = true, env = "GITLAB_URL", default_value = "https://gitlab.com/api/v4")]
    pub url: String,

    /// API token.
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the iterations of a group.
    List {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        #[command(flatten)]
        filters: ListFilters,
    },

    /// Show a single iteration.
    Get {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,
    },

    /// Create an iteration.
    Create {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        #[command(flatten)]
        fields: IterationFields,
    },

    /// Update an iteration.
    Update {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,

        #[command(flatten)]
        fields: IterationFields,
    },

    /// Delete an iteration.
    Delete {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,
    },

    /// List the issues of an iteration.
    Issues {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,
    },

    /// List the discussions of an iteration.
    Discussions {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,
    },

    /// List the notes of an iteration.
    Notes {
        /// Group ID or full path.
        #[arg(value_parser = parse_group)]
        group: GroupId,

        /// Iteration ID.
        id: u64,
    },
}

/// Digits select a group by ID, anything else by full path.
fn parse_group(s: &str) -> Result<GroupId, std::convert::Infallible> {
    s.parse()
}

/// Filters for `list`.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct ListFilters {
    /// Only these iteration IIDs (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub iids: Vec<u64>,

    /// all, opened or closed.
    #[arg(long)]
    pub state: Option<IterationState>,

    /// Search in titles.
    #[arg(long)]
    pub search: Option<String>,

    /// Only iterations updated after this RFC 3339 timestamp.
    #[arg(long)]
    pub updated_after: Option<DateTime<Utc>>,

    /// Fields to search in, e.g. title,cadence_title.
    #[arg(long = "in", value_delimiter = ',')]
    pub in_fields: Vec<String>,
}

impl From<ListFilters> for IterationListQuery {
    fn from(filters: ListFilters) -> Self {
        Self {
            iids: (!filters.iids.is_empty()).then_some(filters.iids),
            state: filters.state,
            search: filters.search,
            updated_after: filters.updated_after,
            in_fields: (!filters.in_fields.is_empty()).then_some(filters.in_fields),
        }
    }
}

/// Writable iteration fields for `create` and `update`.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct IterationFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due_date: Option<NaiveDate>,
}

impl From<IterationFields> for IterationParams {
    fn from(fields: IterationFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            start_date: fields.start_date,
            due_date: fields.due_date,
        }
    }
}
