//! GitLab group iterations CLI binary.
//!
//! A command-line interface for the group iterations API.

use clap::Parser;
use gitlabapi::cli::{Cli, Command};
use gitlabapi::output::PrettyPrint;
use gitlabapi::{GitLabClient, Iteration, IterationListQuery, IterationParams};
use serde_json::Value;
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let Some(token) = cli.token.as_deref() else {
        eprintln!("Error: GitLab configuration required: no API token");
        eprintln!("Hint: Set GITLAB_TOKEN environment variable or pass --token");
        return ExitCode::FAILURE;
    };

    let client = match GitLabClient::new(token, &cli.url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GitLabClient, command: Command, json: bool) -> gitlabapi::Result<()> {
    let iterations = client.group_iterations();

    match command {
        Command::List { group, filters } => {
            let query = IterationListQuery::from(filters);
            let listed = iterations.all(group, &query).await?;
            output_list(listed, json)
        }
        Command::Get { group, id } => {
            let iteration = iterations.show(group, id).await?;
            output_single(iteration, json)
        }
        Command::Create { group, fields } => {
            let params = IterationParams::from(fields);
            let created = iterations.create(group, &params).await?;
            output_single(created, json)
        }
        Command::Update { group, id, fields } => {
            let params = IterationParams::from(fields);
            let updated = iterations.update(group, id, &params).await?;
            output_single(updated, json)
        }
        Command::Delete { group, id } => {
            iterations.remove(group, id).await?;
            if json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Deleted iteration {id}");
            }
            Ok(())
        }
        Command::Issues { group, id } => output_raw(&iterations.issues(group, id).await?),
        Command::Discussions { group, id } => {
            output_raw(&iterations.show_discussions(group, id).await?)
        }
        Command::Notes { group, id } => output_raw(&iterations.show_notes(group, id).await?),
    }
}

fn output_raw(value: &Value) -> gitlabapi::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn output_single(value: Value, json: bool) -> gitlabapi::Result<()> {
    if json {
        return output_raw(&value);
    }
    let iteration: Iteration = serde_json::from_value(value)?;
    println!("{}", iteration.pretty_print());
    Ok(())
}

fn output_list(value: Value, json: bool) -> gitlabapi::Result<()> {
    if json {
        return output_raw(&value);
    }
    let listed: Vec<Iteration> = serde_json::from_value(value)?;
    if listed.is_empty() {
        println!("No iterations found");
        return Ok(());
    }
    let rows: Vec<IterationRow> = listed.iter().map(IterationRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct IterationRow {
    id: u64,
    iid: u64,
    title: String,
    state: &'static str,
    start: String,
    due: String,
}

impl From<&Iteration> for IterationRow {
    fn from(i: &Iteration) -> Self {
        Self {
            id: i.id,
            iid: i.iid,
            title: i.display_title(),
            state: i.state_name(),
            start: i.start_date.map(|d| d.to_string()).unwrap_or_default(),
            due: i.due_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}
