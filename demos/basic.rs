//! Basic example demonstrating the GitLab group iterations client.
//!
//! Run with:
//! ```
//! GITLAB_TOKEN=your-token cargo run --example basic -- gitlab-org
//! ```

use gitlabapi::{GitLabClient, GroupId, Iteration, IterationListQuery, IterationState};

#[tokio::main]
async fn main() -> gitlabapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let group: GroupId = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gitlab-org".to_string())
        .parse()
        .unwrap_or_else(|never| match never {});

    // Create client from environment variables
    println!("Creating GitLab client...");
    let client = GitLabClient::from_env()?;
    println!("Connected to: {}", client.base_url());
    let iterations = client.group_iterations();

    // List opened iterations
    println!("\n--- Opened Iterations of {group} ---");
    let query = IterationListQuery {
        state: Some(IterationState::Opened),
        ..Default::default()
    };
    let listed: Vec<Iteration> = serde_json::from_value(iterations.all(&group, &query).await?)?;
    println!("Found {} iterations", listed.len());

    for iteration in &listed {
        println!(
            "  - {} [{}] {:?} .. {:?}",
            iteration.display_title(),
            iteration.state_name(),
            iteration.start_date,
            iteration.due_date
        );
    }

    // Options outside the schema are rejected before any request
    println!("\n--- Local Validation ---");
    match iterations
        .all(&group, &serde_json::json!({"state": "archived"}))
        .await
    {
        Err(e) if e.is_validation() => println!("Rejected: {e}"),
        other => println!("Unexpected: {other:?}"),
    }

    // Show the first iteration and what is scheduled in it
    if let Some(first) = listed.first() {
        println!("\n--- Iteration Details ---");
        let shown: Iteration = serde_json::from_value(iterations.show(&group, first.id).await?)?;
        println!("Iteration: {}", shown.display_title());
        println!("  ID: {} (IID {})", shown.id, shown.iid);
        println!("  URL: {}", shown.web_url.as_deref().unwrap_or("-"));

        let issues = iterations.issues(&group, first.id).await?;
        let issues = issues.as_array().map(Vec::as_slice).unwrap_or_default();
        println!("\nFirst 5 of {} issues:", issues.len());
        for issue in issues.iter().take(5) {
            println!("  - #{} {}", issue["iid"], issue["title"].as_str().unwrap_or(""));
        }
    }

    println!("\nDone!");
    Ok(())
}
