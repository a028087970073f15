//! Simple SDK Example
//!
//! Demonstrates basic usage of the SearchLink SDK.
//!
//! # Usage
//!
//! 1. Start an engine:
//!    ```bash
//!    docker run -p 7700:7700 getmeili/meilisearch
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use searchlink_sdk::{ClientConfig, SearchClient, SearchQuery, TaskStatus};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SearchLink SDK - Simple Example");
    println!("===============================\n");

    // 1. Connect
    println!("1. Connecting to engine...");
    let client = SearchClient::connect(ClientConfig::from_env()?)?;
    let health = client.health().await?;
    println!("   ✓ Engine is {}\n", health.status);

    // 2. Add documents (the engine indexes them asynchronously)
    println!("2. Adding documents...");
    let movies = client.index("movies");
    let task = movies
        .add_documents(
            &[
                json!({"id": 1, "title": "Carol", "genres": ["Romance", "Drama"]}),
                json!({"id": 2, "title": "Wonder Woman", "genres": ["Action"]}),
                json!({"id": 3, "title": "Life of Pi", "genres": ["Adventure", "Drama"]}),
            ],
            Some("id"),
        )
        .await?;
    println!("   ✓ Task {} enqueued ({})\n", task.task_uid(), task.kind());

    // 3. Wait for the task
    println!("3. Waiting for task {}...", task.task_uid());
    let record = task.wait(&client, None).await?;
    match record.status {
        TaskStatus::Succeeded => println!("   ✓ Indexed in {:?}\n", record.duration),
        _ => {
            let reason = record
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| record.status.to_string());
            println!("   ✗ Task did not succeed: {}\n", reason);
            return Ok(());
        }
    }

    // 4. Search
    println!("4. Searching for \"drama\"...");
    let results = movies
        .search::<Value>(&SearchQuery::new("drama").with_limit(5))
        .await?;
    for hit in &results.hits {
        println!("     | {}", hit["title"]);
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
