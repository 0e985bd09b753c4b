//! Roster Overview Example
//!
//! This example demonstrates how to use teyvat-client to:
//! - Connect and sample the initial quota
//! - List every character and group them by element
//! - Look up single records, served from the cache after a listing
//! - Handle errors explicitly with the `try_*` accessors

use std::collections::BTreeMap;
use teyvat_client::{Config, RequestOptions, TeyvatClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // Initialize logging
  tracing_subscriber::fmt::init();

  // Load configuration from environment
  let config = Config::from_env().map_err(|e| {
    eprintln!("Failed to load configuration. Make sure TEYVAT_TOKEN is set.");
    eprintln!("Error: {}", e);
    e
  })?;

  let client = TeyvatClient::connect(config).await?;
  let quota = client.quota();
  println!("Connected, {} of {} calls left in this window\n", quota.remaining, quota.limit);

  let characters = client.get_characters(None).await.unwrap_or_default();
  let mut by_element: BTreeMap<String, Vec<&str>> = BTreeMap::new();
  for character in &characters {
    let element = character
      .attribute("element")
      .and_then(|v| v.get("name").or(Some(v)))
      .and_then(|v| v.as_str())
      .unwrap_or("Unknown")
      .to_string();
    by_element.entry(element).or_default().push(&character.name);
  }

  println!("{} characters", characters.len());
  for (element, names) in &by_element {
    println!("  {:<10} {}", element, names.join(", "));
  }

  // Answered from the cache populated by the listing above.
  if let Some(amber) = client.get_character("Amber", None).await {
    println!("\nAmber: {:?}", amber.attribute("title"));
  }

  // A narrow projection bypasses the cache.
  let options = RequestOptions::new().with_select(serde_json::json!({ "id": true, "name": true }));
  match client.regions().try_list(Some(options)).await {
    Ok(Some(regions)) => println!("\n{} regions", regions.len()),
    Ok(None) => println!("\nNo regions found"),
    Err(e) => eprintln!("\nFailed to list regions: {}", e),
  }

  println!("\nQuota after run: {:?}", client.quota());
  Ok(())
}
