//! Error handling example for citydex-core
//!
//! This example demonstrates proper error handling and edge cases

use citydex_core::{CityCatalog, FetchError, FileRecordProvider};

#[tokio::main]
async fn main() {
    println!("=== citydex-core Error Handling Example ===\n");

    // Example 1: A missing dataset surfaces as a FetchError
    println!("--- Example 1: Missing dataset ---");
    let catalog = CityCatalog::new(FileRecordProvider::new("/nonexistent/cities.json"));
    match catalog.get_all_cities().await {
        Ok(cities) => println!("✓ Loaded {} cities", cities.len()),
        Err(FetchError::Transport(e)) => println!("✗ Transport failure: {e}"),
        Err(FetchError::Status(code)) => println!("✗ HTTP status {code}"),
        Err(FetchError::Decode(e)) => println!("✗ Decode failure: {e}"),
    }
    println!();

    // Example 2: Failures are not cached — the catalog stays empty and a
    // later call retries the fetch.
    println!("--- Example 2: No negative caching ---");
    println!("Catalog loaded after failure? {}", catalog.is_loaded());
    println!("Search on an empty catalog: {:?}", catalog.search_cities("a"));
    println!();

    // Example 3: Malformed payloads
    println!("--- Example 3: Malformed payload ---");
    let path = std::env::temp_dir().join("citydex-example-bad.json");
    std::fs::write(&path, r#"{"not": "an array"}"#).expect("temp dataset");
    let catalog = CityCatalog::new(FileRecordProvider::new(&path));
    match catalog.get_all_cities().await {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("✗ As expected: {e}"),
    }
    std::fs::remove_file(&path).ok();
}
