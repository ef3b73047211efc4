//! Basic usage example for citydex-core
//!
//! This example demonstrates how to:
//! - Load the city catalog from a local dataset
//! - Run prefix searches against it
//! - Manage favorites with change notifications

use std::sync::Arc;

use citydex_core::{
    BlobStore, CityCatalog, FavoritesStore, FileRecordProvider, MemoryStore, Result,
    SearchService,
};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== citydex-core Basic Usage Example ===\n");

    // A small inline dataset; point FileRecordProvider at your own
    // cities.json to load the real thing.
    let path = std::env::temp_dir().join("citydex-example-cities.json");
    std::fs::write(
        &path,
        r#"[
            {"country":"US","name":"New York","_id":1,"coord":{"lon":-74.006,"lat":40.7128}},
            {"country":"JP","name":"Tokyo","_id":2,"coord":{"lon":139.6503,"lat":35.6762}},
            {"country":"FR","name":"Paris","_id":3,"coord":{"lon":2.3522,"lat":48.8566}},
            {"country":"IN","name":"New Delhi","_id":4,"coord":{"lon":77.209,"lat":28.6139}},
            {"country":"BR","name":"São Paulo","_id":5,"coord":{"lon":-46.6333,"lat":-23.5505}}
        ]"#,
    )
    .expect("temp dataset");

    // Example 1: Load the catalog
    println!("--- Example 1: Load the catalog ---");
    let catalog = Arc::new(CityCatalog::new(FileRecordProvider::new(&path)));
    let cities = catalog.get_all_cities().await?;
    println!("Loaded {} cities:", cities.len());
    for city in &cities {
        println!("  {}", city.display_name());
    }
    println!();

    // Example 2: Prefix search through the façade
    println!("--- Example 2: Prefix search ---");
    let service = SearchService::new(Arc::clone(&catalog));
    for prefix in ["new", "NEW", "são", "xyz"] {
        let hits = service.execute(prefix);
        let names: Vec<String> = hits.iter().map(|c| c.name.clone()).collect();
        println!("  {prefix:?} -> {names:?}");
    }
    println!();

    // Example 3: Favorites with change notification
    println!("--- Example 3: Favorites ---");
    let favorites = FavoritesStore::new(Arc::new(MemoryStore::new()) as Arc<dyn BlobStore>);
    let _subscription = favorites.subscribe(|| println!("  (favorites changed)"));

    favorites.toggle_favorite(2);
    favorites.toggle_favorite(5);
    let mine = favorites.filter_favorites(&cities);
    println!("Favorites in display order:");
    for city in &mine {
        println!("  * {}", city.display_name());
    }

    std::fs::remove_file(&path).ok();
    Ok(())
}
