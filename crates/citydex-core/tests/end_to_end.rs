// crates/citydex-core/tests/end_to_end.rs

//! Wires the real pieces together: file provider → catalog → search service,
//! plus favorites filtering over catalog results.

use std::sync::Arc;

use citydex_core::{
    BlobStore, CityCatalog, FavoritesStore, FileRecordProvider, MemoryStore, SearchService,
};

const DATASET: &str = r#"[
    {"country":"US","name":"New York","_id":1,"coord":{"lon":-74.006,"lat":40.7128}},
    {"country":"JP","name":"Tokyo","_id":2,"coord":{"lon":139.6503,"lat":35.6762}},
    {"country":"FR","name":"Paris","_id":3,"coord":{"lon":2.3522,"lat":48.8566}},
    {"country":"IN","name":"New Delhi","_id":4,"coord":{"lon":77.209,"lat":28.6139}},
    {"country":"BR","name":"São Paulo","_id":5,"coord":{"lon":-46.6333,"lat":-23.5505}}
]"#;

fn write_dataset(tag: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("citydex-e2e-{}-{tag}.json", std::process::id()));
    std::fs::write(&path, DATASET).unwrap();
    path
}

#[tokio::test]
async fn search_service_over_a_file_backed_catalog() {
    let path = write_dataset("search");
    let catalog = Arc::new(CityCatalog::new(FileRecordProvider::new(&path)));
    let service = SearchService::new(Arc::clone(&catalog));

    let all = service.load_all_cities().await.unwrap();
    std::fs::remove_file(&path).ok();

    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["New Delhi", "New York", "Paris", "São Paulo", "Tokyo"]);

    let new = service.execute("new");
    assert_eq!(new.len(), 2);
    assert_eq!(service.execute("NEW"), new);
    assert_eq!(service.execute("pa").len(), 1);
    assert_eq!(service.execute("são").len(), 1);
    assert!(service.execute("xyz").is_empty());
    assert_eq!(service.execute("").len(), 5);
}

#[tokio::test]
async fn favorites_filter_catalog_results() {
    let path = write_dataset("favorites");
    let catalog = CityCatalog::new(FileRecordProvider::new(&path));
    let cities = catalog.get_all_cities().await.unwrap();
    std::fs::remove_file(&path).ok();

    let storage = Arc::new(MemoryStore::new());
    let favorites = FavoritesStore::new(Arc::clone(&storage) as Arc<dyn BlobStore>);
    favorites.toggle_favorite(2); // Tokyo
    favorites.toggle_favorite(5); // São Paulo

    let mine = favorites.filter_favorites(&cities);
    let names: Vec<&str> = mine.iter().map(|c| c.name.as_str()).collect();
    // Input order (catalog display order) is preserved.
    assert_eq!(names, ["São Paulo", "Tokyo"]);

    // A fresh store over the same blob agrees.
    let reloaded = FavoritesStore::new(storage as Arc<dyn BlobStore>);
    assert_eq!(reloaded.favorites(), vec![2, 5]);
}
