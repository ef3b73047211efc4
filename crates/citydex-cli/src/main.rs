//! citydex — Command-line interface for citydex-core
//!
//! This binary loads the city dataset (from the upstream URL or a local
//! file), answers prefix searches against it, and manages the persisted
//! favorites set.
//!
//! Usage examples
//! --------------
//!
//! - Show catalog stats
//!   $ citydex stats
//!
//! - List the first cities in display order
//!   $ citydex list --limit 10
//!
//! - Search by name prefix (case-insensitive)
//!   $ citydex search "new"
//!
//! - Toggle a favorite and list favorites
//!   $ citydex fav 707860
//!   $ citydex favorites
//!
//! Data source
//! -----------
//!
//! By default the CLI fetches the dataset over HTTP. Use `--input <path>`
//! to read a local `cities.json` (or `.json.gz` with the `compact`
//! feature) instead. Favorites persist under `--data-dir` (defaulting to
//! the platform data directory).
mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use citydex_core::{
    BlobStore, City, CityCatalog, FavoritesStore, FileRecordProvider, FileStore, RecordProvider,
    SearchService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let provider = make_provider(args.input)?;
    let catalog = Arc::new(CityCatalog::new(provider));
    let service = SearchService::new(Arc::clone(&catalog));
    let favorites = FavoritesStore::new(Arc::new(FileStore::new(data_dir(args.data_dir)))
        as Arc<dyn BlobStore>);

    match args.command {
        Commands::Stats => {
            service.load_all_cities().await?;
            let stats = catalog.stats();
            println!("Catalog statistics:");
            println!("  Cities: {}", stats.cities);
            println!("  Favorites: {}", favorites.favorites().len());
        }

        Commands::List { limit } => {
            let cities = service.load_all_cities().await?;
            print_cities(cities.iter().take(limit), &favorites);
            if cities.len() > limit {
                println!("... and {} more", cities.len() - limit);
            }
        }

        Commands::Search { prefix } => {
            service.load_all_cities().await?;
            let hits = service.execute(&prefix);
            if hits.is_empty() {
                println!("No cities match {prefix:?}");
            } else {
                print_cities(hits.iter(), &favorites);
            }
        }

        Commands::Fav { id } => {
            if favorites.toggle_favorite(id) {
                println!("City {id} is now a favorite");
            } else {
                println!("City {id} is no longer a favorite");
            }
        }

        Commands::Favorites => {
            let cities = service.load_all_cities().await?;
            let mine = favorites.filter_favorites(&cities);
            if mine.is_empty() {
                println!("No favorites yet");
            } else {
                print_cities(mine.iter(), &favorites);
            }
        }
    }

    Ok(())
}

fn print_cities<'a>(cities: impl Iterator<Item = &'a City>, favorites: &FavoritesStore) {
    for city in cities {
        let star = if favorites.is_favorite(city.id) { "*" } else { " " };
        println!(
            "{star} {} ({:.4}, {:.4})",
            city.display_name(),
            city.coord.latitude,
            city.coord.longitude
        );
    }
}

fn make_provider(input: Option<PathBuf>) -> anyhow::Result<Box<dyn RecordProvider>> {
    if let Some(path) = input {
        return Ok(Box::new(FileRecordProvider::new(path)));
    }

    #[cfg(feature = "fetch")]
    {
        Ok(Box::new(citydex_core::HttpRecordProvider::new()))
    }
    #[cfg(not(feature = "fetch"))]
    {
        anyhow::bail!("no --input given and this build was compiled without the 'fetch' feature")
    }
}

fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    let dir = flag.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("citydex")
    });
    log::debug!("favorites data dir: {}", dir.display());
    dir
}
