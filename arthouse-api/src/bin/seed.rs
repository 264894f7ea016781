//! Arthouse seed loader
//!
//! Usage: `arthouse-seed <data-dir>`
//!
//! Loads `artists.json`, `artworks.json` and `exhibitions.json` from the
//! directory into the store named by `STORE_URI`. Only persistent stores keep
//! the result, so point `STORE_URI` at an `lmdb://` directory.

use std::path::PathBuf;

use arthouse_api::seed::{load_dir, seed_catalog};
use arthouse_api::telemetry::{init_tracing, TelemetryConfig};
use arthouse_api::{AppConfig, StoreUri};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&TelemetryConfig::default())?;

    let dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => {
            eprintln!("usage: arthouse-seed <data-dir>");
            std::process::exit(2);
        }
    };

    let config = AppConfig::from_env()?;
    if config.store.uri == StoreUri::Memory {
        tracing::warn!("STORE_URI is memory://, seeded data will be discarded on exit");
    }

    let data = load_dir(&dir)?;
    let db = config.store.connect()?;
    let summary = seed_catalog(db, data).await?;
    println!(
        "seeded {} artists, {} artworks, {} exhibitions from {}",
        summary.artists,
        summary.artworks,
        summary.exhibitions,
        dir.display()
    );
    Ok(())
}
