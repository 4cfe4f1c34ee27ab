//! RecStore CLI - lookaside cache in front of a remote record store
//!
//! Constructs one shared store client, bulk-loads the cache, optionally
//! seeds demo records straight into the store, then serves the requested
//! point lookups through the cache.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use reccache::RecCache;
use recstore::{Record, RedisStore, DEFAULT_TIMEOUT};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Store URL
    #[arg(short, long, default_value = "redis://127.0.0.1:6379")]
    store: String,

    /// Logical database name
    #[arg(short, long, default_value = "testdb")]
    db: String,

    /// Collection name within the database
    #[arg(short, long, default_value = "products")]
    collection: String,

    /// Per-call store timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Seed demo records directly into the store before loading
    #[arg(long)]
    seed: bool,

    /// Keys to look up through the cache
    keys: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Connecting to store at {}", args.store);
    let store = Arc::new(
        RedisStore::connect(
            &args.store,
            &args.db,
            &args.collection,
            Duration::from_secs(args.timeout),
        )
        .await?,
    );

    if args.seed {
        let records = vec![
            Record::new("1", "Item1", "Value1"),
            Record::new("2", "Item2", "Value2"),
            Record::new("3", "Item3", "Value3"),
        ];
        store.insert_many(&records).await?;
        info!(
            "Seeded {} records into {}.{}",
            records.len(),
            args.db,
            args.collection
        );
    }

    let cache = RecCache::new(Arc::clone(&store) as Arc<dyn recstore::StoreClient>);

    match cache.load().await {
        Ok(()) => info!(
            "Loaded {} records from {}.{}",
            cache.len(),
            args.db,
            args.collection
        ),
        // Non-fatal: every lookup still falls through to the store
        Err(e) => warn!("Initial load failed, serving store-fallback only: {}", e),
    }

    let mut failed = false;
    for key in &args.keys {
        match cache.get(key).await {
            Ok(record) => println!("{}\t{}\t{}", record.key, record.name, record.value),
            Err(e) => {
                eprintln!("{}: {}", key, e);
                failed = true;
            }
        }
    }

    let stats = cache.stats();
    info!(
        "Cache: {} records, {} hits, {} misses ({:.0}% hit ratio)",
        cache.len(),
        stats.hits(),
        stats.misses(),
        stats.hit_ratio() * 100.0
    );

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
