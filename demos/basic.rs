//! Basic example of building a partition map and resolving keys.

use rangeshard::partitioning::Algorithm;
use rangeshard::{PartitionConfig, PartitionMap};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("rangeshard=debug,info")
        .init();

    let config = PartitionConfig::new("key_store", 100)
        .with_label_prefix("partition")
        .with_algorithm(Algorithm::Md5);

    let map = PartitionMap::from_config(&config)?;

    println!("Partition map {} ({} partitions, {}):", map.name(), map.len(), map.space().name());
    println!("{}", map.to_record().to_json_pretty()?);

    println!("\n--- Resolving keys ---");
    for key in ["nagarajan", "user:123", "order:98765"] {
        let digest = map.key_digest(key.as_bytes())?;
        let partition = map.resolve(key.as_bytes())?;
        println!("{:<12} digest={:032x} -> {}", key, digest, partition);
    }

    if let Err(e) = map.resolve(b"") {
        println!("empty key rejected: {}", e);
    }

    let stats = map.metrics().snapshot();
    println!("\nResolution stats:");
    println!("  Resolved: {}", stats.resolved);
    println!("  Rejected: {}", stats.rejected);
    for (label, hits) in stats.hits.iter().filter(|(_, hits)| *hits > 0) {
        println!("  {}: {}", label, hits);
    }

    Ok(())
}
