//! Basic example demonstrating bloomstore with the memory store

use bloomstore::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== bloomstore Basic Example ===\n");

    // Create an engine over the in-memory store
    let engine = FilterEngine::new(MemoryStore::new());

    // Register a filter sized for 10k elements at 1% false positives
    println!("Creating filter 'ip_blacklist'...");
    engine
        .create("ip_blacklist", FilterParams::new(10_000, 0.01))
        .await?;

    // Add some elements
    println!("Adding elements...");
    engine.add("ip_blacklist", "203.0.113.7")?;
    engine.add("ip_blacklist", "198.51.100.23")?;
    for i in 0..1_000u64 {
        engine.add("ip_blacklist", &i)?;
    }

    // Query membership
    println!("\nMembership queries:");
    println!(
        "   203.0.113.7   -> {}",
        engine.contains("ip_blacklist", "203.0.113.7")?
    );
    println!(
        "   192.0.2.1     -> {}",
        engine.contains("ip_blacklist", "192.0.2.1")?
    );
    println!("   count         -> {}", engine.count("ip_blacklist")?);

    // Inspect filter statistics
    let stats = engine.stats("ip_blacklist")?;
    println!("\n📊 Filter Statistics:");
    println!("   Bits: {}", stats.bits);
    println!("   Hash functions: {}", stats.hashes);
    println!("   Bits set: {}", stats.bits_set);
    println!("   Fill ratio: {:.4}", stats.fill_ratio());
    println!("   Estimated FPP: {:.6}", stats.estimated_fpp());

    // Persist and revive in a second engine over the same store
    println!("\n--- Persist / Load ---");
    engine.persist("ip_blacklist").await?;

    // Clear keeps the name registered but empties the bit array
    engine.clear("ip_blacklist")?;
    println!("   After clear, count: {}", engine.count("ip_blacklist")?);

    // Delete is terminal
    engine.delete("ip_blacklist").await?;
    println!("   After delete, live filters: {}", engine.len());

    // Demonstrate a namespaced engine
    println!("\n--- Namespaced Engine ---");
    let namespaced = FilterEngine::with_config(
        MemoryStore::new(),
        EngineConfig::with_namespace("tenant_a"),
    );
    namespaced
        .create("seen_urls", FilterParams::new(1_000, 0.001))
        .await?;
    namespaced.add("seen_urls", "https://example.com/")?;
    println!(
        "   seen_urls contains example.com: {}",
        namespaced.contains("seen_urls", "https://example.com/")?
    );
    println!("   stored names: {:?}", namespaced.stored_names().await?);

    println!("\n=== Example Complete ===");
    Ok(())
}
