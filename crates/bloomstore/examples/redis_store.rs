use bloomstore::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    println!("Connecting to Redis at {}", redis_url);

    let config = RedisConfig::new(redis_url).pool_size(5).prefix("bloom");

    match RedisStore::new(config).await {
        Ok(store) => {
            let engine = FilterEngine::new(store);

            engine
                .create("seen_events", FilterParams::new(100_000, 0.01).reset())
                .await?;

            engine.add("seen_events", "event:42")?;
            engine.add("seen_events", "event:43")?;

            println!(
                "event:42 -> {}",
                engine.contains("seen_events", "event:42")?
            );
            println!(
                "event:99 -> {}",
                engine.contains("seen_events", "event:99")?
            );

            // Flush current bits to Redis, then revive in a fresh engine
            // to simulate a restart.
            engine.persist("seen_events").await?;

            let revived = FilterEngine::new(RedisStore::new(RedisConfig::default()).await?);
            revived.load("seen_events").await?;
            println!(
                "after reload, event:42 -> {}",
                revived.contains("seen_events", "event:42")?
            );

            println!("stored filters: {:?}", engine.stored_names().await?);
        }
        Err(e) => {
            eprintln!("Failed to connect to Redis: {}", e);
            println!("Make sure Redis is running at 127.0.0.1:6379 or set REDIS_URL");
        }
    }

    Ok(())
}
