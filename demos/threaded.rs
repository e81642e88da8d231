use anyhow::Result;
use faregate::Faregate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    helpers::init_logging();

    let gate = Arc::new(
        Faregate::builder()
            .refresh_interval(Duration::from_millis(200))
            .token_count(100)
            .build()?,
    );

    let start = Instant::now();
    let mut tasks = Vec::new();

    for n in 0..10 {
        let gate = gate.clone();

        tasks.push(tokio::spawn(async move {
            for i in 0..10 {
                gate.acquire_and_wait(10).await?;
                println!("tick: {n}:{i}");
            }

            Ok::<_, faregate::Error>(())
        }));
    }

    for task in tasks {
        task.await??;
    }

    // One bucket up front, then nine refills.
    println!(
        "I made it in {:?}!",
        Instant::now().saturating_duration_since(start)
    );

    Ok(())
}
