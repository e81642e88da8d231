//! Throttles a stream of work items to `LIMIT` per second, the way a server
//! would throttle inbound requests: one token per unit of work, waiting for
//! the grant before handling it.

use anyhow::Result;
use faregate::Faregate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

const LIMIT: u64 = 60;
const WORKERS: usize = 5;
const ITEMS: usize = 300;

#[tokio::main]
async fn main() -> Result<()> {
    helpers::init_logging();

    let gate = Arc::new(
        Faregate::builder()
            .refresh_interval(Duration::from_secs(1))
            .token_count(LIMIT)
            .build()?,
    );

    let (tx, rx) = mpsc::channel::<usize>(WORKERS);
    let rx = Arc::new(tokio::sync::Mutex::new(rx));

    let start = Instant::now();
    let mut workers = Vec::new();

    for worker in 0..WORKERS {
        let gate = gate.clone();
        let rx = rx.clone();

        workers.push(tokio::spawn(async move {
            let mut handled = 0usize;

            loop {
                let Some(item) = rx.lock().await.recv().await else {
                    break;
                };

                let waiting = Instant::now();
                gate.acquire_and_wait(1).await?;

                println!(
                    "worker {worker}: item {item} after {:?}",
                    Instant::now().saturating_duration_since(waiting)
                );

                handled += 1;
            }

            Ok::<_, faregate::Error>(handled)
        }));
    }

    for item in 0..ITEMS {
        tx.send(item).await?;
    }

    drop(tx);

    let mut total = 0;

    for worker in workers {
        total += worker.await??;
    }

    let elapsed = Instant::now().saturating_duration_since(start);

    println!(
        "handled {total} items in {elapsed:?} ({:.2}/s)",
        total as f64 / elapsed.as_secs_f64()
    );

    gate.close();
    Ok(())
}
