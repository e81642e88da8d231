use faregate::Faregate;
use tokio::time::{self, Duration, Instant};

const INTERVAL: Duration = Duration::from_millis(100);

#[tokio::test(start_paused = true)]
async fn test_fast_path_is_immediate() -> anyhow::Result<()> {
    let gate = Faregate::builder()
        .refresh_interval(INTERVAL)
        .token_count(10)
        .build()?;

    let start = Instant::now();

    gate.acquire_and_wait(4).await?;
    gate.acquire_and_wait(6).await?;
    assert_eq!(Instant::now().duration_since(start), Duration::ZERO);

    // The bucket is empty, so this has to wait for the next refill.
    gate.acquire_and_wait(1).await?;
    assert_eq!(Instant::now().duration_since(start), INTERVAL);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_one_refill_per_interval() -> anyhow::Result<()> {
    let gate = Faregate::builder()
        .refresh_interval(INTERVAL)
        .token_count(1)
        .build()?;

    let start = Instant::now();

    for n in 0..5u32 {
        gate.acquire_one().await?.wait().await?;
        assert_eq!(Instant::now().duration_since(start), INTERVAL * n);
    }

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_idle_does_not_accumulate() -> anyhow::Result<()> {
    let gate = Faregate::builder()
        .refresh_interval(INTERVAL)
        .token_count(2)
        .build()?;

    // Ten refills pass, but the bucket never holds more than two tokens.
    time::sleep(Duration::from_millis(1050)).await;

    let start = Instant::now();

    gate.acquire_and_wait(1).await?;
    gate.acquire_and_wait(1).await?;
    assert_eq!(Instant::now().duration_since(start), Duration::ZERO);

    gate.acquire_and_wait(1).await?;
    assert_eq!(
        Instant::now().duration_since(start),
        Duration::from_millis(50)
    );
    Ok(())
}

/// Tokens are deducted even if nobody waits for the grant.
#[tokio::test(start_paused = true)]
async fn test_dropped_completion_keeps_tokens() -> anyhow::Result<()> {
    let gate = Faregate::builder()
        .refresh_interval(INTERVAL)
        .token_count(2)
        .build()?;

    let start = Instant::now();

    drop(gate.acquire(2).await?);

    gate.acquire_and_wait(1).await?;
    assert_eq!(Instant::now().duration_since(start), INTERVAL);
    Ok(())
}

/// A stalled timer refills once when it catches up, not once per missed
/// interval.
#[tokio::test(start_paused = true)]
async fn test_missed_ticks_refill_once() -> anyhow::Result<()> {
    let gate = Faregate::builder()
        .refresh_interval(INTERVAL)
        .token_count(1)
        .build()?;

    gate.acquire_and_wait(1).await?;

    let mut waiting = Vec::new();

    for _ in 0..5 {
        waiting.push(gate.acquire(1).await?);
    }

    // Let the controller move everything into the backlog.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    time::advance(Duration::from_millis(350)).await;

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let granted = waiting.iter().filter(|c| c.is_granted()).count();
    assert_eq!(granted, 1);
    Ok(())
}
