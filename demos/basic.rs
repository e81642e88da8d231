use faregate::Faregate;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), faregate::Error> {
    helpers::init_logging();

    let gate = Faregate::builder()
        .refresh_interval(Duration::from_secs(1))
        .token_count(100)
        .build()?;

    // Should take a little over three seconds in total.
    for i in 0..100u64 {
        let count = (i * 7 + 3) % 10;

        match gate.acquire(count).await {
            Ok(completion) => {
                completion.wait().await?;
                println!("acquired {count}");
            }
            Err(error) => println!("skipped {count}: {error}"),
        }
    }

    gate.close();
    Ok(())
}
