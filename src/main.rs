#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dex_top_traders::run().await?;
    Ok(())
}
