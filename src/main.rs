use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    daylist::cli::run().await
}
