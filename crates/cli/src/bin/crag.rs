use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    crag_cli::main_entry().await
}
