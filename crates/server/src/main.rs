#[tokio::main]
async fn main() -> anyhow::Result<()> {
    transit_composite_server::start().await
}
