#[tokio::main]
async fn main() -> anyhow::Result<()> {
    menutray_lib::run().await
}
