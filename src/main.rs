#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = elearn_store::run().await {
        eprintln!("elearn-store fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
