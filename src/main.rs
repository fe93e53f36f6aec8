#[tokio::main]
async fn main() {
    if let Err(e) = organizamed_lib::run().await {
        tracing::error!("OrganizaMed failed: {e}");
        eprintln!("organizamed: {e}");
        std::process::exit(1);
    }
}
