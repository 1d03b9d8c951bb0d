#[tokio::main]
async fn main() {
    if let Err(e) = medicloud_lib::run().await {
        eprintln!("medicloud: {e}");
        std::process::exit(1);
    }
}
