#[tokio::main]
async fn main() -> std::io::Result<()> {
    scheduling_backend::run().await
}
