#[tokio::main]
async fn main() {
    pms_backoffice::run().await;
}
