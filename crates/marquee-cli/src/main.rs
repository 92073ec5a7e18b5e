//! Binary entrypoint for the Marquee CLI.

#[tokio::main]
async fn main() {
    std::process::exit(marquee_cli::run().await);
}
