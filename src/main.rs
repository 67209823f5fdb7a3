use colored::Colorize;

use kubelab_deployer::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    if let Err(e) = cli::run().await {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}
