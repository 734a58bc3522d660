use stock_link::Config;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Load configuration from CLI, environment and/or config file
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(error) = stock_link::run(config).await {
        error!(%error, "Server stopped");
        std::process::exit(1);
    }
}
