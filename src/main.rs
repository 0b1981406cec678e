use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use recx_api::RestApi;
use recx_core::{ClusterConfig, Recommender, RecommenderConfig};
use recx_storage::CatalogLoader;

/// Content-based product recommendation server
#[derive(Parser, Debug)]
#[command(name = "recx")]
#[command(about = "Serve product recommendations from a static catalog", long_about = None)]
struct Args {
    /// Path to the catalog file (.csv or .json)
    #[arg(short, long, default_value = "./products.csv")]
    catalog: PathBuf,

    /// Address to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Number of k-means clusters computed over the catalog
    #[arg(long, default_value_t = 10)]
    clusters: usize,

    /// Seed for cluster initialization
    #[arg(long, default_value_t = 42)]
    cluster_seed: u64,

    /// Independent k-means restarts
    #[arg(long, default_value_t = 10)]
    cluster_restarts: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting recx v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);
    info!("HTTP API port: {}", args.http_port);

    let records = CatalogLoader::load(&args.catalog)?;

    let config = RecommenderConfig {
        clusters: ClusterConfig {
            n_clusters: args.clusters,
            seed: args.cluster_seed,
            n_init: args.cluster_restarts,
            ..ClusterConfig::default()
        },
        ..RecommenderConfig::default()
    };
    let recommender = Arc::new(
        tokio::task::spawn_blocking(move || Recommender::build(records, config)).await??,
    );
    info!("Recommender ready: {} products", recommender.catalog().len());

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(RestApi::start(recommender, host, http_port))
    });

    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match result {
                Ok(Ok(Err(e))) => return Err(anyhow::anyhow!("HTTP server error: {}", e)),
                Ok(Err(_)) => return Err(anyhow::anyhow!("HTTP server thread panicked")),
                _ => info!("HTTP server stopped"),
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
