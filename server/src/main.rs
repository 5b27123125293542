use anyhow::Result;
use axum::Router;
use clap::Parser;
use server::{build_app, load_scoring, AppConfig};
use sitesearch_core::AnalyzerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sitesearch-server")]
#[command(about = "Serve ranked search over a generated site search store", long_about = None)]
struct Args {
    /// Store file: a JSON array or `var store = [...]`
    #[arg(long, default_value = "./assets/js/lunr/lunr-store.js")]
    store: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// JSON file overriding field weights and boosts
    #[arg(long)]
    scoring: Option<PathBuf>,
    /// Index words as written instead of stemming them
    #[arg(long, default_value_t = false)]
    no_stem: bool,
    /// Index common English words too
    #[arg(long, default_value_t = false)]
    keep_stopwords: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = AppConfig {
        scoring: load_scoring(args.scoring.as_deref())?,
        analyzer: AnalyzerConfig { stem: !args.no_stem, remove_stopwords: !args.keep_stopwords },
        store: args.store,
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
