use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use folio::cache;
use folio::config;
use folio::content::ContentRepo;
use folio::notion::NotionClient;
use folio::revalidate::Revalidator;
use folio::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(args.config.as_path()))?;
    cfg.ensure_dirs()?;

    let notion = Arc::new(NotionClient::new(
        cfg.notion.token.clone(),
        cfg.notion.version.clone(),
    ));
    let cache = cache::from_config(&cfg.cache);
    let repo = Arc::new(ContentRepo::new(
        notion,
        cache,
        cfg.notion.databases.clone(),
    ));
    let revalidator = Arc::new(Revalidator::new(cfg.revalidate.hook_url.clone()));

    let state = AppState {
        repo,
        revalidator,
        admin_secret: cfg.server.admin_secret.clone(),
        allow_open_admin: cfg.server.allow_open_admin,
    };

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr).await?;
    info!(addr = %cfg.server.bind_addr, "starting portfolio content server");
    axum::serve(listener, app).await?;

    Ok(())
}
