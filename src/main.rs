use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::auth::credentials::Credentials;
use folio::config::{Backend, Cli, Config};
use folio::content::ContentRepository;
use folio::db;
use folio::routes;
use folio::state::AppState;
use folio::store::{ContentStore, RestStore, SqliteStore, UnconfiguredStore};

fn open_store(backend: &Backend) -> anyhow::Result<Arc<dyn ContentStore>> {
    Ok(match backend {
        Backend::Rest { url, key } => {
            tracing::info!("Content store: {}", url);
            Arc::new(RestStore::new(url, key.clone())?)
        }
        Backend::Sqlite(path) => {
            tracing::info!("Content store: {}", path.display());
            let pool = db::create_pool(path)?;
            db::run_migrations(&pool)?;
            Arc::new(SqliteStore::new(pool))
        }
        Backend::NotConfigured => {
            tracing::warn!(
                "No content store configured; pages render empty and edits are refused"
            );
            Arc::new(UnconfiguredStore)
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    if !Credentials::from_config(&config.admin).is_set() {
        tracing::warn!(
            "No admin password configured; set admin.password_hash or admin.password to sign in"
        );
    }

    let store = open_store(&config.backend())?;
    let state = AppState::new(config.clone(), ContentRepository::new(store));
    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
