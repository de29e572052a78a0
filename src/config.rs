use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "folio", about = "A personal portfolio site with an admin dashboard")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// SQLite file holding the content tables
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Hosted store endpoint
    #[arg(long, env = "FOLIO_STORE_URL")]
    pub store_url: Option<String>,

    /// Public read key for the hosted store
    #[arg(long, env = "FOLIO_STORE_ANON_KEY", hide_env_values = true)]
    pub store_anon_key: Option<String>,

    /// Elevated server-side key for the hosted store
    #[arg(long, env = "FOLIO_STORE_SERVICE_KEY", hide_env_values = true)]
    pub store_service_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub session_hours: u64,
    /// Mark the session cookie `Secure`; turn on when served over HTTPS.
    pub secure_cookies: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    /// bcrypt hash; takes precedence over `password`.
    pub password_hash: Option<String>,
    pub password: Option<String>,
}

/// Where content is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Rest { url: String, key: String },
    Sqlite(PathBuf),
    NotConfigured,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "admin-session".to_string(),
            session_hours: 24,
            secure_cookies: false,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password_hash: None,
            password: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref path) = cli.database {
            config.database.path = Some(path.clone());
        }
        if let Some(url) = non_empty(cli.store_url.clone()) {
            config.store.url = Some(url);
        }
        if let Some(key) = non_empty(cli.store_anon_key.clone()) {
            config.store.anon_key = Some(key);
        }
        if let Some(key) = non_empty(cli.store_service_key.clone()) {
            config.store.service_key = Some(key);
        }

        // Relative database paths live in the data dir
        if let Some(path) = config.database.path.take() {
            config.database.path = Some(if path.is_relative() {
                data_dir.join(path)
            } else {
                path
            });
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".folio"))
                .unwrap_or_else(|| PathBuf::from(".folio"))
        })
    }

    /// The hosted store wins when it has an endpoint and a key; the elevated
    /// key is preferred over the public one.
    pub fn backend(&self) -> Backend {
        let url = non_empty(self.store.url.clone());
        let key = non_empty(self.store.service_key.clone())
            .or_else(|| non_empty(self.store.anon_key.clone()));

        match (url, key, &self.database.path) {
            (Some(url), Some(key), _) => Backend::Rest { url, key },
            (_, _, Some(path)) => Backend::Sqlite(path.clone()),
            _ => Backend::NotConfigured,
        }
    }
}
