use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tokio::sync::Mutex;

use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::content::ContentRepository;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub content: ContentRepository,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new(config: Config, content: ContentRepository) -> Self {
        let sessions = SessionStore::new(config.auth.session_hours);
        Self {
            config,
            content,
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }
}
