use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

/// Server-held admin sessions keyed by opaque token, holding the moment
/// each one started.
pub struct SessionStore {
    sessions: HashMap<String, Instant>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(hours: u64) -> Self {
        Self::with_ttl(Duration::from_secs(hours.saturating_mul(3600)))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Start a session and return its token.
    pub fn create(&mut self) -> String {
        self.clear_stale();

        let token = generate_token();
        self.sessions.insert(token.clone(), Instant::now());
        token
    }

    pub fn is_valid(&mut self, token: &str) -> bool {
        self.clear_stale();
        self.sessions.contains_key(token)
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&mut self, token: &str) -> bool {
        self.clear_stale();
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn clear_stale(&mut self) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, started| started.elapsed() < ttl);
        let purged = before - self.sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired admin sessions", purged);
        }
    }
}

/// Generate a cryptographically random 32-byte hex token.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generate_token_is_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
    }

    #[test]
    fn created_session_is_valid_until_removed() {
        let mut store = SessionStore::new(24);
        let token = store.create();
        assert!(store.is_valid(&token));
        assert!(!store.is_valid("not-a-token"));

        assert!(store.remove(&token));
        assert!(!store.is_valid(&token));
        assert!(!store.remove(&token));
    }

    #[test]
    fn expired_sessions_are_purged() {
        let mut store = SessionStore::with_ttl(Duration::from_millis(10));
        let token = store.create();
        std::thread::sleep(Duration::from_millis(30));

        assert!(!store.is_valid(&token));
        assert!(store.is_empty());
    }

    #[test]
    fn huge_ttl_never_overflows() {
        let mut store = SessionStore::new(u64::MAX);
        let token = store.create();
        assert!(store.is_valid(&token));

        let mut store = SessionStore::with_ttl(Duration::MAX);
        let token = store.create();
        assert!(store.is_valid(&token));
    }

    #[test]
    fn sessions_are_independent() {
        let mut store = SessionStore::new(1);
        let first = store.create();
        let second = store.create();
        assert_eq!(store.len(), 2);

        store.remove(&first);
        assert!(store.is_valid(&second));
    }
}
