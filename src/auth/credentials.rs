use tokio::task;

use crate::config::AdminConfig;

enum Secret {
    Hash(String),
    Plain(String),
    Missing,
}

/// The single admin account, as configured.
pub struct Credentials {
    username: String,
    secret: Secret,
}

impl Credentials {
    pub fn from_config(admin: &AdminConfig) -> Self {
        let secret = match (&admin.password_hash, &admin.password) {
            (Some(hash), _) if !hash.is_empty() => Secret::Hash(hash.clone()),
            (_, Some(password)) if !password.is_empty() => Secret::Plain(password.clone()),
            _ => Secret::Missing,
        };
        Self {
            username: admin.username.clone(),
            secret,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self.secret, Secret::Missing)
    }

    /// Exact username match plus a password check. Failures are not
    /// distinguished. bcrypt runs on the blocking pool.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        match &self.secret {
            Secret::Hash(hash) => {
                let password = password.to_string();
                let hash = hash.clone();
                match task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
                    Ok(Ok(matched)) => matched,
                    Ok(Err(e)) => {
                        tracing::warn!("Configured admin password hash is unusable: {}", e);
                        false
                    }
                    Err(e) => {
                        tracing::error!("Password check task failed: {}", e);
                        false
                    }
                }
            }
            Secret::Plain(expected) => password == expected,
            Secret::Missing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(password_hash: Option<&str>, password: Option<&str>) -> AdminConfig {
        AdminConfig {
            username: "admin".into(),
            password_hash: password_hash.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn plain_password_is_compared_exactly() {
        let creds = Credentials::from_config(&admin(None, Some("admin123")));
        assert!(creds.is_set());
        assert!(creds.verify("admin", "admin123").await);
        assert!(!creds.verify("admin", "admin123 ").await);
        assert!(!creds.verify("Admin", "admin123").await);
        assert!(!creds.verify("admin", "wrong").await);
    }

    #[tokio::test]
    async fn hash_takes_precedence_over_plain() {
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        let creds = Credentials::from_config(&admin(Some(&hash), Some("admin123")));
        assert!(creds.verify("admin", "s3cret").await);
        assert!(!creds.verify("admin", "admin123").await);
    }

    #[tokio::test]
    async fn malformed_hash_never_matches() {
        let creds = Credentials::from_config(&admin(Some("not-bcrypt"), None));
        assert!(!creds.verify("admin", "not-bcrypt").await);
    }

    #[tokio::test]
    async fn missing_secret_rejects_everything() {
        let creds = Credentials::from_config(&admin(None, Some("")));
        assert!(!creds.is_set());
        assert!(!creds.verify("admin", "").await);
    }

    #[tokio::test]
    async fn hash_check_leaves_the_runtime_free() {
        let hash = bcrypt::hash("s3cret", 10).unwrap();
        let creds = Credentials::from_config(&admin(Some(&hash), None));

        let start = std::time::Instant::now();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            start.elapsed()
        });

        assert!(creds.verify("admin", "s3cret").await);
        let verify_took = start.elapsed();
        let timer_fired = timer.await.unwrap();

        // The default test runtime has one thread, so the timer only fires
        // early if the hash ran somewhere else.
        assert!(
            timer_fired < verify_took,
            "timer fired after {:?}, verify took {:?}",
            timer_fired,
            verify_took
        );
    }
}
