use axum::http::{header, HeaderMap};

use crate::config::AuthConfig;

pub fn session_cookie(auth: &AuthConfig, token: &str) -> String {
    let max_age_secs = auth.session_hours.saturating_mul(3600);
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        auth.cookie_name, token, max_age_secs
    );
    if auth.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(auth: &AuthConfig) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        auth.cookie_name
    );
    if auth.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn get_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name && !val.is_empty() {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_http_only_with_ttl() {
        let auth = AuthConfig::default();
        assert_eq!(
            session_cookie(&auth, "abc"),
            "admin-session=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400"
        );
    }

    #[test]
    fn secure_flag_follows_config() {
        let auth = AuthConfig {
            secure_cookies: true,
            ..AuthConfig::default()
        };
        assert!(session_cookie(&auth, "abc").ends_with("; Secure"));
        assert!(clear_session_cookie(&auth).contains("Max-Age=0"));
    }

    #[test]
    fn oversized_session_hours_saturate() {
        let auth = AuthConfig {
            session_hours: u64::MAX,
            ..AuthConfig::default()
        };
        assert!(session_cookie(&auth, "abc").ends_with(&format!("Max-Age={}", u64::MAX)));
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin-session=tok123"),
        );
        assert_eq!(get_cookie_value(&headers, "admin-session"), Some("tok123"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_is_absent() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("admin-session="));
        assert_eq!(get_cookie_value(&headers, "admin-session"), None);
    }
}
