mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{call, get, login, sqlite_app};

#[tokio::test]
async fn test_home_renders_stored_content() {
    let app = sqlite_app();
    let cookie = login(&app).await;

    let writes = [
        ("/api/about", json!({ "title": "Jane Doe", "description": "I build things." })),
        (
            "/api/projects",
            json!({
                "title": "Tracker",
                "description": "Habit tracker",
                "image_url": "https://img.example/t.png",
                "technologies": ["Flutter", "Dart"],
                "featured": true,
            }),
        ),
        ("/api/skills", json!({ "name": "Flutter", "category": "Mobile" })),
        ("/api/social-links", json!({ "platform": "LinkedIn", "url": "https://linkedin.com/in/jane" })),
        ("/api/timeline", json!({ "year": 2023, "title": "Joined Acme", "description": "Mobile lead" })),
        ("/api/certificates", json!({ "name": "Cloud Practitioner", "issuer": "AWS" })),
    ];
    for (uri, body) in writes {
        let method = if uri == "/api/about" { Method::PUT } else { Method::POST };
        let reply = call(&app, method, uri, Some(&cookie), Some(body)).await;
        assert!(reply.status.is_success(), "{}: {}", uri, reply.body);
    }

    let home = get(&app, "/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    for needle in ["Jane Doe", "Tracker", "Flutter", "Joined Acme", "Cloud Practitioner", "icon-linkedin"] {
        assert!(home.body.contains(needle), "home is missing {}", needle);
    }
    assert!(!home.body.contains("Setup Required"));

    let showcase = get(&app, "/portfolio").await;
    assert_eq!(showcase.status, StatusCode::OK);
    assert!(showcase.body.contains("Jane Doe"));
    assert!(showcase.body.contains("Mobile"));
}

#[tokio::test]
async fn test_user_content_is_escaped() {
    let app = sqlite_app();
    let cookie = login(&app).await;

    let reply = call(
        &app,
        Method::PUT,
        "/api/about",
        Some(&cookie),
        Some(json!({ "title": "<script>alert(1)</script>", "description": "x" })),
    )
    .await;
    assert!(reply.status.is_success());

    let home = get(&app, "/").await;
    assert!(!home.body.contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn test_assets_are_served() {
    let app = sqlite_app();
    let css = get(&app, "/assets/css/site.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert_eq!(css.headers[header::CONTENT_TYPE], "text/css");

    assert_eq!(get(&app, "/assets/missing.png").await.status, StatusCode::NOT_FOUND);
}
