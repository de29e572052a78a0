use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::{CookieProbe, GuardState, SessionGuard};
use crate::content::{About, SkillCategory, SocialIcon, Snapshot};
use crate::extractors::SessionToken;
use crate::routes::home::Html;
use crate::state::AppState;

const ICONS: [SocialIcon; 8] = [
    SocialIcon::Linkedin,
    SocialIcon::Github,
    SocialIcon::Email,
    SocialIcon::Whatsapp,
    SocialIcon::Instagram,
    SocialIcon::Twitter,
    SocialIcon::Phone,
    SocialIcon::Link,
];

#[derive(Template)]
#[template(path = "pages/signin_required.html")]
pub struct SignInRequiredTemplate {
    pub configured: bool,
}

#[derive(Template)]
#[template(path = "pages/admin.html")]
pub struct AdminTemplate {
    pub configured: bool,
    pub about: AboutForm,
    pub projects: Vec<ProjectRow>,
    pub skills: Vec<SkillRow>,
    pub timeline: Vec<EventRow>,
    pub certificates: Vec<CertificateRow>,
    pub links: Vec<LinkRow>,
    pub categories: Vec<&'static str>,
    pub icons: Vec<&'static str>,
    /// Snapshot for the edit forms, safe to inline in a script tag.
    pub snapshot_json: String,
}

#[derive(Default)]
pub struct AboutForm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub technologies: String,
    pub featured: bool,
}

pub struct SkillRow {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub level: i32,
}

pub struct EventRow {
    pub id: String,
    pub year: i32,
    pub title: String,
    pub kind: &'static str,
}

pub struct CertificateRow {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub issued: String,
}

pub struct LinkRow {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: &'static str,
}

impl From<Option<&About>> for AboutForm {
    fn from(about: Option<&About>) -> Self {
        let Some(about) = about else {
            return Self::default();
        };
        Self {
            title: about.title.clone(),
            description: about.description.clone(),
            image_url: about.image_url.clone().unwrap_or_default(),
            email: about.email.clone().unwrap_or_default(),
            phone: about.phone.clone().unwrap_or_default(),
            location: about.location.clone().unwrap_or_default(),
        }
    }
}

/// JSON for embedding inside `<script>`; `<` is escaped so the payload
/// cannot close the tag.
pub fn script_json(snapshot: &Snapshot) -> String {
    match serde_json::to_string(snapshot) {
        Ok(json) => json.replace('<', "\\u003c"),
        Err(e) => {
            tracing::error!("Failed to serialize dashboard snapshot: {}", e);
            "{}".to_string()
        }
    }
}

impl From<Snapshot> for AdminTemplate {
    fn from(snapshot: Snapshot) -> Self {
        let snapshot_json = script_json(&snapshot);
        Self {
            configured: snapshot.configured,
            about: AboutForm::from(snapshot.about.as_ref()),
            projects: snapshot
                .projects
                .iter()
                .map(|p| ProjectRow {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    technologies: p.technologies.join(", "),
                    featured: p.featured,
                })
                .collect(),
            skills: snapshot
                .skills
                .iter()
                .map(|s| SkillRow {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    category: s.category.as_str(),
                    level: s.level,
                })
                .collect(),
            timeline: snapshot
                .timeline
                .iter()
                .map(|t| EventRow {
                    id: t.id.clone(),
                    year: t.year,
                    title: t.title.clone(),
                    kind: t.kind.as_str(),
                })
                .collect(),
            certificates: snapshot
                .certificates
                .iter()
                .map(|c| CertificateRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    issuer: c.issuer.clone(),
                    issued: c
                        .issue_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                })
                .collect(),
            links: snapshot
                .social_links
                .iter()
                .map(|l| LinkRow {
                    id: l.id.clone(),
                    platform: l.platform.clone(),
                    url: l.url.clone(),
                    icon: l.icon_or_guess().key(),
                })
                .collect(),
            categories: SkillCategory::ALL.iter().map(|c| c.as_str()).collect(),
            icons: ICONS.iter().map(|i| i.key()).collect(),
            snapshot_json,
        }
    }
}

/// GET /admin. Guarded: content is only loaded once the session checks out.
pub async fn dashboard(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Response {
    let mut guard = SessionGuard::new();
    let probe = CookieProbe::new(&state.sessions, token.as_deref());

    match guard.resolve(&probe).await {
        GuardState::Authenticated => {
            let snapshot = state.content.snapshot().await;
            Html(AdminTemplate::from(snapshot)).into_response()
        }
        _ => Html(SignInRequiredTemplate {
            configured: state.content.is_configured(),
        })
        .into_response(),
    }
}

/// GET /admin-dashboard
pub async fn legacy_dashboard() -> Redirect {
    Redirect::permanent("/admin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Project;
    use chrono::Utc;

    #[test]
    fn script_json_cannot_close_the_tag() {
        let snapshot = Snapshot {
            configured: true,
            projects: vec![Project {
                id: "p".into(),
                title: "</script><script>alert(1)</script>".into(),
                description: "x".into(),
                image_url: "x".into(),
                technologies: vec!["Rust".into()],
                github_url: None,
                live_url: None,
                featured: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            ..Snapshot::default()
        };
        let json = script_json(&snapshot);
        assert!(!json.contains("</script>"));

        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back["projects"][0]["title"],
            "</script><script>alert(1)</script>"
        );
    }

    #[test]
    fn dashboard_lists_every_section() {
        let html = AdminTemplate::from(Snapshot {
            configured: true,
            ..Snapshot::default()
        })
        .render()
        .unwrap();
        for id in ["about", "projects", "skills", "timeline", "certificates", "social-links"] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        }
        assert!(!html.contains("Setup Required"));
    }

    #[test]
    fn sign_in_view_links_to_login() {
        let html = SignInRequiredTemplate { configured: true }.render().unwrap();
        assert!(html.contains("/admin/login"));
    }
}
