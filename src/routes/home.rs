use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::content::{
    About, Certificate, Project, Skill, SocialLink, Snapshot, TimelineEvent,
};
use crate::state::AppState;

/// Projects show this many technology badges before collapsing the rest.
const BADGE_LIMIT: usize = 4;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub configured: bool,
    pub view: PortfolioView,
}

#[derive(Template)]
#[template(path = "pages/showcase.html")]
pub struct ShowcaseTemplate {
    pub configured: bool,
    pub view: PortfolioView,
}

// -- View models --

pub struct Profile {
    pub name: String,
    pub bio: String,
    pub image_url: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub badges: Vec<String>,
    /// Technologies beyond the badge limit.
    pub more: usize,
    pub github_url: String,
    pub live_url: String,
    pub featured: bool,
}

pub struct SkillBar {
    pub name: String,
    pub level: i32,
    pub icon: String,
}

pub struct SkillGroup {
    pub category: &'static str,
    pub skills: Vec<SkillBar>,
}

pub struct EventItem {
    pub title: String,
    pub description: String,
    pub kind: &'static str,
}

pub struct YearGroup {
    pub year: i32,
    pub events: Vec<EventItem>,
}

pub struct LinkItem {
    pub platform: String,
    pub url: String,
    pub icon: &'static str,
}

pub struct CertificateCard {
    pub name: String,
    pub issuer: String,
    pub description: String,
    pub image_url: String,
    pub credential_url: String,
    pub issued: String,
    pub expires: String,
}

/// Everything the public layouts render, flattened for templates.
pub struct PortfolioView {
    pub configured: bool,
    pub profile: Profile,
    pub projects: Vec<ProjectCard>,
    pub featured: Vec<ProjectCard>,
    pub skill_groups: Vec<SkillGroup>,
    pub years: Vec<YearGroup>,
    pub links: Vec<LinkItem>,
    pub certificates: Vec<CertificateCard>,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Profile {
    fn from_about(about: Option<&About>) -> Self {
        match about {
            Some(about) => Self {
                name: about.title.clone(),
                bio: about.description.clone(),
                image_url: text(&about.image_url),
                email: text(&about.email),
                phone: text(&about.phone),
                location: text(&about.location),
            },
            None => Self {
                name: "Your Name".to_string(),
                bio: "Tell visitors who you are from the admin dashboard.".to_string(),
                image_url: String::new(),
                email: String::new(),
                phone: String::new(),
                location: String::new(),
            },
        }
    }
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            image_url: project.image_url.clone(),
            badges: project
                .technologies
                .iter()
                .take(BADGE_LIMIT)
                .cloned()
                .collect(),
            more: project.technologies.len().saturating_sub(BADGE_LIMIT),
            github_url: text(&project.github_url),
            live_url: text(&project.live_url),
            featured: project.featured,
        }
    }
}

impl From<&SocialLink> for LinkItem {
    fn from(link: &SocialLink) -> Self {
        Self {
            platform: link.platform.clone(),
            url: link.url.clone(),
            icon: link.icon_or_guess().key(),
        }
    }
}

impl From<&Certificate> for CertificateCard {
    fn from(cert: &Certificate) -> Self {
        let month = |d: &Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%b %Y").to_string()).unwrap_or_default()
        };
        Self {
            name: cert.name.clone(),
            issuer: cert.issuer.clone(),
            description: text(&cert.description),
            image_url: text(&cert.image_url),
            credential_url: text(&cert.credential_url),
            issued: month(&cert.issue_date),
            expires: month(&cert.expiry_date),
        }
    }
}

/// Group skills by category in list order.
pub fn group_skills(skills: &[Skill]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        let bar = SkillBar {
            name: skill.name.clone(),
            level: skill.level,
            icon: text(&skill.icon),
        };
        match groups
            .iter_mut()
            .find(|g| g.category == skill.category.as_str())
        {
            Some(group) => group.skills.push(bar),
            None => groups.push(SkillGroup {
                category: skill.category.as_str(),
                skills: vec![bar],
            }),
        }
    }
    groups
}

/// Group timeline events by year in list order.
pub fn group_timeline(events: &[TimelineEvent]) -> Vec<YearGroup> {
    let mut years: Vec<YearGroup> = Vec::new();
    for event in events {
        let item = EventItem {
            title: event.title.clone(),
            description: event.description.clone(),
            kind: event.kind.as_str(),
        };
        match years.iter_mut().find(|y| y.year == event.year) {
            Some(year) => year.events.push(item),
            None => years.push(YearGroup {
                year: event.year,
                events: vec![item],
            }),
        }
    }
    years
}

impl From<Snapshot> for PortfolioView {
    fn from(snapshot: Snapshot) -> Self {
        let projects: Vec<ProjectCard> = snapshot.projects.iter().map(ProjectCard::from).collect();
        let featured = snapshot
            .projects
            .iter()
            .filter(|p| p.featured)
            .map(ProjectCard::from)
            .collect();

        Self {
            configured: snapshot.configured,
            profile: Profile::from_about(snapshot.about.as_ref()),
            projects,
            featured,
            skill_groups: group_skills(&snapshot.skills),
            years: group_timeline(&snapshot.timeline),
            links: snapshot.social_links.iter().map(LinkItem::from).collect(),
            certificates: snapshot
                .certificates
                .iter()
                .map(CertificateCard::from)
                .collect(),
        }
    }
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    let view = PortfolioView::from(state.content.snapshot().await);
    Html(HomeTemplate {
        configured: view.configured,
        view,
    })
    .into_response()
}

/// GET /portfolio
pub async fn showcase(State(state): State<AppState>) -> Response {
    let view = PortfolioView::from(state.content.snapshot().await);
    Html(ShowcaseTemplate {
        configured: view.configured,
        view,
    })
    .into_response()
}
