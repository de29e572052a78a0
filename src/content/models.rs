use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::input::{
    AboutPatch, CertificatePatch, IntoRow, NewAbout, NewCertificate, NewProject, NewSkill,
    NewSocialLink, NewTimelineEvent, ProjectPatch, SkillPatch, SocialLinkPatch,
    TimelineEventPatch,
};
use super::social::SocialIcon;
use crate::store::Table;

/// A record kind stored in one content table.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: Table;
    /// Lower-case singular name used in messages.
    const LABEL: &'static str;

    type Create: IntoRow + DeserializeOwned + Send + 'static;
    type Patch: IntoRow + DeserializeOwned + Send + 'static;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Mobile,
    Tools,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Mobile,
        SkillCategory::Tools,
        SkillCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Mobile => "Mobile",
            SkillCategory::Tools => "Tools",
            SkillCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    #[default]
    Experience,
    Education,
    Achievement,
}

impl TimelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineKind::Experience => "experience",
            TimelineKind::Education => "education",
            TimelineKind::Achievement => "achievement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    /// Percentage shown as a bar; the admin form keeps it within 1..=100.
    pub level: i32,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: Option<SocialIcon>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SocialLink {
    /// Stored icon, or a guess from the platform name for rows written
    /// before icons were resolved on save.
    pub fn icon_or_guess(&self) -> SocialIcon {
        self.icon
            .unwrap_or_else(|| SocialIcon::for_platform(&self.platform))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub year: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub credential_url: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Project {
    const TABLE: Table = Table::Projects;
    const LABEL: &'static str = "project";
    type Create = NewProject;
    type Patch = ProjectPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Skill {
    const TABLE: Table = Table::Skills;
    const LABEL: &'static str = "skill";
    type Create = NewSkill;
    type Patch = SkillPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for About {
    const TABLE: Table = Table::About;
    const LABEL: &'static str = "about";
    type Create = NewAbout;
    type Patch = AboutPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for SocialLink {
    const TABLE: Table = Table::SocialLinks;
    const LABEL: &'static str = "social link";
    type Create = NewSocialLink;
    type Patch = SocialLinkPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for TimelineEvent {
    const TABLE: Table = Table::Timeline;
    const LABEL: &'static str = "timeline event";
    type Create = NewTimelineEvent;
    type Patch = TimelineEventPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Certificate {
    const TABLE: Table = Table::Certificates;
    const LABEL: &'static str = "certificate";
    type Create = NewCertificate;
    type Patch = CertificatePatch;

    fn id(&self) -> &str {
        &self.id
    }
}
