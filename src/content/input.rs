//! Write payloads for the content tables.
//!
//! Create bodies validate required fields and normalise optional ones before
//! they are turned into rows; patch bodies only emit the keys they carry.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::models::{SkillCategory, TimelineKind};
use super::patch::PatchField;
use super::social::SocialIcon;
use crate::store::{Row, StoreError};

/// A write payload that can be turned into a store row.
pub trait IntoRow {
    fn into_row(self) -> Result<Row, StoreError>;
}

/// Project technologies, accepted either as a list or as comma-separated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TechnologiesInput")]
pub struct Technologies(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum TechnologiesInput {
    List(Vec<String>),
    Text(String),
}

impl From<TechnologiesInput> for Technologies {
    fn from(input: TechnologiesInput) -> Self {
        match input {
            TechnologiesInput::List(items) => Technologies::from_items(items),
            TechnologiesInput::Text(text) => Technologies::parse(&text),
        }
    }
}

impl Technologies {
    /// Split comma-separated input, trimming entries and dropping empty ones.
    pub fn parse(text: &str) -> Self {
        Self::from_items(text.split(','))
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Technologies(
            items
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    fn checked(self) -> Result<Vec<String>, StoreError> {
        if self.0.is_empty() {
            return Err(StoreError::Validation(
                "At least one technology is required".into(),
            ));
        }
        Ok(self.0)
    }
}

/// Treat `""` like an absent date; HTML date inputs submit empty strings.
fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn blank_date_patch<'de, D>(deserializer: D) -> Result<PatchField<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match blank_date(deserializer)? {
        Some(date) => PatchField::Value(date),
        None => PatchField::Null,
    })
}

fn default_level() -> i32 {
    80
}

/// Accumulates row columns while enforcing required/optional rules.
#[derive(Default)]
struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    fn required(mut self, key: &str, value: String) -> Result<Self, StoreError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StoreError::Validation(format!("{} is required", key)));
        }
        self.row.insert(key.into(), Value::String(value.to_string()));
        Ok(self)
    }

    fn optional(mut self, key: &str, value: Option<String>) -> Self {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Value::String)
            .unwrap_or(Value::Null);
        self.row.insert(key.into(), value);
        self
    }

    fn value<T: Serialize>(mut self, key: &str, value: T) -> Result<Self, StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.row.insert(key.into(), value);
        Ok(self)
    }

    fn patch_required(self, key: &str, field: PatchField<String>) -> Result<Self, StoreError> {
        match field {
            PatchField::Unset => Ok(self),
            PatchField::Null => Err(StoreError::Validation(format!("{} is required", key))),
            PatchField::Value(v) => self.required(key, v),
        }
    }

    fn patch_optional(self, key: &str, field: PatchField<String>) -> Self {
        match field {
            PatchField::Unset => self,
            PatchField::Null => self.optional(key, None),
            PatchField::Value(v) => self.optional(key, Some(v)),
        }
    }

    fn patch_nullable<T: Serialize>(
        mut self,
        key: &str,
        field: PatchField<T>,
    ) -> Result<Self, StoreError> {
        match field {
            PatchField::Unset => Ok(self),
            PatchField::Null => {
                self.row.insert(key.into(), Value::Null);
                Ok(self)
            }
            PatchField::Value(v) => self.value(key, v),
        }
    }

    fn patch_value<T: Serialize>(self, key: &str, field: PatchField<T>) -> Result<Self, StoreError> {
        match field {
            PatchField::Unset => Ok(self),
            PatchField::Null => Err(StoreError::Validation(format!("{} cannot be null", key))),
            PatchField::Value(v) => self.value(key, v),
        }
    }

    fn build(self) -> Row {
        self.row
    }
}

// -- Projects --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Technologies,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
}

impl IntoRow for NewProject {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .required("title", self.title)?
            .required("description", self.description)?
            .required("image_url", self.image_url)?
            .value("technologies", self.technologies.checked()?)?
            .optional("github_url", self.github_url)
            .optional("live_url", self.live_url)
            .value("featured", self.featured)?
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub title: PatchField<String>,
    pub description: PatchField<String>,
    pub image_url: PatchField<String>,
    pub technologies: PatchField<Technologies>,
    pub github_url: PatchField<String>,
    pub live_url: PatchField<String>,
    pub featured: PatchField<bool>,
}

impl IntoRow for ProjectPatch {
    fn into_row(self) -> Result<Row, StoreError> {
        let technologies = match self.technologies {
            PatchField::Value(t) => PatchField::Value(t.checked()?),
            PatchField::Null => {
                return Err(StoreError::Validation(
                    "At least one technology is required".into(),
                ))
            }
            PatchField::Unset => PatchField::Unset,
        };

        Ok(RowBuilder::default()
            .patch_required("title", self.title)?
            .patch_required("description", self.description)?
            .patch_required("image_url", self.image_url)?
            .patch_value("technologies", technologies)?
            .patch_optional("github_url", self.github_url)
            .patch_optional("live_url", self.live_url)
            .patch_value("featured", self.featured)?
            .build())
    }
}

// -- Skills --

#[derive(Debug, Clone, Deserialize)]
pub struct NewSkill {
    #[serde(default)]
    pub name: String,
    pub category: SkillCategory,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub icon: Option<String>,
}

impl IntoRow for NewSkill {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .required("name", self.name)?
            .value("category", self.category)?
            .value("level", self.level)?
            .optional("icon", self.icon)
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillPatch {
    pub name: PatchField<String>,
    pub category: PatchField<SkillCategory>,
    pub level: PatchField<i32>,
    pub icon: PatchField<String>,
}

impl IntoRow for SkillPatch {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .patch_required("name", self.name)?
            .patch_value("category", self.category)?
            .patch_value("level", self.level)?
            .patch_optional("icon", self.icon)
            .build())
    }
}

// -- About --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAbout {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl IntoRow for NewAbout {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .required("title", self.title)?
            .required("description", self.description)?
            .optional("image_url", self.image_url)
            .optional("email", self.email)
            .optional("phone", self.phone)
            .optional("location", self.location)
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AboutPatch {
    pub title: PatchField<String>,
    pub description: PatchField<String>,
    pub image_url: PatchField<String>,
    pub email: PatchField<String>,
    pub phone: PatchField<String>,
    pub location: PatchField<String>,
}

impl IntoRow for AboutPatch {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .patch_required("title", self.title)?
            .patch_required("description", self.description)?
            .patch_optional("image_url", self.image_url)
            .patch_optional("email", self.email)
            .patch_optional("phone", self.phone)
            .patch_optional("location", self.location)
            .build())
    }
}

/// The first write to the singleton arrives as a patch and must carry
/// everything a create needs.
impl From<AboutPatch> for NewAbout {
    fn from(patch: AboutPatch) -> Self {
        fn text(field: PatchField<String>) -> Option<String> {
            match field {
                PatchField::Value(v) => Some(v),
                _ => None,
            }
        }

        NewAbout {
            title: text(patch.title).unwrap_or_default(),
            description: text(patch.description).unwrap_or_default(),
            image_url: text(patch.image_url),
            email: text(patch.email),
            phone: text(patch.phone),
            location: text(patch.location),
        }
    }
}

// -- Social links --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    pub icon: Option<SocialIcon>,
    pub display_order: i32,
}

impl IntoRow for NewSocialLink {
    fn into_row(self) -> Result<Row, StoreError> {
        let icon = self
            .icon
            .unwrap_or_else(|| SocialIcon::for_platform(&self.platform));
        Ok(RowBuilder::default()
            .required("platform", self.platform)?
            .required("url", self.url)?
            .value("icon", icon)?
            .value("display_order", self.display_order)?
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialLinkPatch {
    pub platform: PatchField<String>,
    pub url: PatchField<String>,
    pub icon: PatchField<SocialIcon>,
    pub display_order: PatchField<i32>,
}

impl IntoRow for SocialLinkPatch {
    fn into_row(self) -> Result<Row, StoreError> {
        // A renamed platform without an explicit icon gets its icon re-resolved.
        let icon = if self.icon.is_unset() {
            match self.platform.as_value() {
                Some(platform) => PatchField::Value(SocialIcon::for_platform(platform)),
                None => PatchField::Unset,
            }
        } else {
            self.icon
        };

        Ok(RowBuilder::default()
            .patch_required("platform", self.platform)?
            .patch_required("url", self.url)?
            .patch_nullable("icon", icon)?
            .patch_value("display_order", self.display_order)?
            .build())
    }
}

// -- Timeline --

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimelineEvent {
    pub year: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: TimelineKind,
    #[serde(default)]
    pub display_order: i32,
}

impl IntoRow for NewTimelineEvent {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .value("year", self.year)?
            .required("title", self.title)?
            .required("description", self.description)?
            .value("type", self.kind)?
            .value("display_order", self.display_order)?
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineEventPatch {
    pub year: PatchField<i32>,
    pub title: PatchField<String>,
    pub description: PatchField<String>,
    #[serde(rename = "type")]
    pub kind: PatchField<TimelineKind>,
    pub display_order: PatchField<i32>,
}

impl IntoRow for TimelineEventPatch {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .patch_value("year", self.year)?
            .patch_required("title", self.title)?
            .patch_required("description", self.description)?
            .patch_value("type", self.kind)?
            .patch_value("display_order", self.display_order)?
            .build())
    }
}

// -- Certificates --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCertificate {
    pub name: String,
    pub issuer: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub credential_url: Option<String>,
    #[serde(deserialize_with = "blank_date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(deserialize_with = "blank_date")]
    pub expiry_date: Option<NaiveDate>,
    pub display_order: i32,
}

impl IntoRow for NewCertificate {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .required("name", self.name)?
            .required("issuer", self.issuer)?
            .optional("description", self.description)
            .optional("image_url", self.image_url)
            .optional("credential_url", self.credential_url)
            .value("issue_date", self.issue_date)?
            .value("expiry_date", self.expiry_date)?
            .value("display_order", self.display_order)?
            .build())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertificatePatch {
    pub name: PatchField<String>,
    pub issuer: PatchField<String>,
    pub description: PatchField<String>,
    pub image_url: PatchField<String>,
    pub credential_url: PatchField<String>,
    #[serde(deserialize_with = "blank_date_patch")]
    pub issue_date: PatchField<NaiveDate>,
    #[serde(deserialize_with = "blank_date_patch")]
    pub expiry_date: PatchField<NaiveDate>,
    pub display_order: PatchField<i32>,
}

impl IntoRow for CertificatePatch {
    fn into_row(self) -> Result<Row, StoreError> {
        Ok(RowBuilder::default()
            .patch_required("name", self.name)?
            .patch_required("issuer", self.issuer)?
            .patch_optional("description", self.description)
            .patch_optional("image_url", self.image_url)
            .patch_optional("credential_url", self.credential_url)
            .patch_nullable("issue_date", self.issue_date)?
            .patch_nullable("expiry_date", self.expiry_date)?
            .patch_value("display_order", self.display_order)?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: for<'de> Deserialize<'de>>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn technologies_from_text_are_trimmed_and_compacted() {
        let tech = Technologies::parse("React,  TypeScript ,");
        assert_eq!(tech.as_slice(), ["React", "TypeScript"]);
    }

    #[test]
    fn technologies_accept_list_or_text() {
        let from_list: Technologies = parse(json!([" Rust ", "", "Axum"]));
        let from_text: Technologies = parse(json!("Rust, Axum"));
        assert_eq!(from_list, from_text);
        assert_eq!(from_list.into_vec(), vec!["Rust", "Axum"]);
    }

    #[test]
    fn new_project_requires_title_and_technologies() {
        let missing_title: NewProject = parse(json!({
            "description": "d", "image_url": "i", "technologies": "Rust"
        }));
        let err = missing_title.into_row().unwrap_err();
        assert_eq!(err.to_string(), "title is required");

        let no_tech: NewProject = parse(json!({
            "title": "t", "description": "d", "image_url": "i", "technologies": " , "
        }));
        assert!(matches!(no_tech.into_row(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn new_project_blanks_optional_urls() {
        let project: NewProject = parse(json!({
            "title": "t", "description": "d", "image_url": "i",
            "technologies": "React,  TypeScript ,", "github_url": "", "live_url": " https://x.dev "
        }));
        let row = project.into_row().unwrap();
        assert_eq!(row["technologies"], json!(["React", "TypeScript"]));
        assert_eq!(row["github_url"], Value::Null);
        assert_eq!(row["live_url"], json!("https://x.dev"));
        assert_eq!(row["featured"], json!(false));
    }

    #[test]
    fn project_patch_only_emits_present_keys() {
        let patch: ProjectPatch = parse(json!({ "featured": true, "github_url": null }));
        let row = patch.into_row().unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row["featured"], json!(true));
        assert_eq!(row["github_url"], Value::Null);
    }

    #[test]
    fn patch_cannot_null_a_required_field() {
        let patch: ProjectPatch = parse(json!({ "title": null }));
        assert!(matches!(patch.into_row(), Err(StoreError::Validation(_))));

        let patch: SkillPatch = parse(json!({ "name": "   " }));
        assert!(matches!(patch.into_row(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn new_skill_defaults_level_and_keeps_it_unclamped() {
        let skill: NewSkill = parse(json!({ "name": "Rust", "category": "Backend" }));
        assert_eq!(skill.level, 80);

        let skill: NewSkill = parse(json!({ "name": "Rust", "category": "Backend", "level": 140 }));
        let row = skill.into_row().unwrap();
        assert_eq!(row["level"], json!(140));
        assert_eq!(row["category"], json!("Backend"));
    }

    #[test]
    fn new_social_link_resolves_icon_from_platform() {
        let link: NewSocialLink = parse(json!({ "platform": "GitHub", "url": "https://github.com/me" }));
        let row = link.into_row().unwrap();
        assert_eq!(row["icon"], json!("github"));

        let link: NewSocialLink = parse(json!({
            "platform": "Work", "url": "mailto:me@example.com", "icon": "email"
        }));
        assert_eq!(link.into_row().unwrap()["icon"], json!("email"));
    }

    #[test]
    fn social_link_patch_reresolves_icon_on_rename() {
        let patch: SocialLinkPatch = parse(json!({ "platform": "LinkedIn" }));
        let row = patch.into_row().unwrap();
        assert_eq!(row["icon"], json!("linkedin"));

        let patch: SocialLinkPatch = parse(json!({ "display_order": 4 }));
        let row = patch.into_row().unwrap();
        assert!(!row.contains_key("icon"));
    }

    #[test]
    fn timeline_event_defaults_to_experience() {
        let event: NewTimelineEvent = parse(json!({
            "year": 2021, "title": "Joined", "description": "Started"
        }));
        let row = event.into_row().unwrap();
        assert_eq!(row["type"], json!("experience"));
        assert_eq!(row["display_order"], json!(0));
    }

    #[test]
    fn certificate_dates_accept_blank_strings() {
        let cert: NewCertificate = parse(json!({
            "name": "CKA", "issuer": "CNCF", "issue_date": "2023-05-01", "expiry_date": ""
        }));
        let row = cert.into_row().unwrap();
        assert_eq!(row["issue_date"], json!("2023-05-01"));
        assert_eq!(row["expiry_date"], Value::Null);

        let patch: CertificatePatch = parse(json!({ "expiry_date": "" }));
        let row = patch.into_row().unwrap();
        assert_eq!(row["expiry_date"], Value::Null);
    }

    #[test]
    fn about_patch_converts_into_create() {
        let patch: AboutPatch = parse(json!({ "title": "Hi", "email": "me@example.com" }));
        let about = NewAbout::from(patch);
        assert_eq!(about.title, "Hi");
        assert_eq!(about.description, "");
        assert_eq!(about.email.as_deref(), Some("me@example.com"));
        assert!(matches!(about.into_row(), Err(StoreError::Validation(_))));
    }
}
