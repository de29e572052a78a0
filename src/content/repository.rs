use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use super::input::{AboutPatch, IntoRow, NewAbout};
use super::models::{About, Certificate, Entity, Project, Skill, SocialLink, TimelineEvent};
use crate::store::{ContentStore, Row, StoreError};

/// Typed access to the content tables over any [`ContentStore`].
#[derive(Clone)]
pub struct ContentRepository {
    store: Arc<dyn ContentStore>,
}

/// Outcome of a create-or-update write.
#[derive(Debug, Clone, PartialEq)]
pub enum Saved<T> {
    Created(T),
    Updated(T),
}

impl<T> Saved<T> {
    pub fn into_inner(self) -> T {
        match self {
            Saved::Created(v) | Saved::Updated(v) => v,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Saved::Created(_))
    }
}

/// Everything a page renders, loaded in one pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub configured: bool,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub about: Option<About>,
    pub social_links: Vec<SocialLink>,
    pub timeline: Vec<TimelineEvent>,
    pub certificates: Vec<Certificate>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode<E: Entity>(row: Row) -> Result<E, StoreError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        StoreError::Backend(format!("Malformed {} row: {}", E::TABLE.name(), e))
    })
}

fn or_empty<T: Default>(section: &str, result: Result<T, StoreError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("Failed to load {}: {}", section, e);
        T::default()
    })
}

impl ContentRepository {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_configured()
    }

    /// All records of `E` in the table's listing order.
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        self.store
            .select(E::TABLE, E::TABLE.ordering())
            .await?
            .into_iter()
            .map(decode::<E>)
            .collect()
    }

    /// One record by id; a missing id is [`StoreError::NotFound`].
    pub async fn get<E: Entity>(&self, id: &str) -> Result<E, StoreError> {
        match self.store.get(E::TABLE, id).await? {
            Some(row) => decode(row),
            None => Err(StoreError::NotFound {
                table: E::TABLE.name(),
                id: id.to_string(),
            }),
        }
    }

    pub async fn create<E: Entity>(&self, input: E::Create) -> Result<E, StoreError> {
        let mut row = input.into_row()?;
        let now = timestamp();
        row.insert("id".into(), Value::String(uuid::Uuid::now_v7().to_string()));
        row.insert("created_at".into(), Value::String(now.clone()));
        row.insert("updated_at".into(), Value::String(now));

        let record: E = decode(self.store.insert(E::TABLE, row).await?)?;
        tracing::info!("Created {} {}", E::LABEL, record.id());
        Ok(record)
    }

    /// Apply the fields present in `patch`; everything else is kept.
    pub async fn update<E: Entity>(&self, id: &str, patch: E::Patch) -> Result<E, StoreError> {
        let mut changes = patch.into_row()?;
        changes.insert("updated_at".into(), Value::String(timestamp()));

        let record: E = decode(self.store.update(E::TABLE, id, changes).await?)?;
        tracing::info!("Updated {} {}", E::LABEL, record.id());
        Ok(record)
    }

    pub async fn delete<E: Entity>(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(E::TABLE, id).await?;
        tracing::info!("Deleted {} {}", E::LABEL, id);
        Ok(())
    }

    /// The about row, or `None` before it has been written.
    pub async fn about(&self) -> Result<Option<About>, StoreError> {
        self.store
            .first(About::TABLE)
            .await?
            .map(decode::<About>)
            .transpose()
    }

    /// Update the about row if there is one, otherwise create it. A create
    /// that loses a race with another first write falls back to updating
    /// the winner's row.
    pub async fn save_about(&self, patch: AboutPatch) -> Result<Saved<About>, StoreError> {
        if let Some(existing) = self.about().await? {
            return self
                .update::<About>(&existing.id, patch)
                .await
                .map(Saved::Updated);
        }

        match self.create::<About>(NewAbout::from(patch.clone())).await {
            Ok(created) => Ok(Saved::Created(created)),
            Err(e) => match self.about().await? {
                Some(existing) => {
                    tracing::debug!("About row appeared during create, updating instead");
                    self.update::<About>(&existing.id, patch)
                        .await
                        .map(Saved::Updated)
                }
                None => Err(e),
            },
        }
    }

    /// Load all six collections concurrently. A failing section is logged
    /// and comes back empty without affecting the others.
    pub async fn snapshot(&self) -> Snapshot {
        let (projects, skills, about, social_links, timeline, certificates) = tokio::join!(
            self.list::<Project>(),
            self.list::<Skill>(),
            self.about(),
            self.list::<SocialLink>(),
            self.list::<TimelineEvent>(),
            self.list::<Certificate>(),
        );

        Snapshot {
            configured: self.is_configured(),
            projects: or_empty("projects", projects),
            skills: or_empty("skills", skills),
            about: or_empty("about", about),
            social_links: or_empty("social links", social_links),
            timeline: or_empty("timeline", timeline),
            certificates: or_empty("certificates", certificates),
        }
    }
}
