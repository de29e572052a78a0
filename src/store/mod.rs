//! Row-oriented persistence behind the content repository.
//!
//! A store knows about tables, columns and ordering, nothing about the
//! entity types layered on top. Rows travel as JSON objects so the same
//! trait can front a local SQLite file or a hosted PostgREST endpoint.

pub mod rest;
pub mod sqlite;
pub mod unconfigured;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use rest::RestStore;
pub use sqlite::SqliteStore;
pub use unconfigured::UnconfiguredStore;

/// A single stored row keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Content store not configured (set store.url with store.anon_key or store.service_key, or database.path)")]
    NotConfigured,

    #[error("No {table} row with id {id}")]
    NotFound { table: &'static str, id: String },

    #[error("{0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// The six content tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Projects,
    Skills,
    About,
    SocialLinks,
    Timeline,
    Certificates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Bool,
    /// Ordered list of strings; JSON text in SQLite, `text[]` upstream.
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

const fn asc(column: &'static str) -> Order {
    Order {
        column,
        descending: false,
    }
}

const fn desc(column: &'static str) -> Order {
    Order {
        column,
        descending: true,
    }
}

use ColumnKind::{Bool, Integer, List, Text};

const PROJECT_COLUMNS: &[Column] = &[
    col("id", Text),
    col("title", Text),
    col("description", Text),
    col("image_url", Text),
    col("technologies", List),
    col("github_url", Text),
    col("live_url", Text),
    col("featured", Bool),
    col("created_at", Text),
    col("updated_at", Text),
];

const SKILL_COLUMNS: &[Column] = &[
    col("id", Text),
    col("name", Text),
    col("category", Text),
    col("level", Integer),
    col("icon", Text),
    col("created_at", Text),
    col("updated_at", Text),
];

const ABOUT_COLUMNS: &[Column] = &[
    col("id", Text),
    col("title", Text),
    col("description", Text),
    col("image_url", Text),
    col("email", Text),
    col("phone", Text),
    col("location", Text),
    col("created_at", Text),
    col("updated_at", Text),
];

const SOCIAL_LINK_COLUMNS: &[Column] = &[
    col("id", Text),
    col("platform", Text),
    col("url", Text),
    col("icon", Text),
    col("display_order", Integer),
    col("created_at", Text),
    col("updated_at", Text),
];

const TIMELINE_COLUMNS: &[Column] = &[
    col("id", Text),
    col("year", Integer),
    col("title", Text),
    col("description", Text),
    col("type", Text),
    col("display_order", Integer),
    col("created_at", Text),
    col("updated_at", Text),
];

const CERTIFICATE_COLUMNS: &[Column] = &[
    col("id", Text),
    col("name", Text),
    col("issuer", Text),
    col("description", Text),
    col("image_url", Text),
    col("credential_url", Text),
    col("issue_date", Text),
    col("expiry_date", Text),
    col("display_order", Integer),
    col("created_at", Text),
    col("updated_at", Text),
];

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Projects,
        Table::Skills,
        Table::About,
        Table::SocialLinks,
        Table::Timeline,
        Table::Certificates,
    ];

    /// Table name in the backing store.
    pub fn name(self) -> &'static str {
        match self {
            Table::Projects => "projects",
            Table::Skills => "skills",
            Table::About => "about",
            Table::SocialLinks => "social_links",
            Table::Timeline => "timeline",
            Table::Certificates => "certificates",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Projects => PROJECT_COLUMNS,
            Table::Skills => SKILL_COLUMNS,
            Table::About => ABOUT_COLUMNS,
            Table::SocialLinks => SOCIAL_LINK_COLUMNS,
            Table::Timeline => TIMELINE_COLUMNS,
            Table::Certificates => CERTIFICATE_COLUMNS,
        }
    }

    pub fn column(self, name: &str) -> Option<Column> {
        self.columns().iter().copied().find(|c| c.name == name)
    }

    /// Listing order for the table.
    pub fn ordering(self) -> &'static [Order] {
        const PROJECTS: &[Order] = &[desc("created_at")];
        const SKILLS: &[Order] = &[asc("category")];
        const SOCIAL_LINKS: &[Order] = &[asc("display_order")];
        const TIMELINE: &[Order] = &[desc("year"), asc("display_order")];
        const CERTIFICATES: &[Order] = &[asc("display_order"), desc("issue_date")];

        match self {
            Table::Projects => PROJECTS,
            Table::Skills => SKILLS,
            Table::About => &[],
            Table::SocialLinks => SOCIAL_LINKS,
            Table::Timeline => TIMELINE,
            Table::Certificates => CERTIFICATES,
        }
    }
}

/// Row-level access to the content tables.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// False only for the placeholder used when no backend is configured.
    fn is_configured(&self) -> bool {
        true
    }

    /// All rows of `table`, sorted by `order`.
    async fn select(&self, table: Table, order: &[Order]) -> Result<Vec<Row>, StoreError>;

    /// Row `id` of `table`, or `None` when there is no such row.
    async fn get(&self, table: Table, id: &str) -> Result<Option<Row>, StoreError>;

    /// Any one row of `table`, or `None` when the table is empty.
    async fn first(&self, table: Table) -> Result<Option<Row>, StoreError>;

    /// Insert a complete row and return it as stored.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Overwrite the given columns of row `id` and return the full row.
    async fn update(&self, table: Table, id: &str, changes: Row) -> Result<Row, StoreError>;

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_has_identity_and_timestamps() {
        for table in Table::ALL {
            for name in ["id", "created_at", "updated_at"] {
                assert!(
                    table.column(name).is_some(),
                    "{} is missing {}",
                    table.name(),
                    name
                );
            }
        }
    }

    #[test]
    fn ordering_columns_exist() {
        for table in Table::ALL {
            for order in table.ordering() {
                assert!(table.column(order.column).is_some());
            }
        }
    }

    #[test]
    fn timeline_orders_by_year_then_display_order() {
        assert_eq!(
            Table::Timeline.ordering(),
            &[desc("year"), asc("display_order")]
        );
    }

    #[test]
    fn not_found_names_table_and_id() {
        let err = StoreError::NotFound {
            table: "projects",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "No projects row with id abc");
    }
}
