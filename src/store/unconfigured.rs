use async_trait::async_trait;

use super::{ContentStore, Order, Row, StoreError, Table};

/// Stand-in used when no backend is configured: reads come back empty,
/// writes fail with [`StoreError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStore;

#[async_trait]
impl ContentStore for UnconfiguredStore {
    fn is_configured(&self) -> bool {
        false
    }

    async fn select(&self, _table: Table, _order: &[Order]) -> Result<Vec<Row>, StoreError> {
        Ok(Vec::new())
    }

    async fn get(&self, _table: Table, _id: &str) -> Result<Option<Row>, StoreError> {
        Ok(None)
    }

    async fn first(&self, _table: Table) -> Result<Option<Row>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _table: Table, _row: Row) -> Result<Row, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn update(&self, _table: Table, _id: &str, _changes: Row) -> Result<Row, StoreError> {
        Err(StoreError::NotConfigured)
    }

    async fn delete(&self, _table: Table, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }
}
