use async_trait::async_trait;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use tokio::task;

use super::{Column, ColumnKind, ContentStore, Order, Row, StoreError, Table};
use crate::state::DbPool;

/// Content tables in a local SQLite file. Connection work runs on the
/// blocking pool.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let conn = pool.get()?;
            work(&conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Database task failed: {}", e)))?
    }
}

fn fetch(conn: &Connection, table: Table, id: &str) -> Result<Option<Row>, StoreError> {
    let sql = format!(
        "SELECT {} FROM \"{}\" WHERE \"id\" = ?1",
        column_list(table),
        table.name()
    );
    let row = conn
        .query_row(&sql, params![id], |row| read_row(table, row))
        .optional()?;
    Ok(row)
}

fn column_list(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_clause(order: &[Order]) -> String {
    if order.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = order
        .iter()
        .map(|o| {
            if o.descending {
                format!("\"{}\" DESC NULLS LAST", o.column)
            } else {
                format!("\"{}\" ASC", o.column)
            }
        })
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}

fn read_row(table: Table, row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (idx, column) in table.columns().iter().enumerate() {
        let value = match column.kind {
            ColumnKind::Text => row
                .get::<_, Option<String>>(idx)?
                .map(Value::String)
                .unwrap_or(Value::Null),
            ColumnKind::Integer => row
                .get::<_, Option<i64>>(idx)?
                .map(Value::from)
                .unwrap_or(Value::Null),
            ColumnKind::Bool => row
                .get::<_, Option<bool>>(idx)?
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            ColumnKind::List => match row.get::<_, Option<String>>(idx)? {
                Some(json) => serde_json::from_str(&json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
                })?,
                None => Value::Null,
            },
        };
        out.insert(column.name.to_string(), value);
    }
    Ok(out)
}

fn to_sql(column: Column, value: &Value) -> Result<SqlValue, StoreError> {
    let mismatch = || {
        StoreError::Validation(format!(
            "{} has the wrong type for this column",
            column.name
        ))
    };

    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    match column.kind {
        ColumnKind::Text => value
            .as_str()
            .map(|s| SqlValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        ColumnKind::Integer => value.as_i64().map(SqlValue::Integer).ok_or_else(mismatch),
        ColumnKind::Bool => value
            .as_bool()
            .map(|b| SqlValue::Integer(b as i64))
            .ok_or_else(mismatch),
        ColumnKind::List => {
            if !value.is_array() {
                return Err(mismatch());
            }
            serde_json::to_string(value)
                .map(SqlValue::Text)
                .map_err(|e| StoreError::Backend(e.to_string()))
        }
    }
}

fn lookup_column(table: Table, name: &str) -> Result<Column, StoreError> {
    table
        .column(name)
        .ok_or_else(|| StoreError::Validation(format!("Unknown field {} for {}", name, table.name())))
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn select(&self, table: Table, order: &[Order]) -> Result<Vec<Row>, StoreError> {
        let sql = format!(
            "SELECT {} FROM \"{}\"{}",
            column_list(table),
            table.name(),
            order_clause(order)
        );
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| read_row(table, row))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn get(&self, table: Table, id: &str) -> Result<Option<Row>, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| fetch(conn, table, &id)).await
    }

    async fn first(&self, table: Table) -> Result<Option<Row>, StoreError> {
        let sql = format!(
            "SELECT {} FROM \"{}\" LIMIT 1",
            column_list(table),
            table.name()
        );
        self.with_conn(move |conn| {
            let row = conn
                .query_row(&sql, [], |row| read_row(table, row))
                .optional()?;
            Ok(row)
        })
        .await
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Validation("id is required".into()))?;

        let mut names = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());
        for (name, value) in &row {
            let column = lookup_column(table, name)?;
            names.push(format!("\"{}\"", column.name));
            values.push(to_sql(column, value)?);
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            table.name(),
            names.join(", "),
            placeholders.join(", ")
        );

        self.with_conn(move |conn| {
            conn.execute(&sql, params_from_iter(values))?;
            fetch(conn, table, &id)?.ok_or_else(|| {
                StoreError::Backend(format!("Inserted {} row vanished", table.name()))
            })
        })
        .await
    }

    async fn update(&self, table: Table, id: &str, changes: Row) -> Result<Row, StoreError> {
        let mut assignments = Vec::with_capacity(changes.len());
        let mut values = Vec::with_capacity(changes.len() + 1);
        for (name, value) in &changes {
            if name == "id" {
                return Err(StoreError::Validation("id cannot be changed".into()));
            }
            let column = lookup_column(table, name)?;
            values.push(to_sql(column, value)?);
            assignments.push(format!("\"{}\" = ?{}", column.name, values.len()));
        }

        let id = id.to_string();
        let not_found = {
            let id = id.clone();
            move || StoreError::NotFound {
                table: table.name(),
                id: id.clone(),
            }
        };

        self.with_conn(move |conn| {
            if !assignments.is_empty() {
                values.push(SqlValue::Text(id.clone()));
                let sql = format!(
                    "UPDATE \"{}\" SET {} WHERE \"id\" = ?{}",
                    table.name(),
                    assignments.join(", "),
                    values.len()
                );
                if conn.execute(&sql, params_from_iter(values))? == 0 {
                    return Err(not_found());
                }
            }
            fetch(conn, table, &id)?.ok_or_else(not_found)
        })
        .await
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = ?1", table.name());
            if conn.execute(&sql, params![id])? == 0 {
                return Err(StoreError::NotFound {
                    table: table.name(),
                    id,
                });
            }
            Ok(())
        })
        .await
    }
}
