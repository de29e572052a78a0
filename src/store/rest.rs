use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use super::{ContentStore, Order, Row, StoreError, Table};

/// Content tables behind a hosted PostgREST endpoint.
pub struct RestStore {
    client: reqwest::Client,
    base: Url,
    key: String,
}

impl RestStore {
    /// `endpoint` is the project URL; tables live under `/rest/v1/`.
    pub fn new(endpoint: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let mut endpoint = endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)
            .and_then(|u| u.join("rest/v1/"))
            .map_err(|e| StoreError::Backend(format!("Invalid store URL: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            key: key.into(),
        })
    }

    pub fn table_url(&self, table: Table) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(table.name());
        }
        url
    }

    fn row_url(&self, table: Table, id: &str) -> Url {
        let mut url = self.table_url(table);
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn returning(&self, method: Method, url: Url) -> RequestBuilder {
        self.request(method, url)
            .header("Prefer", "return=representation")
    }
}

/// PostgREST `order` parameter for a listing order.
pub fn order_param(order: &[Order]) -> String {
    order
        .iter()
        .map(|o| {
            if o.descending {
                format!("{}.desc.nullslast", o.column)
            } else {
                format!("{}.asc", o.column)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a representation body, surfacing upstream error messages verbatim.
async fn rows(response: Response) -> Result<Vec<Row>, StoreError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Store request failed with status {}", status));
        return Err(StoreError::Backend(message));
    }

    let body: Value = serde_json::from_str(&text).map_err(|e| {
        StoreError::Backend(format!(
            "Store response is not JSON ({}): {}",
            e,
            text.chars().take(200).collect::<String>()
        ))
    })?;

    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Backend(format!("Unexpected row: {}", other))),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        other => Err(StoreError::Backend(format!(
            "Unexpected store response: {}",
            other
        ))),
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn select(&self, table: Table, order: &[Order]) -> Result<Vec<Row>, StoreError> {
        let mut url = self.table_url(table);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if !order.is_empty() {
                query.append_pair("order", &order_param(order));
            }
        }
        let response = self.request(Method::GET, url).send().await?;
        rows(response).await
    }

    async fn get(&self, table: Table, id: &str) -> Result<Option<Row>, StoreError> {
        let mut url = self.row_url(table, id);
        url.query_pairs_mut().append_pair("select", "*");
        let response = self.request(Method::GET, url).send().await?;
        Ok(rows(response).await?.into_iter().next())
    }

    async fn first(&self, table: Table) -> Result<Option<Row>, StoreError> {
        let mut url = self.table_url(table);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", "1");
        let response = self.request(Method::GET, url).send().await?;
        Ok(rows(response).await?.into_iter().next())
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let url = self.table_url(table);
        let response = self
            .returning(Method::POST, url)
            .json(&row)
            .send()
            .await?;
        rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("Insert into {} returned no row", table.name())))
    }

    async fn update(&self, table: Table, id: &str, changes: Row) -> Result<Row, StoreError> {
        let url = self.row_url(table, id);
        let response = self
            .returning(Method::PATCH, url)
            .json(&changes)
            .send()
            .await?;
        rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                table: table.name(),
                id: id.to_string(),
            })
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let url = self.row_url(table, id);
        let response = self.returning(Method::DELETE, url).send().await?;
        if rows(response).await?.is_empty() {
            return Err(StoreError::NotFound {
                table: table.name(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
