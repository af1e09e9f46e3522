//! Live query source over the GraphQL-style endpoint.
//!
//! `GraphQlExecutor` is the transport: it posts a query document plus
//! variables and decodes the `{data, errors}` envelope. `ConnectionQuery`
//! binds one paginated query to the `PageSource` contract and validates
//! the page shape of the result.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Connection, FetchRequest, Page, SourceKind};

use super::traits::{PageSource, SourceError};

/// Transport for the query API.
pub struct GraphQlExecutor {
    client: Client,
    base_url: String,
}

impl GraphQlExecutor {
    /// Create an executor for the given base address.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the query endpoint URL.
    fn query_url(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    /// Execute a query document with the given variables.
    ///
    /// A non-empty `errors` array in the envelope is a failure even when
    /// `data` is present.
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value, SourceError> {
        let url = self.query_url();
        debug!(url = %url, "Executing query");

        let request = QueryRequest { query, variables };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let envelope: QueryResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Invalid(e.to_string()))?;

        decode_envelope(envelope)
    }
}

/// Query request body.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// Query response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<Value>,
    errors: Option<Vec<QueryError>>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    message: String,
}

/// Unwrap the envelope, treating any reported error as a failure.
fn decode_envelope(response: QueryResponse) -> Result<Value, SourceError> {
    if let Some(errors) = &response.errors {
        if let Some(first) = errors.first() {
            return Err(SourceError::Query(first.message.clone()));
        }
    }

    response
        .data
        .ok_or_else(|| SourceError::Invalid("response carries no data".to_string()))
}

/// Live page source: one paginated query bound to a connection field.
pub struct ConnectionQuery<T> {
    executor: Arc<GraphQlExecutor>,
    document: &'static str,
    field: &'static str,
    base_variables: Map<String, Value>,
    page_size: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ConnectionQuery<T> {
    /// Bind a query document and its fixed variables to a connection field.
    pub fn new(
        executor: Arc<GraphQlExecutor>,
        document: &'static str,
        field: &'static str,
        base_variables: Map<String, Value>,
        page_size: u32,
    ) -> Self {
        Self {
            executor,
            document,
            field,
            base_variables,
            page_size,
            _marker: PhantomData,
        }
    }

    /// Variables for one fetch: fixed variables plus `first` and `after`.
    fn variables(&self, request: &FetchRequest) -> Value {
        let mut vars = self.base_variables.clone();
        vars.insert("first".to_string(), self.page_size.into());
        vars.insert(
            "after".to_string(),
            request.cursor.clone().map(Value::String).unwrap_or(Value::Null),
        );
        Value::Object(vars)
    }
}

#[async_trait]
impl<T> PageSource<T> for ConnectionQuery<T>
where
    T: DeserializeOwned + Send + Sync,
{
    fn id(&self) -> &str {
        self.field
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<T>, SourceError> {
        let data = self
            .executor
            .execute(self.document, self.variables(request))
            .await?;

        let raw = data
            .get(self.field)
            .cloned()
            .filter(|value| !value.is_null())
            .ok_or_else(|| SourceError::Invalid(format!("missing `{}` in response", self.field)))?;

        let connection: Connection<T> =
            serde_json::from_value(raw).map_err(|e| SourceError::Invalid(e.to_string()))?;

        debug!(
            field = self.field,
            items = connection.edges.len(),
            has_next = connection.page_info.has_next_page,
            "Live page decoded"
        );

        Ok(connection.into_page(SourceKind::Live))
    }
}
