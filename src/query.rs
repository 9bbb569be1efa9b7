//! The chainable, memoizing wrapper around one executed statement
//!
//! A `Query` owns the connection handle, the SQL text and its parameters.
//! The statement runs once, lazily, on the first result retrieval; the raw
//! rows are then immutable. `process` layers transformations on top of the
//! visible result without ever touching the raw rows.

pub mod params;
pub use params::Params;
pub use params::ParamsError;
pub use params::PlaceholderStyle;

pub mod row;
pub use row::Row;

use crate::connection::{self, Connection, ConnectionError};
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use std::sync::Arc;
use thiserror::Error;

pub struct Query {
    connection: Arc<dyn Connection>,
    sql: String,
    params: Params,
    raw: Option<Vec<Row>>,
    processed: Option<Vec<Row>>,
}

impl Query {
    pub fn new(connection: Arc<dyn Connection>, sql: impl Into<String>) -> Query {
        Query {
            connection,
            sql: sql.into(),
            params: Params::None,
            raw: None,
            processed: None,
        }
    }

    /// Build against the process wide default connection, resolving the
    /// config file when none was set. Fails before anything executes.
    pub async fn with_default(sql: impl Into<String>) -> Result<Query, QueryError> {
        let connection = connection::default().await?;
        Ok(Query::new(connection, sql))
    }

    pub fn params(mut self, params: Params) -> Query {
        self.params = params;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The rows exactly as the driver returned them. The statement executes
    /// on the first call and never again, later calls see the same rows.
    pub async fn raw_result(&mut self) -> Result<&[Row], QueryError> {
        if self.raw.is_none() {
            debug!("Executing {}", self.sql);
            let rows = self.connection.fetch_rows(&self.sql, &self.params).await?;
            self.raw = Some(rows);
        }

        Ok(self.raw.as_deref().unwrap_or(&[]))
    }

    /// The processed rows when any transformation ran, otherwise the raw
    /// rows.
    pub async fn result(&mut self) -> Result<&[Row], QueryError> {
        if self.processed.is_some() {
            return Ok(self.processed.as_deref().unwrap_or(&[]));
        }

        self.raw_result().await
    }

    /// Apply `transform` to the current visible result and store the output
    /// as the new processed rows. Each call composes onto the previous
    /// processed state, not the raw state.
    pub async fn process<F>(mut self, transform: F) -> Result<Query, QueryError>
    where
        F: FnOnce(Vec<Row>) -> Vec<Row>,
    {
        let current = self.result().await?.to_vec();
        self.processed = Some(transform(current));
        Ok(self)
    }

    /// Serialize the visible result as a JSON array of row objects.
    pub async fn to_json(&mut self) -> Result<String, QueryError> {
        let rows = self.result().await?;
        Ok(serde_json::to_string(rows)?)
    }

    /// The `application/json` response for the visible result.
    pub async fn into_response(mut self) -> Result<HttpResponse, QueryError> {
        let body = self.to_json().await?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(body))
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    ConnectionError(#[from] ConnectionError),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
