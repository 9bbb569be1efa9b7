//! HTTP route registration and the query endpoint
//!
//! `POST /query` takes `{"sql": "...", "params": [...]}`, runs the
//! statement against the process connection and answers with the JSON row
//! array. Parameters arrive as a JSON array (positional) or object
//! (named). Errors come back as a JSON error object with the driver
//! message intact.

use crate::connection::{Connection, ConnectionError};
use crate::query::{Params, Query, QueryError};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// Register all routes on the actix application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(execute).service(health);
}

#[post("/query")]
async fn execute(
    connection: web::Data<Arc<dyn Connection>>,
    request: web::Json<QueryRequest>,
) -> impl Responder {
    let request = request.into_inner();

    let params = match body_params(request.params) {
        Ok(params) => params,
        Err(message) => return HttpResponse::BadRequest().json(ErrorBody::new(message)),
    };

    let query = Query::new(connection.get_ref().clone(), request.sql).params(params);
    match query.into_response().await {
        Ok(response) => response,
        Err(e) => error_response(e),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn body_params(params: Option<Value>) -> Result<Params, String> {
    match params {
        None | Some(Value::Null) => Ok(Params::None),
        Some(Value::Array(values)) if values.is_empty() => Ok(Params::None),
        Some(Value::Array(values)) => Ok(Params::Positional(values)),
        Some(Value::Object(pairs)) => Ok(Params::Named(pairs.into_iter().collect())),
        Some(other) => Err(format!(
            "params must be a JSON array or object, got {}",
            other
        )),
    }
}

fn error_response(error: QueryError) -> HttpResponse {
    warn!("Query failed: {}", error);
    match &error {
        QueryError::ConnectionError(ConnectionError::ParamsError(_)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(error.to_string()))
        }
        QueryError::ConnectionError(ConnectionError::DriverError(sqlx::Error::Database(_))) => {
            HttpResponse::BadRequest().json(ErrorBody::new(error.to_string()))
        }
        _ => HttpResponse::InternalServerError().json(ErrorBody::new(error.to_string())),
    }
}
