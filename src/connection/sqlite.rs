//! SQLite backed connection

use super::{Connection, ConnectionError};
use crate::query::{Params, PlaceholderStyle, Row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};

pub struct SqliteConnection {
    pool: SqlitePool,
}

impl SqliteConnection {
    pub async fn connect(url: &str) -> Result<SqliteConnection, ConnectionError> {
        let options = SqlitePoolOptions::new();
        //A pooled :memory: database is one database per pool connection,
        //pin the pool to a single handle so every query sees the same data
        let options = if url.contains(":memory:") {
            options.max_connections(1)
        } else {
            options
        };

        let pool = options.connect(url).await?;
        debug!("Opened sqlite pool for {}", url);

        Ok(SqliteConnection { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> SqliteConnection {
        SqliteConnection { pool }
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    async fn fetch_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, ConnectionError> {
        let (sql, values) = params.prepare(sql, PlaceholderStyle::Question)?;

        let mut query = sqlx::query(&sql);
        for value in &values {
            query = bind_value(query, value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) if n.is_i64() => query.bind(n.as_i64().unwrap_or_default()),
        Value::Number(n) => query.bind(n.as_f64().unwrap_or_default()),
        Value::String(s) => query.bind(s.clone()),
        //No scalar sqlite type for arrays or objects, bind their JSON text
        other => query.bind(other.to_string()),
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row, ConnectionError> {
    let mut output = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        output.insert(column.name().to_string(), decode_column(row, index)?);
    }
    Ok(output)
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, ConnectionError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    //The value level type, not the column declaration, drives the decode
    //since sqlite columns hold whatever was stored in them
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        "TEXT" | "DATETIME" | "DATE" | "TIME" => Value::String(row.try_get::<String, _>(index)?),
        "BLOB" => Value::String(hex_encode(&row.try_get::<Vec<u8>, _>(index)?)),
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    };

    Ok(value)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
