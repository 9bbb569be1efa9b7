//! Postgres backed connection, the near twin of the sqlite one with the
//! driver's `$n` placeholders and the richer pg type set

use super::{Connection, ConnectionError};
use crate::query::{Params, PlaceholderStyle, Row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};

pub struct PostgresConnection {
    pool: PgPool,
}

impl PostgresConnection {
    pub async fn connect(url: &str) -> Result<PostgresConnection, ConnectionError> {
        let pool = PgPoolOptions::new().connect(url).await?;
        debug!("Opened postgres pool");

        Ok(PostgresConnection { pool })
    }

    pub fn from_pool(pool: PgPool) -> PostgresConnection {
        PostgresConnection { pool }
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    async fn fetch_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, ConnectionError> {
        let (sql, values) = params.prepare(sql, PlaceholderStyle::Dollar)?;

        let mut query = sqlx::query(&sql);
        for value in &values {
            query = bind_value(query, value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    value: &Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) if n.is_i64() => query.bind(n.as_i64().unwrap_or_default()),
        Value::Number(n) => query.bind(n.as_f64().unwrap_or_default()),
        Value::String(s) => query.bind(s.clone()),
        //Arrays and objects go over the wire as jsonb
        other => query.bind(other.clone()),
    }
}

fn decode_row(row: &PgRow) -> Result<Row, ConnectionError> {
    let mut output = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        output.insert(column.name().to_string(), decode_column(row, index)?);
    }
    Ok(output)
}

fn decode_column(row: &PgRow, index: usize) -> Result<Value, ConnectionError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Bool(row.try_get::<bool, _>(index)?),
        "INT2" => Value::from(i64::from(row.try_get::<i16, _>(index)?)),
        "INT4" => Value::from(i64::from(row.try_get::<i32, _>(index)?)),
        "INT8" => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => serde_json::Number::from_f64(f64::from(row.try_get::<f32, _>(index)?))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "FLOAT8" => serde_json::Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
            Value::String(row.try_get::<String, _>(index)?)
        }
        "JSON" | "JSONB" => row.try_get::<Value, _>(index)?,
        "UUID" => Value::String(row.try_get::<uuid::Uuid, _>(index)?.to_string()),
        "TIMESTAMPTZ" => Value::String(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?
                .to_rfc3339(),
        ),
        "TIMESTAMP" => Value::String(row.try_get::<chrono::NaiveDateTime, _>(index)?.to_string()),
        "DATE" => Value::String(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        "TIME" => Value::String(row.try_get::<chrono::NaiveTime, _>(index)?.to_string()),
        "BYTEA" => Value::String(hex_encode(&row.try_get::<Vec<u8>, _>(index)?)),
        //NUMERIC and friends land here, take the text decode when the
        //driver offers one
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
