//! Connection wrappers for the supported database backends
//!
//! Both backends implement the same `Connection` trait, everything above
//! them (the query machinery, the HTTP endpoint) is driver agnostic. An
//! optional process wide default handle can be registered once at startup
//! or resolved from the config file on first use; every query constructor
//! also takes an explicitly passed connection.

pub mod postgres;
pub use postgres::PostgresConnection;

pub mod sqlite;
pub use sqlite::SqliteConnection;

use crate::config::{Config, ConfigError};
use crate::query::{Params, ParamsError, Row};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute `sql` with `params` and decode every returned row into
    /// column name to value form. Statements without a result set simply
    /// produce no rows.
    async fn fetch_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>, ConnectionError>;
}

/// Open a connection for the given connection string, the scheme picks the
/// backend.
pub async fn connect(url: &str) -> Result<Arc<dyn Connection>, ConnectionError> {
    if url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteConnection::connect(url).await?))
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(PostgresConnection::connect(url).await?))
    } else {
        Err(ConnectionError::UnsupportedScheme(url.to_string()))
    }
}

static DEFAULT_CONNECTION: Lazy<RwLock<Option<Arc<dyn Connection>>>> =
    Lazy::new(|| RwLock::new(None));

/// Register the process wide default connection.
pub fn set_default(connection: Arc<dyn Connection>) {
    let mut guard = DEFAULT_CONNECTION
        .write()
        .expect("default connection lock poisoned");
    *guard = Some(connection);
}

/// Drop the process wide default connection, the next `default()` call
/// resolves from the config file again.
pub fn clear_default() {
    let mut guard = DEFAULT_CONNECTION
        .write()
        .expect("default connection lock poisoned");
    *guard = None;
}

/// The process wide default connection. When none was registered the
/// config file is resolved and the resulting connection kept for later
/// callers; without a config file this is the fatal configuration error.
pub async fn default() -> Result<Arc<dyn Connection>, ConnectionError> {
    {
        let guard = DEFAULT_CONNECTION
            .read()
            .expect("default connection lock poisoned");
        if let Some(connection) = guard.as_ref() {
            return Ok(connection.clone());
        }
    }

    let config = match Config::resolve() {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => return Err(ConnectionError::NotConfigured),
        Err(e) => return Err(ConnectionError::ConfigError(e)),
    };

    info!("Resolved default connection from config file");
    let connection = connect(&config.connection_string).await?;
    set_default(connection.clone());
    Ok(connection)
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("No database connection is configured, register one with connection::set_default or provide a config file")]
    NotConfigured,
    #[error("Connection string {0:?} has an unsupported scheme")]
    UnsupportedScheme(String),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    ParamsError(#[from] ParamsError),
    #[error(transparent)]
    DriverError(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let result = aw!(connect("mysql://localhost/app"));
        assert!(matches!(
            result,
            Err(ConnectionError::UnsupportedScheme(url)) if url.starts_with("mysql")
        ));
    }

    #[test]
    fn test_sqlite_scheme_dispatches() -> Result<(), Box<dyn std::error::Error>> {
        let connection = aw!(connect("sqlite::memory:"))?;
        let rows = aw!(connection.fetch_rows("select 1 as one", &Params::None))?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }
}
