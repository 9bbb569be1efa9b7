mod common;

use querytojson::config::CONFIG_PATH_VAR;
use querytojson::connection::{self, ConnectionError};
use querytojson::query::{Query, QueryError};
use serde_json::json;
use std::env;
use std::fs;

fn assert_not_configured(result: Result<Query, QueryError>) {
    match result {
        Err(QueryError::ConnectionError(ConnectionError::NotConfigured)) => {}
        Err(e) => panic!("expected the missing-connection error, got {}", e),
        Ok(_) => panic!("expected the missing-connection error, got a query"),
    }
}

//The default connection registry and the config file lookup are process
//wide, so the whole lifecycle runs as one sequential test.
#[tokio::test]
async fn default_connection_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    //Point the lookup away from any real config file first
    env::set_var(CONFIG_PATH_VAR, "/definitely/not/here.toml");
    connection::clear_default();

    //No registered connection and no config file fails before executing
    assert_not_configured(Query::with_default("select 1").await);

    //A config file supplies the connection string
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("query-to-json.toml");
    fs::write(&config_path, "connection_string = \"sqlite::memory:\"\n")?;
    env::set_var(CONFIG_PATH_VAR, &config_path);

    let mut query = Query::with_default("select 3 as three").await?;
    assert_eq!(query.result().await?[0].get("three"), Some(&json!(3)));

    //The resolved handle was kept, later callers reuse it even after the
    //file goes away
    env::set_var(CONFIG_PATH_VAR, "/definitely/not/here.toml");
    let mut query = Query::with_default("select 4 as four").await?;
    assert_eq!(query.result().await?[0].get("four"), Some(&json!(4)));

    //Clearing the registry drops back to the failing lookup
    connection::clear_default();
    assert_not_configured(Query::with_default("select 1").await);

    //Explicit registration wins over everything
    let seeded = common::_seeded_connection().await?;
    connection::set_default(seeded);
    let mut query = Query::with_default("select count(*) as n from users").await?;
    assert_eq!(query.result().await?[0].get("n"), Some(&json!(3)));

    connection::clear_default();
    Ok(())
}
