use querytojson::connection::{Connection, SqliteConnection};
use querytojson::query::{Params, Row};
use serde_json::json;
use std::sync::Arc;

pub async fn _seeded_connection() -> Result<Arc<dyn Connection>, Box<dyn std::error::Error>> {
    let connection: Arc<dyn Connection> =
        Arc::new(SqliteConnection::connect("sqlite::memory:").await?);

    connection
        .fetch_rows(
            "create table users (
                id integer primary key autoincrement,
                firstname text not null,
                lastname text not null,
                age int not null)",
            &Params::None,
        )
        .await?;

    for (firstname, lastname, age) in
        &[("John", "Doe", 30), ("Jane", "Doe", 22), ("Mark", "Foo", 20)]
    {
        connection
            .fetch_rows(
                "insert into users (firstname, lastname, age)
                 values (:firstname, :lastname, :age)",
                &Params::named(vec![
                    ("firstname".to_string(), json!(firstname)),
                    ("lastname".to_string(), json!(lastname)),
                    ("age".to_string(), json!(age)),
                ]),
            )
            .await?;
    }

    Ok(connection)
}

pub fn _seeded_users() -> Vec<Row> {
    vec![
        _user_row(1, "John", "Doe", 30),
        _user_row(2, "Jane", "Doe", 22),
        _user_row(3, "Mark", "Foo", 20),
    ]
}

pub fn _user_row(id: i64, firstname: &str, lastname: &str, age: i64) -> Row {
    vec![
        ("id".to_string(), json!(id)),
        ("firstname".to_string(), json!(firstname)),
        ("lastname".to_string(), json!(lastname)),
        ("age".to_string(), json!(age)),
    ]
    .into_iter()
    .collect()
}
