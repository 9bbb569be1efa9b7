//Vendor Imports
#[macro_use]
extern crate log;
extern crate simplelog;

use actix_web::{web, App, HttpServer};
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode};

//Application Imports
use querytojson::config::Config;
use querytojson::{connection, server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .unwrap();

    let config = match Config::resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not load a config file: {}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to {}", config.connection_string);
    let connection = match connection::connect(&config.connection_string).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Could not open the database connection: {}", e);
            std::process::exit(1);
        }
    };
    connection::set_default(connection.clone());

    info!("Up and listening on {}", config.server.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(connection.clone()))
            .configure(server::configure)
    })
    .bind(&config.server.bind)?
    .run()
    .await
}
