use log::{error, info};
use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};

use crate::config::AppConfig;
use crate::utils::helpers::service_name;

pub async fn init(config: &AppConfig) -> Result<Client, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some(service_name());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client.database("admin").run_command(doc! { "ping": 1 }).await?;

    info!("Connected successfully to MongoDB");
    Ok(client)
}

/// Connects and returns the configured database.
pub async fn connect_to_mongo(config: &AppConfig) -> Result<Database, mongodb::error::Error> {
    let client = init(config).await.map_err(|e| {
        error!("Failed to initialize database: {:?}", e);
        e
    })?;
    Ok(client.database(&config.database_name))
}
