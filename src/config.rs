use crate::services::store::{ChannelStore, DataApiStore, EsStore};
use crate::AppState;
use anyhow::{anyhow, Context, Result};
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;

pub fn init_logger() {
    Builder::new().filter_level(LevelFilter::Info).init();
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Build the managed state from the environment. The store handle is
/// constructed once here and owned by the caller for the process lifetime.
pub fn create_app_state() -> Result<AppState> {
    let collection =
        env::var("CHANNEL_DATA_INDEX").unwrap_or_else(|_| "channel_data".to_string());
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "elasticsearch".to_string());

    let store: Box<dyn ChannelStore> = match backend.as_str() {
        "elasticsearch" => {
            let es_url = env::var("ELASTICSEARCH_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string());
            info!("Connecting to Elasticsearch at: {es_url}");
            Box::new(EsStore::connect(&es_url, collection)?)
        }
        "data-api" => {
            let endpoint = env::var("DATA_API_ENDPOINT")
                .context("DATA_API_ENDPOINT must be set for the data-api store")?;
            let token = env::var("DATA_API_TOKEN")
                .context("DATA_API_TOKEN must be set for the data-api store")?;
            info!("Using document API store at: {endpoint}");
            Box::new(DataApiStore::new(endpoint, token, collection))
        }
        other => return Err(anyhow!("Unknown STORE_BACKEND: {other}")),
    };

    Ok(AppState { store })
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&["http://localhost:8080"]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&[
            "Authorization",
            "Accept",
            "Content-Type",
        ]))
        .allow_credentials(true)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
