use anyhow::{bail, Result};
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::http::StatusCode;
use elasticsearch::{Elasticsearch, GetParts};
use reqwest::Client;
use serde_json::{json, Value};

/// Single-record lookup by channel ID. The two deployment variants (an
/// Elasticsearch index and a JSON document API) sit behind this one trait;
/// `STORE_BACKEND` picks the binding at startup.
#[rocket::async_trait]
pub trait ChannelStore: Send + Sync {
    /// `Ok(None)` means the store answered but holds no document for the
    /// channel. `Err` means the lookup itself failed.
    async fn find_channel(&self, channel_id: &str) -> Result<Option<Value>>;
}

pub struct EsStore {
    client: Elasticsearch,
    index: String,
}

impl EsStore {
    pub fn connect(url: &str, index: String) -> Result<Self> {
        let transport =
            TransportBuilder::new(SingleNodeConnectionPool::new(url.parse()?)).build()?;
        Ok(EsStore {
            client: Elasticsearch::new(transport),
            index,
        })
    }
}

#[rocket::async_trait]
impl ChannelStore for EsStore {
    async fn find_channel(&self, channel_id: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index, channel_id))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status_code().is_success() {
            bail!(
                "document lookup failed with status: {}",
                response.status_code()
            );
        }

        let body: Value = response.json().await?;
        Ok(body.get("_source").cloned())
    }
}

/// JSON document API binding (`findOne` over HTTP), matching the hosted
/// document-store deployment.
pub struct DataApiStore {
    http: Client,
    endpoint: String,
    token: String,
    collection: String,
}

impl DataApiStore {
    pub fn new(endpoint: String, token: String, collection: String) -> Self {
        DataApiStore {
            http: Client::new(),
            endpoint,
            token,
            collection,
        }
    }
}

#[rocket::async_trait]
impl ChannelStore for DataApiStore {
    async fn find_channel(&self, channel_id: &str) -> Result<Option<Value>> {
        let url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.collection
        );
        let body = json!({
            "findOne": {
                "filter": { "channel_id": channel_id }
            }
        });

        let response = self
            .http
            .post(&url)
            .header("Token", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let document = payload["data"]["document"].clone();
        if document.is_null() {
            Ok(None)
        } else {
            Ok(Some(document))
        }
    }
}
