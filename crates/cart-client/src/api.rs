//! Typed REST client for the item service.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use cart_domain::{Item, ItemId, ItemPatch, NewItem};

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct ItemEnvelope {
    item: Item,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Reqwest wrapper over the REST surface. One instance per server;
/// cheaply cloneable.
#[derive(Debug, Clone)]
pub struct ItemsApi {
    http: reqwest::Client,
    base: Url,
}

impl ItemsApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.base.as_str().trim_end_matches('/'))
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/{}", self.items_url(), id)
    }

    /// GET /items
    pub async fn list(&self) -> Result<Vec<Item>, ClientError> {
        let resp = self.http.get(self.items_url()).send().await?;
        let envelope: ItemsEnvelope = expect_success(resp, StatusCode::OK).await?;
        Ok(envelope.items)
    }

    /// POST /items
    pub async fn create(&self, new: &NewItem) -> Result<Item, ClientError> {
        let resp = self.http.post(self.items_url()).json(new).send().await?;
        let envelope: ItemEnvelope = expect_success(resp, StatusCode::CREATED).await?;
        Ok(envelope.item)
    }

    /// PATCH /items/{id}
    pub async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ClientError> {
        let resp = self.http.patch(self.item_url(id)).json(patch).send().await?;
        let envelope: ItemEnvelope = expect_success(resp, StatusCode::OK).await?;
        Ok(envelope.item)
    }

    /// DELETE /items/{id}
    pub async fn delete(&self, id: ItemId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        expect_success::<serde_json::Value>(resp, StatusCode::OK).await?;
        Ok(())
    }
}

/// Decode a success body, or turn a non-success status into
/// [`ClientError::Rejected`] carrying the server's `error` string when one
/// is present.
async fn expect_success<T: serde::de::DeserializeOwned>(
    resp: Response,
    expected: StatusCode,
) -> Result<T, ClientError> {
    let status = resp.status();
    if status != expected && !status.is_success() {
        let message = match resp.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json::<T>().await?)
}
