//! HTTP client for the inventory API and the terminal views built on it.

pub mod views;

use indexmap::IndexMap;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::models::{Health, Item};

#[derive(Debug, Error)]
pub enum ClientError {
    /// 422 from the API.
    #[error("{message}")]
    Validation {
        message: String,
        errors: IndexMap<String, Vec<String>>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// Network failure, timeout, or an undecodable body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The message a user should see for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation { message, .. }
            | ClientError::NotFound(message)
            | ClientError::Server { message, .. } => message.clone(),
            ClientError::Transport(e) => e.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Error body shape shared by 404 and 422 responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ClientResult<Vec<Item>> {
        let response = self.http.get(self.url("/items")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, name: &str, quantity: i64) -> ClientResult<Item> {
        let response = self
            .http
            .post(self.url("/items"))
            .json(&json!({ "name": name, "quantity": quantity }))
            .send()
            .await?;
        let item: Item = check(response).await?.json().await?;
        debug!(id = item.id, "Item created");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i64) -> ClientResult<Item> {
        let response = self
            .http
            .get(self.url(&format!("/items/{id}")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Replace both fields of an existing item.
    #[instrument(skip(self))]
    pub async fn update_item(&self, id: i64, name: &str, quantity: i64) -> ClientResult<Item> {
        let response = self
            .http
            .put(self.url(&format!("/items/{id}")))
            .json(&json!({ "name": name, "quantity": quantity }))
            .send()
            .await?;
        let item: Item = check(response).await?.json().await?;
        debug!(id = item.id, "Item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/items/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> ClientResult<Health> {
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Pass successful responses through; turn everything else into a typed error.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message: body
                .message
                .unwrap_or_else(|| "Invalid request".to_string()),
            errors: body.errors,
        },
        StatusCode::NOT_FOUND => ClientError::NotFound(
            body.message
                .unwrap_or_else(|| "Resource not found".to_string()),
        ),
        _ => ClientError::Server {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
        },
    })
}
