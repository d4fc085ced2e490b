use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `{"code": ..., "message": ...}` as returned by every failing endpoint.
#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// HTTP client bound to one API base URL (e.g. `http://localhost:3000/api`).
///
/// Clones share the bearer token, so a login through one handle
/// authenticates every store built from it.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self.send(self.http.get(self.url(path))).await?;
        Ok(res.json().await?)
    }

    pub async fn get_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let res = self
            .send(self.http.get(self.url(path)).query(query))
            .await?;
        Ok(res.json().await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let res = self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(res.json().await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let res = self.send(self.http.put(self.url(path)).json(body)).await?;
        Ok(res.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let req = match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let text = res.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %text, "API request failed");
        Err(match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => ClientError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: "HTTP_ERROR".into(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            },
        })
    }
}
