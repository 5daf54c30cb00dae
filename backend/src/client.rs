//! HTTP client for a running Cadastros API, used by `cadastros import`.

use async_trait::async_trait;
use cadastros_common::{ApiGateway, EntityKind, GatewayError, GatewayResult, Record};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// [`ApiGateway`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind)
    }

    fn member_url(&self, kind: EntityKind, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, kind, id)
    }

    async fn send(&self, method: Method, url: String, body: Option<&Record>) -> GatewayResult<Response> {
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or(body);

        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        response.json::<T>().await.map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ApiGateway for HttpGateway {
    async fn list(&self, kind: EntityKind) -> GatewayResult<Vec<Record>> {
        let response = self.send(Method::GET, self.collection_url(kind), None).await?;
        Self::decode(response).await
    }

    async fn create(&self, kind: EntityKind, payload: &Record) -> GatewayResult<Record> {
        let response = self.send(Method::POST, self.collection_url(kind), Some(payload)).await?;
        Self::decode(response).await
    }

    async fn update(&self, kind: EntityKind, id: i64, payload: &Record) -> GatewayResult<Record> {
        let response = self.send(Method::PUT, self.member_url(kind, id), Some(payload)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> GatewayResult<()> {
        self.send(Method::DELETE, self.member_url(kind, id), None).await?;
        Ok(())
    }
}
