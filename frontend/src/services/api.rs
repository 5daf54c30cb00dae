//! Service HTTP vers l'API Cadastros (gloo-net)

use async_trait::async_trait;
use cadastros_common::{ApiGateway, EntityKind, GatewayError, GatewayResult, Record};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::API_BASE_URL;

/// Client de l'API REST, un seul pour toutes les entités.
#[derive(Debug, Clone)]
pub struct ApiService {
    base_url: String,
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl ApiService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind)
    }

    fn member_url(&self, kind: EntityKind, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, kind, id)
    }

    /// Envoie la requête et transforme un statut d'erreur en `GatewayError`
    async fn send(builder: RequestBuilder, body: Option<&Record>) -> GatewayResult<Response> {
        let request: Request = match body {
            Some(body) => builder.json(body).map_err(|e| GatewayError::Network(e.to_string()))?,
            None => builder.build().map_err(|e| GatewayError::Network(e.to_string()))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.ok() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or(text);
            return Err(GatewayError::Status {
                status: response.status(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        response.json::<T>().await.map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ApiGateway for ApiService {
    async fn list(&self, kind: EntityKind) -> GatewayResult<Vec<Record>> {
        let response = Self::send(Request::get(&self.collection_url(kind)), None).await?;
        Self::decode(response).await
    }

    async fn create(&self, kind: EntityKind, payload: &Record) -> GatewayResult<Record> {
        let response = Self::send(Request::post(&self.collection_url(kind)), Some(payload)).await?;
        Self::decode(response).await
    }

    async fn update(&self, kind: EntityKind, id: i64, payload: &Record) -> GatewayResult<Record> {
        let response = Self::send(Request::put(&self.member_url(kind, id)), Some(payload)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> GatewayResult<()> {
        Self::send(Request::delete(&self.member_url(kind, id)), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let api = ApiService::new("/api/");
        assert_eq!(api.collection_url(EntityKind::Systems), "/api/systems");
        assert_eq!(api.member_url(EntityKind::Clients, 12), "/api/clients/12");
    }

    #[test]
    fn test_default_base_url() {
        let api = ApiService::default();
        assert_eq!(api.base_url, API_BASE_URL.trim_end_matches('/'));
    }
}
