//! HTTP client for the NetBox REST API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;
use crate::netbox::NetboxApi;

/// Connection settings for [`NetboxClient`].
#[derive(Debug, Clone)]
pub struct NetboxClientConfig {
    /// NetBox base URL, e.g. `https://netbox.example.com`.
    pub server_url: String,
    /// API token.
    pub api_token: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

/// One page of a NetBox list response.
#[derive(Debug, Deserialize)]
struct PaginatedResponse {
    #[allow(dead_code)]
    count: u64,
    next: Option<String>,
    results: Vec<Value>,
}

/// NetBox REST API client.
///
/// Sends the `Authorization: Token <token>` header on every request and
/// follows `next` links when listing.
pub struct NetboxClient {
    client: Client,
    base_url: String,
    token: String,
}

impl NetboxClient {
    /// Create a new client. Fails if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: NetboxClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.api_token,
        })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn object_url(&self, endpoint: &str, id: i64) -> String {
        format!("{}/api/{}/{}/", self.base_url, endpoint, id)
    }

    fn collection_url(&self, endpoint: &str, filters: &[(String, String)]) -> String {
        let mut url = format!("{}/api/{}/", self.base_url, endpoint);
        let mut sep = '?';
        for (key, value) in filters {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            sep = '&';
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
    }

    async fn fetch_all_pages(&self, mut url: String) -> Result<Vec<Value>, ProviderError> {
        let mut all_results = Vec::new();

        loop {
            debug!(url = %url, "fetching page");

            let response = self.request(reqwest::Method::GET, &url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::from_api_response(status.as_u16(), body));
            }

            let text = response.text().await?;
            let page: PaginatedResponse = serde_json::from_str(&text).map_err(|e| {
                ProviderError::Api {
                    status: status.as_u16(),
                    body: format!(
                        "error decoding response body: {} (first 500 chars): {}",
                        e,
                        text.chars().take(500).collect::<String>()
                    ),
                }
            })?;
            all_results.extend(page.results);

            match page.next {
                Some(next_url) => {
                    url = if next_url.starts_with("http") {
                        next_url
                    } else {
                        format!("{}{}", self.base_url, next_url)
                    };
                }
                None => break,
            }
        }

        Ok(all_results)
    }
}

#[async_trait::async_trait]
impl NetboxApi for NetboxClient {
    async fn get(&self, endpoint: &str, id: i64) -> Result<Option<Value>, ProviderError> {
        let url = self.object_url(endpoint, id);
        debug!(endpoint = %endpoint, id = id, "GET object");

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_api_response(status.as_u16(), body));
        }

        Ok(Some(response.json().await?))
    }

    async fn list(
        &self,
        endpoint: &str,
        filters: &[(String, String)],
    ) -> Result<Vec<Value>, ProviderError> {
        let url = self.collection_url(endpoint, filters);
        debug!(endpoint = %endpoint, filters = filters.len(), "LIST objects");
        self.fetch_all_pages(url).await
    }

    async fn create(&self, endpoint: &str, payload: &Value) -> Result<Value, ProviderError> {
        let url = format!("{}/api/{}/", self.base_url, endpoint);
        debug!(endpoint = %endpoint, "POST object");

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        // NetBox returns 201 Created with the full object
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_api_response(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    async fn update(
        &self,
        endpoint: &str,
        id: i64,
        payload: &Value,
    ) -> Result<Value, ProviderError> {
        let url = self.object_url(endpoint, id);
        debug!(endpoint = %endpoint, id = id, "PATCH object");

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_api_response(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    async fn delete(&self, endpoint: &str, id: i64) -> Result<bool, ProviderError> {
        let url = self.object_url(endpoint, id);
        debug!(endpoint = %endpoint, id = id, "DELETE object");

        let response = self.request(reqwest::Method::DELETE, &url).send().await?;
        let status = response.status();
        // 404 means the object is already gone, which delete treats as done
        if status.as_u16() == 404 {
            return Ok(false);
        }
        // NetBox returns 204 No Content on success
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_api_response(status.as_u16(), body));
        }

        Ok(true)
    }

    async fn status(&self) -> Result<Value, ProviderError> {
        let url = format!("{}/api/status/", self.base_url);
        debug!("probing NetBox status endpoint");

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(format!(
                "invalid token: {} - {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_api_response(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> NetboxClient {
        NetboxClient::new(NetboxClientConfig {
            server_url: url.to_string(),
            api_token: "token".to_string(),
            insecure: false,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let c = client("https://netbox.example.com/");
        assert_eq!(c.base_url(), "https://netbox.example.com");
    }

    #[test]
    fn test_object_url() {
        let c = client("https://netbox.example.com");
        assert_eq!(
            c.object_url("dcim/sites", 42),
            "https://netbox.example.com/api/dcim/sites/42/"
        );
    }

    #[test]
    fn test_collection_url_with_filters() {
        let c = client("https://netbox.example.com");
        assert_eq!(
            c.collection_url("dcim/sites", &[]),
            "https://netbox.example.com/api/dcim/sites/"
        );
        assert_eq!(
            c.collection_url(
                "dcim/sites",
                &[
                    ("slug".to_string(), "test-site-ds".to_string()),
                    ("status".to_string(), "active".to_string()),
                ]
            ),
            "https://netbox.example.com/api/dcim/sites/?slug=test-site-ds&status=active"
        );
    }

    #[test]
    fn test_collection_url_encodes_values() {
        let c = client("https://netbox.example.com");
        assert_eq!(
            c.collection_url(
                "dcim/sites",
                &[("name".to_string(), "Test Site DS".to_string())]
            ),
            "https://netbox.example.com/api/dcim/sites/?name=Test%20Site%20DS"
        );
    }

    #[test]
    fn test_pagination_response_shape() {
        let page: PaginatedResponse = serde_json::from_str(
            r#"{"count": 2, "next": "/api/dcim/sites/?offset=50", "previous": null,
                "results": [{"id": 1}, {"id": 2}]}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.next.as_deref(), Some("/api/dcim/sites/?offset=50"));
    }
}
