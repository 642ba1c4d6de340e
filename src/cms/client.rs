//! HTTP transport for the CMS query API

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::error::{CmsError, Result};
use crate::config::CmsConfig;

/// Named query parameters; each is sent as `$name=<json>`
pub type QueryParams = BTreeMap<String, serde_json::Value>;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Thin client over `GET /v{version}/data/query/{dataset}`
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl SanityClient {
    /// Build a client for a configured project
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let project_id = config.project_id().ok_or(CmsError::NotConfigured)?;

        let host = match &config.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None if config.use_cdn => format!("https://{}.apicdn.sanity.io", project_id),
            None => format!("https://{}.api.sanity.io", project_id),
        };
        let endpoint = format!(
            "{}/v{}/data/query/{}",
            host,
            config.api_version.trim_start_matches('v'),
            config.dataset
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("portfolio-ssg/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query and decode its `result` member
    pub async fn fetch<T: DeserializeOwned>(&self, query: &str, params: &QueryParams) -> Result<T> {
        let mut pairs = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(CmsError::Param {
                    name: name.clone(),
                    message: "names must be alphanumeric".to_string(),
                });
            }
            pairs.push((format!("${}", name), serde_json::to_string(value)?));
        }

        let mut request = self.http.get(&self.endpoint).query(&pairs);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("CMS query -> {}", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let envelope: QueryResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> CmsConfig {
        CmsConfig {
            project_id: Some("proj".to_string()),
            dataset: "production".to_string(),
            token: Some("secret".to_string()),
            api_host: Some(server.base_url()),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_shapes() {
        let mut config = CmsConfig {
            project_id: Some("abc".to_string()),
            ..Default::default()
        };
        let client = SanityClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://abc.api.sanity.io/v2023-05-03/data/query/production"
        );

        config.use_cdn = true;
        let client = SanityClient::new(&config).unwrap();
        assert!(client.endpoint().starts_with("https://abc.apicdn.sanity.io/"));
    }

    #[test]
    fn test_unconfigured_is_an_error() {
        let err = SanityClient::new(&CmsConfig::default()).unwrap_err();
        assert!(matches!(err, CmsError::NotConfigured));
    }

    #[tokio::test]
    async fn test_fetch_sends_query_params_and_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2023-05-03/data/query/production")
                    .query_param("query", "*[_type == $kind]")
                    .query_param("$kind", "\"post\"")
                    .header("authorization", "Bearer secret");
                then.status(200)
                    .json_body(serde_json::json!({"ms": 3, "result": [1, 2, 3]}));
            })
            .await;

        let client = SanityClient::new(&config_for(&server)).unwrap();
        let mut params = QueryParams::new();
        params.insert("kind".to_string(), serde_json::json!("post"));
        let result: Vec<u32> = client.fetch("*[_type == $kind]", &params).await.unwrap();

        assert_eq!(result, vec![1, 2, 3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_status_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(401).body("unauthorized");
            })
            .await;

        let client = SanityClient::new(&config_for(&server)).unwrap();
        let err = client
            .fetch::<Vec<u32>>("*", &QueryParams::new())
            .await
            .unwrap_err();
        match err {
            CmsError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_rejects_bad_param_names() {
        let server = MockServer::start_async().await;
        let client = SanityClient::new(&config_for(&server)).unwrap();
        let mut params = QueryParams::new();
        params.insert("bad name".to_string(), serde_json::json!(1));
        let err = client.fetch::<u32>("*", &params).await.unwrap_err();
        assert!(matches!(err, CmsError::Param { .. }));
    }
}
