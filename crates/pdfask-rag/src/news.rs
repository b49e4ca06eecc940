//! Live news context via the RapidAPI real-time news search
//!
//! Failures never propagate: they are logged and the caller simply gets
//! no context.

use async_trait::async_trait;
use pdfask_core::{NewsConfig, PdfAskError, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Source of external context for a question
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Context text for `query`, or `None` when nothing useful was found
    async fn context_for(&self, query: &str) -> Option<String>;
}

/// Real-time news search client
pub struct NewsClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
    limit: u32,
    country: String,
    lang: String,
    max_context_chars: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsResponse {
    data: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Article {
    title: String,
    text: String,
}

impl NewsClient {
    /// Create from config; fails when no API key is configured
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PdfAskError::ConfigError("RAPIDAPI_KEY required".to_string()))?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host: config.host.clone(),
            api_key,
            limit: config.limit,
            country: config.country.clone(),
            lang: config.lang.clone(),
            max_context_chars: config.max_context_chars,
        })
    }

    async fn fetch(&self, query: &str) -> std::result::Result<String, reqwest::Error> {
        let limit = self.limit.to_string();
        let response: NewsResponse = self
            .client
            .get(format!("{}/search-news", self.base_url))
            .query(&[
                ("query", query),
                ("limit", limit.as_str()),
                ("country", self.country.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_articles(&response.data, self.max_context_chars))
    }
}

#[async_trait]
impl ContextSource for NewsClient {
    async fn context_for(&self, query: &str) -> Option<String> {
        match self.fetch(query).await {
            Ok(context) if !context.is_empty() => {
                debug!(chars = context.chars().count(), "Fetched live news context");
                Some(context)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Live news error");
                None
            }
        }
    }
}

/// Render articles as `📰 title\ntext` blocks, truncated to `max_chars`
fn format_articles(articles: &[Article], max_chars: usize) -> String {
    articles
        .iter()
        .map(|a| format!("📰 {}\n{}", a.title, a.text))
        .collect::<Vec<_>>()
        .join("\n\n")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> NewsConfig {
        NewsConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            ..NewsConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(NewsClient::from_config(&NewsConfig::default()).is_err());
    }

    #[test]
    fn test_format_articles() {
        let articles = vec![
            Article {
                title: "Rates hold".to_string(),
                text: "The bank held rates.".to_string(),
            },
            Article {
                title: "Storm".to_string(),
                text: "Heavy rain.".to_string(),
            },
        ];

        assert_eq!(
            format_articles(&articles, 2000),
            "📰 Rates hold\nThe bank held rates.\n\n📰 Storm\nHeavy rain."
        );
        assert_eq!(format_articles(&articles, 3), "📰 R");
        assert_eq!(format_articles(&[], 2000), "");
    }

    #[tokio::test]
    async fn test_context_for_sends_rapidapi_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search-news"))
            .and(query_param("query", "inflation"))
            .and(query_param("limit", "5"))
            .and(query_param("country", "US"))
            .and(query_param("lang", "en"))
            .and(header("x-rapidapi-key", "test-key"))
            .and(header("x-rapidapi-host", "real-time-news-data.p.rapidapi.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "data": [{"title": "CPI up", "text": "Prices rose 3%."}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NewsClient::from_config(&config_for(&server)).unwrap();
        let context = client.context_for("inflation").await;
        assert_eq!(context.as_deref(), Some("📰 CPI up\nPrices rose 3%."));
    }

    #[tokio::test]
    async fn test_context_for_swallows_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = NewsClient::from_config(&config_for(&server)).unwrap();
        assert!(client.context_for("anything").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_result_is_no_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let client = NewsClient::from_config(&config_for(&server)).unwrap();
        assert!(client.context_for("anything").await.is_none());
    }
}
