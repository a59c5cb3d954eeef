use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::register_toolbelt;

const BRAVE_API_BASE: &str = "https://api.search.brave.com/res/v1";
const DEFAULT_MAX_RESULTS: i64 = 5;
const MAX_RESULTS_CAP: i64 = 20;

/// Web, image, video and news lookups through the Brave Search API.
pub struct WebSearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Text,
    Images,
    Videos,
    News,
}

impl SearchKind {
    fn endpoint(&self) -> &'static str {
        match self {
            SearchKind::Text => "web/search",
            SearchKind::Images => "images/search",
            SearchKind::Videos => "videos/search",
            SearchKind::News => "news/search",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SearchKind::Text => "web",
            SearchKind::Images => "image",
            SearchKind::Videos => "video",
            SearchKind::News => "news",
        }
    }
}

/// One hit, reduced to the fields worth showing a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

register_toolbelt! {
    WebSearch {
        /// Performs a web search for textual content based on the provided query.
        /// Returns up to `max_results` results (default 5) with title, URL and snippet.
        fn web_search_text(query: String, max_results: Option<i64>);

        /// Performs a web search for images based on the provided query.
        /// Returns up to `max_results` results (default 5) with image URL, source and thumbnail.
        fn web_search_images(query: String, max_results: Option<i64>);

        /// Performs a web search for videos based on the provided query.
        /// Returns up to `max_results` results (default 5) with title, URL and description.
        fn web_search_videos(query: String, max_results: Option<i64>);

        /// Performs a web search for news articles based on the provided query.
        /// Returns up to `max_results` results (default 5) with headline, URL, source and age.
        fn web_search_news(query: String, max_results: Option<i64>);
    }
}

impl WebSearch {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("WebGPT/0.1")
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BRAVE_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn web_search_text(&self, query: String, max_results: Option<i64>) -> Result<Vec<SearchResult>> {
        self.search(SearchKind::Text, &query, max_results).await
    }

    async fn web_search_images(&self, query: String, max_results: Option<i64>) -> Result<Vec<SearchResult>> {
        self.search(SearchKind::Images, &query, max_results).await
    }

    async fn web_search_videos(&self, query: String, max_results: Option<i64>) -> Result<Vec<SearchResult>> {
        self.search(SearchKind::Videos, &query, max_results).await
    }

    async fn web_search_news(&self, query: String, max_results: Option<i64>) -> Result<Vec<SearchResult>> {
        self.search(SearchKind::News, &query, max_results).await
    }

    async fn search(&self, kind: SearchKind, query: &str, max_results: Option<i64>) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            bail!("query cannot be empty");
        }

        let count = result_count(max_results);
        let count_str = count.to_string();

        let response = self
            .client
            .get(format!("{}/{}", self.base_url.trim_end_matches('/'), kind.endpoint()))
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[
                ("q", query),
                ("count", count_str.as_str()),
                ("search_lang", "en"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("{} search failed: {}", kind.label(), response.status());
        }

        let data: Value = response.json().await?;
        let results = parse_results(kind, &data, count);
        debug!(kind = kind.label(), query, results = results.len(), "search complete");

        Ok(results)
    }
}

fn result_count(max_results: Option<i64>) -> usize {
    max_results.unwrap_or(DEFAULT_MAX_RESULTS).clamp(1, MAX_RESULTS_CAP) as usize
}

fn parse_results(kind: SearchKind, data: &Value, limit: usize) -> Vec<SearchResult> {
    // Web hits are nested one level deeper than the vertical endpoints.
    let results = match kind {
        SearchKind::Text => &data["web"]["results"],
        _ => &data["results"],
    };

    let Some(results) = results.as_array() else {
        return vec![];
    };

    results
        .iter()
        .take(limit)
        .map(|hit| match kind {
            SearchKind::Text => SearchResult {
                title: text(hit, &["title"]).unwrap_or_else(|| "No title".to_string()),
                url: text(hit, &["url"]).unwrap_or_default(),
                description: text(hit, &["description"]),
                source: text(hit, &["profile", "name"]),
                age: text(hit, &["age"]),
                thumbnail: None,
            },
            SearchKind::Images => SearchResult {
                title: text(hit, &["title"]).unwrap_or_else(|| "No title".to_string()),
                url: text(hit, &["properties", "url"])
                    .or_else(|| text(hit, &["url"]))
                    .unwrap_or_default(),
                description: None,
                source: text(hit, &["source"]),
                age: None,
                thumbnail: text(hit, &["thumbnail", "src"]),
            },
            SearchKind::Videos | SearchKind::News => SearchResult {
                title: text(hit, &["title"]).unwrap_or_else(|| "No title".to_string()),
                url: text(hit, &["url"]).unwrap_or_default(),
                description: text(hit, &["description"]),
                source: text(hit, &["meta_url", "hostname"]),
                age: text(hit, &["age"]),
                thumbnail: text(hit, &["thumbnail", "src"]),
            },
        })
        .collect()
}

fn text(value: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
