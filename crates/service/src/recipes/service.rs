use std::time::Duration;

use common::types::{Notice, DEFAULT_NOTICE_TTL_MS};
use configs::RecipesConfig;
use serde::Serialize;
use tracing::{info, warn};

use super::{AllowList, RecipeCard, RecipeClient, RemoteFetchError};

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to server.";

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResults {
    /// The query whose results are shown (after any fallback).
    pub query: String,
    pub cards: Vec<RecipeCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Search-as-you-type front over [`RecipeClient`], with the default-query
/// fallbacks and the optional allow-list.
pub struct RecipeSearch {
    client: RecipeClient,
    allow_list: Option<AllowList>,
    default_query: String,
    min_query_len: usize,
    notice_ttl_ms: u64,
}

impl RecipeSearch {
    pub fn new(client: RecipeClient, default_query: impl Into<String>, min_query_len: usize) -> Self {
        Self {
            client,
            allow_list: None,
            default_query: default_query.into(),
            min_query_len,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }

    /// Build from config, fetching the allow-list once when one is configured.
    /// An unreachable allow-list is logged and search runs unrestricted.
    pub async fn from_config(cfg: &RecipesConfig, notice_ttl_ms: u64) -> Result<Self, RemoteFetchError> {
        let client = RecipeClient::new(cfg.base_url.clone(), Duration::from_secs(cfg.timeout_secs))?;
        let allow_list = match &cfg.allow_list_url {
            Some(url) => match AllowList::fetch(&client, url).await {
                Ok(list) => {
                    info!(%url, phrases = list.len(), "recipe allow-list loaded");
                    Some(list)
                }
                Err(e) => {
                    warn!(%url, error = %e, "recipe allow-list unavailable; searching without it");
                    None
                }
            },
            None => None,
        };
        let mut search = Self::new(client, cfg.default_query.clone(), cfg.min_query_len);
        search.allow_list = allow_list;
        search.notice_ttl_ms = notice_ttl_ms;
        Ok(search)
    }

    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = Some(allow_list);
        self
    }

    pub fn default_query(&self) -> &str {
        &self.default_query
    }

    async fn fetch_cards(&self, query: &str) -> Result<Vec<RecipeCard>, RemoteFetchError> {
        let recipes = self.client.search(query).await?;
        Ok(recipes.iter().map(RecipeCard::from).collect())
    }

    fn results(&self, query: &str, cards: Vec<RecipeCard>, notice: Option<Notice>) -> RecipeResults {
        RecipeResults {
            query: query.to_string(),
            cards,
            notice: notice.map(|n| n.with_ttl(self.notice_ttl_ms)),
        }
    }

    /// Run one search for the raw input box value.
    pub async fn search(&self, raw: &str) -> RecipeResults {
        let trimmed = raw.trim();
        let default = self.default_query.as_str();
        let mut notice = None;

        let mut query = if trimmed.chars().count() >= self.min_query_len { trimmed } else { default };
        if let Some(list) = &self.allow_list {
            if query != default && !list.contains(query) {
                notice = Some(Notice::warning(format!(
                    "\"{query}\" is not a supported search. Showing \"{default}\" instead."
                )));
                query = default;
            }
        }

        match self.fetch_cards(query).await {
            Ok(cards) if !cards.is_empty() => self.results(query, cards, notice),
            Ok(_) => {
                let notice = Notice::danger(format!(
                    "No results found for \"{query}\". Showing \"{default}\" instead."
                ));
                if query == default {
                    return self.results(query, Vec::new(), Some(notice));
                }
                let cards = self.fetch_cards(default).await.unwrap_or_else(|e| {
                    warn!(query = default, error = %e, "default recipe query failed");
                    Vec::new()
                });
                self.results(default, cards, Some(notice))
            }
            Err(RemoteFetchError::Connect(e)) => {
                warn!(query, error = %e, "recipe endpoint unreachable");
                self.results(query, Vec::new(), Some(Notice::danger(CONNECT_FAILED_MESSAGE)))
            }
            Err(e) => {
                warn!(query, error = %e, "recipe response unusable");
                let notice = Notice::danger(format!("Error processing data: {e}"));
                if query == default {
                    return self.results(query, Vec::new(), Some(notice));
                }
                match self.fetch_cards(default).await {
                    Ok(cards) => self.results(default, cards, Some(notice)),
                    Err(e) => {
                        warn!(query = default, error = %e, "default recipe query failed");
                        self.results(default, Vec::new(), Some(notice))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use common::types::NoticeLevel;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn stub_search(Query(params): Query<HashMap<String, String>>) -> Response {
        let q = params.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
        match q.as_str() {
            "pizza" => Json(json!({"count": 2, "recipes": [
                {"title": "Best Pizza Dough Ever", "image_url": "http://img/1.jpg", "publisher": "x"},
                {"title": "Pizza", "image_url": "http://img/2.jpg"}
            ]}))
            .into_response(),
            "pasta" => Json(json!({"recipes": [
                {"title": "Creamy Garlic Pasta", "image_url": "http://img/3.jpg"}
            ]}))
            .into_response(),
            "broken" => (StatusCode::OK, "<html>oops</html>").into_response(),
            "badshape" => Json(json!({"recipes": [{"name": "no title"}]})).into_response(),
            _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "Couldn't find recipe"}))).into_response(),
        }
    }

    async fn stub_queries() -> Json<Vec<&'static str>> {
        Json(vec!["pizza", "pasta"])
    }

    async fn start_stub() -> anyhow::Result<String> {
        let app = Router::new()
            .route("/api/search", get(stub_search))
            .route("/queries", get(stub_queries));
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("stub error: {}", e); }
        });
        Ok(format!("http://{}", addr))
    }

    fn search_for(base: &str) -> RecipeSearch {
        let client = RecipeClient::new(base, Duration::from_secs(5)).expect("client");
        RecipeSearch::new(client, "pizza", 2)
    }

    #[tokio::test]
    async fn short_query_uses_default_and_shortens_titles() -> anyhow::Result<()> {
        let base = start_stub().await?;
        let res = search_for(&base).search(" p ").await;
        assert_eq!(res.query, "pizza");
        assert!(res.notice.is_none());
        assert_eq!(res.cards.len(), 2);
        assert_eq!(res.cards[0].title, "Best Pizza");
        Ok(())
    }

    #[tokio::test]
    async fn no_results_falls_back_to_default() -> anyhow::Result<()> {
        let base = start_stub().await?;
        let res = search_for(&base).search("sushi").await;
        assert_eq!(res.query, "pizza");
        assert_eq!(res.cards.len(), 2);
        let notice = res.notice.expect("notice");
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(notice.text.contains("\"sushi\""));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_responses_report_and_fall_back() -> anyhow::Result<()> {
        let base = start_stub().await?;
        let search = search_for(&base);
        for q in ["broken", "badshape"] {
            let res = search.search(q).await;
            assert_eq!(res.query, "pizza");
            assert_eq!(res.cards.len(), 2);
            let notice = res.notice.expect("notice");
            assert!(notice.text.starts_with("Error processing data:"), "{}", notice.text);
        }
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_endpoint_shows_connect_message() -> anyhow::Result<()> {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let res = search_for(&format!("http://{}", addr)).search("pasta").await;
        assert!(res.cards.is_empty());
        assert_eq!(res.notice.map(|n| n.text), Some(CONNECT_FAILED_MESSAGE.to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn allow_list_from_config_restricts_queries() -> anyhow::Result<()> {
        let base = start_stub().await?;
        let cfg = RecipesConfig {
            base_url: base.clone(),
            allow_list_url: Some(format!("{}/queries", base)),
            ..RecipesConfig::default()
        };
        let search = RecipeSearch::from_config(&cfg, 3000).await?;

        let res = search.search("Pasta").await;
        assert_eq!(res.query, "Pasta");
        assert_eq!(res.cards[0].title, "Creamy Garlic");

        let res = search.search("broken").await;
        assert_eq!(res.query, "pizza");
        assert_eq!(res.notice.map(|n| n.level), Some(NoticeLevel::Warning));
        Ok(())
    }

    #[tokio::test]
    async fn missing_allow_list_is_not_fatal() -> anyhow::Result<()> {
        let base = start_stub().await?;
        let cfg = RecipesConfig {
            base_url: base.clone(),
            allow_list_url: Some(format!("{}/missing", base)),
            ..RecipesConfig::default()
        };
        let search = RecipeSearch::from_config(&cfg, 3000).await?;
        assert_eq!(search.search("pasta").await.cards.len(), 1);
        Ok(())
    }
}
