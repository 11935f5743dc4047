use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{Recipe, RemoteFetchError};

#[derive(Clone, Debug)]
pub struct RecipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecipeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteFetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteFetchError::Connect(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an arbitrary URL and decode it as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, RemoteFetchError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteFetchError::Connect(e.to_string()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RemoteFetchError::Connect(e.to_string()))?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(json) => Ok(json),
            Err(_) if !status.is_success() => Err(RemoteFetchError::Status(status.as_u16())),
            Err(e) => Err(RemoteFetchError::Malformed(e.to_string())),
        }
    }

    /// `GET {base}/api/search?q=<query>`.
    ///
    /// A JSON body without a `recipes` list (the API's answer to an unknown
    /// query) means no results, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>, RemoteFetchError> {
        let url = format!("{}/api/search", self.base_url);
        let mut json = self.get_json(&url, &[("q", query)]).await?;
        let recipes = match json.get_mut("recipes").map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(list) => serde_json::from_value::<Vec<Recipe>>(list)
                .map_err(|e| RemoteFetchError::Malformed(e.to_string()))?,
        };
        debug!(query, count = recipes.len(), "recipe search completed");
        Ok(recipes)
    }
}
