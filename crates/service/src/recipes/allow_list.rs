use std::collections::HashSet;

use super::{RecipeClient, RemoteFetchError};

/// Phrases the recipe API is known to answer, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    phrases: HashSet<String>,
}

impl AllowList {
    pub fn from_phrases<I, T>(phrases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Fetch a JSON array of strings once.
    pub async fn fetch(client: &RecipeClient, url: &str) -> Result<Self, RemoteFetchError> {
        let json = client.get_json(url, &[]).await?;
        let phrases: Vec<String> =
            serde_json::from_value(json).map_err(|e| RemoteFetchError::Malformed(e.to_string()))?;
        Ok(Self::from_phrases(phrases))
    }

    pub fn contains(&self, query: &str) -> bool {
        self.phrases.contains(&query.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
