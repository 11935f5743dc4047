//! Recipe search over the public forkify endpoint.
//!
//! The remote service is treated as an opaque source of `{title, image_url}`
//! items; everything here is about what to show when it misbehaves.

pub mod allow_list;
pub mod client;
pub mod service;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use allow_list::AllowList;
pub use client::RecipeClient;
pub use service::{RecipeResults, RecipeSearch};

#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("{0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Recipe {
    pub title: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeCard {
    pub title: String,
    pub image_url: String,
}

impl From<&Recipe> for RecipeCard {
    fn from(r: &Recipe) -> Self {
        Self { title: short_title(&r.title), image_url: r.image_url.clone() }
    }
}

/// First two space-separated words of a title.
pub fn short_title(title: &str) -> String {
    title.split(' ').take(2).collect::<Vec<_>>().join(" ")
}
