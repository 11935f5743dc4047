use axum::{
    extract::{Query, State},
    Json,
};
use common::types::Envelope;
use serde::Serialize;
use service::recipes::RecipeCard;

use crate::routes::products::SearchParams;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub query: String,
    pub cards: Vec<RecipeCard>,
}

/// 菜谱搜索；远端失败以 notice 形式返回，不作为 HTTP 错误
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Envelope<RecipePage>> {
    let results = state.recipes.search(params.q.as_deref().unwrap_or_default()).await;
    let page = RecipePage { query: results.query, cards: results.cards };
    Json(match results.notice {
        Some(notice) => Envelope::with_notice(page, notice),
        None => Envelope::new(page),
    })
}
