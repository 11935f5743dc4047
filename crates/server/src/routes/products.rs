use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use serde::{Deserialize, Serialize};
use service::catalog::{CatalogView, Deleted, EditForm, ImageUpload, LiveResult, ProductForm, Submitted};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Keystroke {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct LiveAccepted {
    pub debounce_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub submitted: Submitted,
    pub catalog: CatalogView,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: Deleted,
    pub catalog: CatalogView,
}

/// 列出商品；带 `q` 时按名称/分类/描述过滤
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Envelope<CatalogView>> {
    let query = params.q.unwrap_or_default();
    Json(Envelope::new(state.catalog.search(&query).await))
}

/// Pull the text fields and the image part out of a multipart form.
async fn read_form(mut multipart: Multipart) -> Result<(ProductForm, Option<ImageUpload>), JsonApiError> {
    let mut form = ProductForm::default();
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(JsonApiError::bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(JsonApiError::bad_multipart)?;
                // An untouched file input still sends a part, with an empty file name.
                if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                    image = Some(ImageUpload { file_name, content_type, bytes: bytes.to_vec() });
                }
            }
            "name" => form.name = field.text().await.map_err(JsonApiError::bad_multipart)?,
            "price" => form.price = field.text().await.map_err(JsonApiError::bad_multipart)?,
            "category" => form.category = field.text().await.map_err(JsonApiError::bad_multipart)?,
            "description" => form.description = field.text().await.map_err(JsonApiError::bad_multipart)?,
            _ => {}
        }
    }
    Ok((form, image))
}

/// 提交表单：无编辑中的记录时新增，否则替换编辑中的记录
pub async fn submit_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Envelope<SubmitResponse>>, JsonApiError> {
    let (form, image) = read_form(multipart).await?;
    let outcome = state.catalog.submit(form, image).await?;
    let catalog = state.catalog.view().await;
    Ok(Json(Envelope::with_notice(
        SubmitResponse { submitted: outcome.value, catalog },
        outcome.notice,
    )))
}

/// 进入编辑模式并返回表单预填内容
pub async fn begin_edit(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Envelope<EditForm>>, JsonApiError> {
    let outcome = state.catalog.begin_edit(index).await?;
    Ok(Json(Envelope::with_notice(outcome.value, outcome.notice)))
}

/// 取消编辑（重置表单）
pub async fn cancel_edit(State(state): State<AppState>) -> Json<Envelope<CatalogView>> {
    Json(Envelope::new(state.catalog.cancel_edit().await))
}

/// 删除指定位置的商品
pub async fn delete_product(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Envelope<DeleteResponse>>, JsonApiError> {
    let outcome = state.catalog.delete(index).await?;
    let catalog = state.catalog.view().await;
    Ok(Json(Envelope::with_notice(
        DeleteResponse { deleted: outcome.value, catalog },
        outcome.notice,
    )))
}

/// 搜索框输入：重新计时，停止输入后才真正执行搜索
pub async fn live_input(
    State(state): State<AppState>,
    Json(keystroke): Json<Keystroke>,
) -> (StatusCode, Json<LiveAccepted>) {
    state.live.input(keystroke.q);
    (StatusCode::ACCEPTED, Json(LiveAccepted { debounce_ms: state.ui.search_debounce_ms }))
}

/// 最近一次已落定的实时搜索结果
pub async fn live_result(State(state): State<AppState>) -> Json<Envelope<LiveResult>> {
    Json(Envelope::new(state.live.latest()))
}
