//! # テンプレートハンドラ
//!
//! メッセージテンプレートのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/templates` - テンプレート作成
//! - `GET /api/templates` - テンプレート一覧（作成日時の降順）
//!
//! いずれも認証ミドルウェア（[`crate::middleware::require_session`]）の
//! 背後に配置される。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use mailflow_domain::template::Template;
use mailflow_shared::ApiResponse;
use serde::Deserialize;

use crate::{error::ApiError, usecase::TemplateUseCase};

/// テンプレートハンドラの共有状態
pub struct TemplateState {
    pub usecase: Arc<dyn TemplateUseCase>,
}

/// テンプレート作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub subject: String,
    pub content: String,
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<Arc<TemplateState>>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let template = state.usecase.create(&req.subject, &req.content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(template))))
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<Arc<TemplateState>>,
) -> Result<Json<ApiResponse<Vec<Template>>>, ApiError> {
    let templates = state.usecase.list().await?;
    Ok(Json(ApiResponse::new(templates)))
}
