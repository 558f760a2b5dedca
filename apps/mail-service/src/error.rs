//! # Mail Service エラー定義
//!
//! Mail Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## ステータスコードの方針
//!
//! | エラー | ステータス |
//! |--------|-----------|
//! | 入力バリデーション（件名欠落など） | 400 |
//! | 認証失敗・セッション無効 | 401 |
//! | 重複登録 | 409 |
//! | 宛先リストファイルの解析失敗 | 422 |
//! | インフラ障害 | 500（詳細は隠蔽） |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailflow_domain::{
    DomainError,
    dispatch::{DispatchError, ExtractionError, RenderError},
};
use mailflow_infra::InfraError;
use mailflow_shared::ErrorResponse;
use thiserror::Error;

/// Mail Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// ドメインルール違反
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// 配送呼び出しの中断（抽出・レンダリング失敗）
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// 認証失敗（サインイン時）
    #[error("認証に失敗しました")]
    AuthenticationFailed,

    /// セッションが無効または未提示
    #[error("セッションが無効です")]
    Unauthorized,

    /// リクエスト形式の不備（multipart の欠落フィールドなど）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// インフラストラクチャエラー
    #[error("インフラエラー: {0}")]
    Infra(#[from] InfraError),
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        Self::Dispatch(DispatchError::from(e))
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self::Dispatch(DispatchError::from(e))
    }
}

impl ApiError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Domain(DomainError::Validation(msg)) => {
                ErrorResponse::validation_error(msg.clone())
            }
            ApiError::Domain(DomainError::NotFound { .. }) => {
                ErrorResponse::not_found(self.to_string())
            }
            ApiError::Domain(DomainError::Conflict(msg)) => ErrorResponse::conflict(msg.clone()),
            ApiError::Dispatch(DispatchError::Extraction(e)) => match e {
                ExtractionError::MissingFile => ErrorResponse::validation_error(e.to_string()),
                ExtractionError::Read(_) | ExtractionError::Parse(_) => {
                    ErrorResponse::unprocessable("recipient-file-unreadable", e.to_string())
                }
            },
            ApiError::Dispatch(DispatchError::Render(e)) => match e {
                RenderError::MissingSubject | RenderError::MissingBody => {
                    ErrorResponse::validation_error(e.to_string())
                }
                RenderError::Template(msg) => {
                    tracing::error!("テンプレートレンダリング失敗: {msg}");
                    ErrorResponse::internal_error()
                }
            },
            ApiError::AuthenticationFailed => {
                ErrorResponse::unauthorized("メールアドレスまたはパスワードが正しくありません")
            }
            ApiError::Unauthorized => ErrorResponse::unauthorized("セッションが無効です"),
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Infra(e) => {
                tracing::error!(span_trace = %e.span_trace(), "インフラエラー: {e}");
                ErrorResponse::internal_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
