//! # 認証ミドルウェア
//!
//! Bearer トークン（セッション ID）を検証し、保護された API への
//! アクセスを制御する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let session_state = SessionState {
//!     session_manager: session_manager.clone(),
//! };
//!
//! Router::new()
//!     .route("/api/templates", get(list_templates))
//!     .layer(from_fn_with_state(session_state, require_session))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mailflow_infra::{SessionData, SessionManager};

use crate::error::ApiError;

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct SessionState {
    pub session_manager: Arc<dyn SessionManager>,
}

/// Authorization ヘッダから Bearer トークンを取り出す
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// 認証ミドルウェア
///
/// `Authorization: Bearer <セッション ID>` を検証し、有効なセッションを
/// リクエスト拡張に格納してハンドラへ渡す。ヘッダがない・トークンが
/// 未知・セッション切れの場合は 401 Unauthorized を返す。
pub async fn require_session(
    State(state): State<SessionState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return ApiError::Unauthorized.into_response();
    };

    let session = match state.session_manager.get(token).await {
        Ok(Some(session)) => session,
        Ok(None) => return ApiError::Unauthorized.into_response(),
        Err(e) => return ApiError::Infra(e).into_response(),
    };

    request.extensions_mut().insert::<SessionData>(session);
    next.run(request).await
}
