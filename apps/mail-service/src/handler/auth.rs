//! # 認証ハンドラ
//!
//! アカウント登録とセッション認証のエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/signup` - アカウント登録（セッション開始込み）
//! - `POST /api/auth/signin` - サインイン
//! - `POST /api/auth/signout` - サインアウト
//!
//! 認証成功時に返る `token` を `Authorization: Bearer <token>` として
//! 送ることで、保護された API にアクセスできる。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use mailflow_domain::account::AccountId;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{AuthUseCase, auth::AuthenticatedAccount},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// アカウント登録リクエスト
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name:     String,
    pub email:    String,
    pub password: String,
}

/// サインインリクエスト
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email:    String,
    pub password: String,
}

/// アカウント情報
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id:    AccountId,
    pub name:  String,
    pub email: String,
}

/// 認証成功レスポンス
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token:   String,
    pub account: AccountResponse,
}

impl From<AuthenticatedAccount> for AuthResponse {
    fn from(authenticated: AuthenticatedAccount) -> Self {
        Self {
            token:   authenticated.session_id,
            account: AccountResponse {
                id:    authenticated.account_id,
                name:  authenticated.name,
                email: authenticated.email,
            },
        }
    }
}

// --- ハンドラ ---

/// POST /api/auth/signup
///
/// アカウントを登録し、セッションを開始する。
pub async fn signup(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authenticated = state
        .usecase
        .signup(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(authenticated))))
}

/// POST /api/auth/signin
///
/// サインインし、セッションを開始する。
pub async fn signin(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authenticated = state.usecase.signin(&req.email, &req.password).await?;
    Ok(Json(AuthResponse::from(authenticated)))
}

/// POST /api/auth/signout
///
/// Bearer トークンのセッションを破棄する。
pub async fn signout(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    state.usecase.signout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
