//! # ヘルスチェックハンドラ
//!
//! サービスの稼働状態と依存リソースの疎通を確認するエンドポイント。
//!
//! - `GET /health`: プロセスの生存確認（依存先は見ない）
//! - `GET /health/ready`: PostgreSQL / Redis への疎通確認
//!
//! レスポンス型は [`mailflow_shared::HealthResponse`] /
//! [`mailflow_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use mailflow_infra::RedisSessionManager;
use mailflow_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use sqlx::PgPool;

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// readiness チェックの共有状態
#[derive(Clone)]
pub struct ReadinessState {
    pub pool:  PgPool,
    pub redis: Arc<RedisSessionManager>,
}

/// readiness チェックエンドポイント
///
/// PostgreSQL と Redis へ実際に疎通し、どちらかが失敗した場合は
/// 503 Service Unavailable を返す。
pub async fn readiness_check(
    State(state): State<ReadinessState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut checks = HashMap::new();

    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "PostgreSQL への疎通確認に失敗");
            CheckStatus::Error
        }
    };
    checks.insert("database".to_string(), database);

    let redis = match state.redis.ping().await {
        Ok(()) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "Redis への疎通確認に失敗");
            CheckStatus::Error
        }
    };
    checks.insert("redis".to_string(), redis);

    let ready = checks.values().all(|c| *c == CheckStatus::Ok);
    let (status_code, status) = if ready {
        (StatusCode::OK, ReadinessStatus::Ready)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ReadinessStatus::NotReady)
    };

    (status_code, Json(ReadinessResponse { status, checks }))
}
