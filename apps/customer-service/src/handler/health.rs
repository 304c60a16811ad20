//! # ヘルスチェックハンドラ
//!
//! - `/health` - Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` - Readiness Check（DB の接続状態を確認）
//!
//! レスポンス型は [`custflow_shared::HealthResponse`] / [`custflow_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use custflow_infra::db;
use custflow_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// DB チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Customer Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool: PgPool,
}

/// Customer Service の Readiness Check エンドポイント
///
/// DB に `SELECT 1` が通れば 200、失敗またはタイムアウトなら 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let checks = HashMap::from([("database".to_string(), check_database(&state.pool).await)]);
    let response = ReadinessResponse::from_checks(checks);

    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

async fn check_database(pool: &PgPool) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, db::ping(pool)).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}
