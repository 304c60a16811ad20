//! # Customer Service エラー定義
//!
//! Customer Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディはステータスの理由句（`Not Found` など）のみの `text/plain`。
//! エラーの詳細はサーバーログにのみ出力し、クライアントには返さない。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use custflow_domain::DomainError;
use custflow_infra::InfraError;
use thiserror::Error;

/// Customer Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー（ストアの結果が前提と食い違う場合など）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl CoreError {
    /// 対応する HTTP ステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        match &self {
            CoreError::BadRequest(msg) => tracing::debug!("不正なリクエスト: {}", msg),
            CoreError::NotFound(msg) => tracing::info!("リソースが見つかりません: {}", msg),
            CoreError::Database(e) => {
                tracing::error!(span_trace = %e.span_trace(), "データベースエラー: {}", e);
            }
            CoreError::Internal(msg) => tracing::error!("内部エラー: {}", msg),
        }

        let status = self.status_code();
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
