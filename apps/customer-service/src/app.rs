//! # Customer Service アプリケーション構築
//!
//! ルーター構築とミドルウェアレイヤーの適用を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! 顧客 API はメソッドを区別しないため [`any`] で登録する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use custflow_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    CustomerState,
    ReadinessState,
    block_customer,
    get_customer,
    health_check,
    list_active_customers,
    list_customers,
    readiness_check,
    remove_customer,
    save_customer,
    unblock_customer,
};

/// 顧客 API のルーター
pub fn customer_routes(state: Arc<CustomerState>) -> Router {
    Router::new()
        .route("/customers.getById", any(get_customer))
        .route("/customers.getAll", any(list_customers))
        .route("/customers.getAllActive", any(list_active_customers))
        .route("/customers.blockById", any(block_customer))
        .route("/customers.unblockById", any(unblock_customer))
        .route("/customers.removeById", any(remove_customer))
        .route("/customers.save", any(save_customer))
        .with_state(state)
}

/// アプリケーション全体のルーターを構築する
///
/// Request ID レイヤーは外側から Set → Trace → Propagate の順に適用する。
pub fn build_app(customer_state: Arc<CustomerState>, readiness_state: Arc<ReadinessState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(customer_routes(customer_state))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
