//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲

pub mod customer;
pub mod health;

pub use customer::{
    CustomerDto,
    CustomerState,
    block_customer,
    get_customer,
    list_active_customers,
    list_customers,
    remove_customer,
    save_customer,
    unblock_customer,
};
pub use health::{ReadinessState, health_check, readiness_check};
