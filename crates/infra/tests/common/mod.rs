//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するヘルパー。Rust の統合テスト規約に従い
//! `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use custflow_domain::customer::{Customer, CustomerId, CustomerProfile};
use custflow_infra::repository::{CustomerRepository, PostgresCustomerRepository};
use sqlx::PgPool;

/// 連絡先情報を作成する
pub fn profile(name: &str, phone: &str) -> CustomerProfile {
    CustomerProfile::new(name, phone).unwrap()
}

/// 顧客を 1 件登録して返す
pub async fn insert_customer(pool: &PgPool, name: &str, phone: &str) -> Customer {
    PostgresCustomerRepository::new(pool.clone())
        .insert(&profile(name, phone))
        .await
        .unwrap()
}

/// 存在しない顧客 ID
///
/// BIGSERIAL は 1 から採番されるため 0 と負数は必ず未使用。
pub fn missing_id() -> CustomerId {
    CustomerId::from_i64(-1)
}
