//! # CustomerRepository
//!
//! 顧客の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 = 1 SQL 文**: 複数文にまたがるトランザクションは使わない
//! - **RETURNING で結果を返す**: 更新・削除・挿入は処理後の行をそのまま返す
//! - **「該当なし」の区別**: ID を指定する操作は `Ok(None)` で「見つからない」を表し、
//!   それ以外の失敗（接続エラー、デコード失敗など）は [`InfraError`] で返す
//! - **並び順は保証しない**: 一覧取得に `ORDER BY` は付けない（スキャン順のまま）
//!
//! ## テーブル
//!
//! ```text
//! customers(id BIGSERIAL, name TEXT, phone TEXT, active BOOLEAN, created TIMESTAMPTZ)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use custflow_domain::customer::{Customer, CustomerId, CustomerProfile};
use sqlx::PgPool;

use crate::error::InfraError;

/// 顧客リポジトリトレイト
///
/// 顧客ストアの操作を定義する。各メソッドは SQL 文 1 つに対応する。
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 全顧客を取得する（順序は不定）
    async fn find_all(&self) -> Result<Vec<Customer>, InfraError>;

    /// 有効な顧客のみを取得する（順序は不定）
    async fn find_all_active(&self) -> Result<Vec<Customer>, InfraError>;

    /// ID で顧客を検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(customer))`: 顧客が見つかった場合
    /// - `Ok(None)`: 顧客が見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, InfraError>;

    /// 有効フラグを更新し、更新後の顧客を返す
    ///
    /// 該当する顧客がいない場合は `Ok(None)`。
    async fn update_active(
        &self,
        id: CustomerId,
        active: bool,
    ) -> Result<Option<Customer>, InfraError>;

    /// 顧客を削除し、削除直前の値を返す
    ///
    /// 該当する顧客がいない場合は `Ok(None)`。
    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, InfraError>;

    /// 顧客を新規作成する
    ///
    /// ID・有効フラグ・作成日時はストア側で割り当てる。
    async fn insert(&self, profile: &CustomerProfile) -> Result<Customer, InfraError>;

    /// 顧客の名前と電話番号を更新し、更新後の顧客を返す
    ///
    /// 該当する顧客がいない場合は `Ok(None)`。
    async fn update_profile(
        &self,
        id: CustomerId,
        profile: &CustomerProfile,
    ) -> Result<Option<Customer>, InfraError>;
}

/// `customers` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id:      i64,
    name:    String,
    phone:   String,
    active:  bool,
    created: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::from_db(
            CustomerId::from_i64(row.id),
            row.name,
            row.phone,
            row.active,
            row.created,
        )
    }
}

/// PostgreSQL 実装の CustomerRepository
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Customer>, InfraError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, active, created
            FROM customers
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all_active(&self) -> Result<Vec<Customer>, InfraError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, active, created
            FROM customers
            WHERE active = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, InfraError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, phone, active, created
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, active = active))]
    async fn update_active(
        &self,
        id: CustomerId,
        active: bool,
    ) -> Result<Option<Customer>, InfraError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET active = $2
            WHERE id = $1
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(id.as_i64())
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, InfraError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            DELETE FROM customers
            WHERE id = $1
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, profile: &CustomerProfile) -> Result<Customer, InfraError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, phone)
            VALUES ($1, $2)
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(profile.name())
        .bind(profile.phone())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update_profile(
        &self,
        id: CustomerId,
        profile: &CustomerProfile,
    ) -> Result<Option<Customer>, InfraError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET name = $1, phone = $2
            WHERE id = $3
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(profile.name())
        .bind(profile.phone())
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }
}
