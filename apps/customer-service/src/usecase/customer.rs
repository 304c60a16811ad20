//! # 顧客ユースケース
//!
//! リポジトリの `Option` 結果を [`CoreError::NotFound`] に変換し、
//! 保存コマンドを新規作成 / 更新に振り分ける。
//!
//! 保存だけは例外で、更新対象の行が無い場合も「見つからない」ではなく
//! 内部エラー（500）として扱う。
//!
//! 各操作はリポジトリ呼び出し 1 回で完結する。

use std::sync::Arc;

use custflow_domain::customer::{Customer, CustomerId, SaveCustomer};
use custflow_infra::repository::CustomerRepository;

use crate::error::CoreError;

/// 顧客ユースケースの実装
pub struct CustomerUseCaseImpl {
    customer_repo: Arc<dyn CustomerRepository>,
}

impl CustomerUseCaseImpl {
    pub fn new(customer_repo: Arc<dyn CustomerRepository>) -> Self {
        Self { customer_repo }
    }

    /// 全顧客を取得する
    pub async fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        Ok(self.customer_repo.find_all().await?)
    }

    /// 有効な顧客のみを取得する
    pub async fn list_active_customers(&self) -> Result<Vec<Customer>, CoreError> {
        Ok(self.customer_repo.find_all_active().await?)
    }

    /// 顧客を取得する
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        self.customer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// 顧客をブロックする（`active = false`）
    pub async fn block_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        self.set_active(id, false).await
    }

    /// 顧客のブロックを解除する（`active = true`）
    pub async fn unblock_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        self.set_active(id, true).await
    }

    /// 顧客を削除し、削除直前の値を返す
    pub async fn remove_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        self.customer_repo
            .delete(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// 顧客を保存する
    ///
    /// [`SaveCustomer::Create`] は新規作成、[`SaveCustomer::Update`] は既存顧客の
    /// 名前と電話番号の更新。更新対象が存在しない場合は `Internal`。
    pub async fn save_customer(&self, command: SaveCustomer) -> Result<Customer, CoreError> {
        match command {
            SaveCustomer::Create(profile) => Ok(self.customer_repo.insert(&profile).await?),
            SaveCustomer::Update { id, profile } => self
                .customer_repo
                .update_profile(id, &profile)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!("更新対象の顧客が存在しません: id={id}"))
                }),
        }
    }

    async fn set_active(&self, id: CustomerId, active: bool) -> Result<Customer, CoreError> {
        self.customer_repo
            .update_active(id, active)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: CustomerId) -> CoreError {
    CoreError::NotFound(format!("顧客が見つかりません: id={id}"))
}
