//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! custflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use custflow_domain::customer::{Customer, CustomerId, CustomerProfile, NewCustomer};

use crate::{error::InfraError, repository::CustomerRepository};

// ===== MockCustomerRepository =====

#[derive(Default)]
struct MockState {
    customers: Vec<Customer>,
    last_id:   i64,
}

/// インメモリの顧客ストア
///
/// ID は 1 からの連番で採番し、作成日時は `now` で固定する。
/// 一覧は挿入順で返す。
#[derive(Clone)]
pub struct MockCustomerRepository {
    state: Arc<Mutex<MockState>>,
    now:   DateTime<Utc>,
}

impl Default for MockCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCustomerRepository {
    pub fn new() -> Self {
        Self::with_now(Utc::now())
    }

    /// 作成日時を固定したリポジトリを作成する
    pub fn with_now(now: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            now,
        }
    }

    /// 既存の顧客を登録する（採番カウンタも追従させる）
    pub fn add_customer(&self, customer: Customer) {
        let mut state = self.state.lock().unwrap();
        state.last_id = state.last_id.max(customer.id().as_i64());
        state.customers.push(customer);
    }

    /// 現在保持している顧客のスナップショット
    pub fn customers(&self) -> Vec<Customer> {
        self.state.lock().unwrap().customers.clone()
    }

    /// ID に一致する顧客を置き換え、置き換え後の値を返す
    fn replace(
        &self,
        id: CustomerId,
        f: impl FnOnce(Customer) -> Customer,
    ) -> Option<Customer> {
        let mut state = self.state.lock().unwrap();
        let slot = state.customers.iter_mut().find(|c| c.id() == id)?;
        let updated = f(slot.clone());
        *slot = updated.clone();
        Some(updated)
    }
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, InfraError> {
        Ok(self.customers())
    }

    async fn find_all_active(&self) -> Result<Vec<Customer>, InfraError> {
        Ok(self
            .customers()
            .into_iter()
            .filter(Customer::is_active)
            .collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .customers
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn update_active(
        &self,
        id: CustomerId,
        active: bool,
    ) -> Result<Option<Customer>, InfraError> {
        Ok(self.replace(id, |c| c.with_active(active)))
    }

    async fn delete(&self, id: CustomerId) -> Result<Option<Customer>, InfraError> {
        let mut state = self.state.lock().unwrap();
        let position = state.customers.iter().position(|c| c.id() == id);
        Ok(position.map(|index| state.customers.remove(index)))
    }

    async fn insert(&self, profile: &CustomerProfile) -> Result<Customer, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.last_id += 1;
        let customer = Customer::new(NewCustomer {
            id:      CustomerId::from_i64(state.last_id),
            profile: profile.clone(),
            now:     self.now,
        });
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_profile(
        &self,
        id: CustomerId,
        profile: &CustomerProfile,
    ) -> Result<Option<Customer>, InfraError> {
        Ok(self.replace(id, |c| c.with_profile(profile.clone())))
    }
}
