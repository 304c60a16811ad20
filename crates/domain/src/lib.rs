//! # Custflow ドメイン層
//!
//! 顧客管理サービスの中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つ顧客（[`customer::Customer`]）
//! - **値オブジェクト**: 識別子や連絡先などの不変値
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! customer-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use custflow_domain::customer::{CustomerProfile, SaveCustomer};
//!
//! let profile = CustomerProfile::new("Alice", "123").unwrap();
//!
//! // 識別子 0 は新規作成を意味する
//! let command = SaveCustomer::new(0, profile);
//! assert!(matches!(command, SaveCustomer::Create(_)));
//! ```

pub mod customer;
pub mod error;

pub use error::DomainError;
