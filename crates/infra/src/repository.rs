//! # リポジトリ実装
//!
//! 顧客ストアのトレイトと PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケース層は `Arc<dyn CustomerRepository>` にのみ依存する
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod customer_repository;

pub use customer_repository::{CustomerRepository, PostgresCustomerRepository};
