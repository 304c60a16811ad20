//! # ユースケース層
//!
//! Customer Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは入力の解釈とレスポンス変換のみを行い、
//!   「見つからない」の判定や保存コマンドの振り分けはユースケースに集約

pub mod customer;

pub use customer::CustomerUseCaseImpl;
