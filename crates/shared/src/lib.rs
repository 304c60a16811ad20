//! # Custflow 共有ユーティリティ
//!
//! 顧客サービスと各クレートで共通利用するユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - トレーシング関連は `observability` feature の背後に置き、
//!   レスポンス型だけを使うクレートに subscriber 等の依存を持ち込まない

pub mod health;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
