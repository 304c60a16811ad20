//! # Customer Service ライブラリ
//!
//! 顧客 CRUD サービスのユースケース・ハンドラ・ルーター構築を公開する。
//! バイナリ（`main.rs`）は設定読み込みとサーバー起動のみを担当する。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
