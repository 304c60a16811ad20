//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//!
//! 「見つからない」状態はエラーではなく、リポジトリが `Option` で表現する。
//! HTTP への変換はサービス層の責務。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    /// 例: 顧客名と電話番号の両方が空
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
