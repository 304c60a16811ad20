//! # Customer Service 設定
//!
//! 環境変数から Customer Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// バインドアドレスの既定値
const DEFAULT_HOST: &str = "0.0.0.0";

/// ポート番号の既定値
const DEFAULT_PORT: u16 = 9999;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// ポート番号として解釈できない
    #[error("{name} は有効なポート番号である必要があります: {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

/// Customer Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// データベース接続 URL
    pub database_url: String,
}

impl CustomerConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("CUSTOMER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("CUSTOMER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: "CUSTOMER_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host,
            port,
            database_url,
        })
    }
}
