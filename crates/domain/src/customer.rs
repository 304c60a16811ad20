//! # 顧客
//!
//! サービスが扱う唯一のエンティティである顧客（連絡先と有効フラグを持つ人物）のモデル。
//!
//! ## ライフサイクル
//!
//! ```text
//! insert ──→ Customer(active = true) ──→ block / unblock（active の切り替え）
//!                  │                  ──→ save（name / phone の更新）
//!                  └──→ delete
//! ```
//!
//! 識別子と作成日時はストア（DB）が採番・記録し、以後変更されない。
//!
//! ## 保存コマンド
//!
//! 保存リクエストの識別子が `0` なら新規作成、それ以外なら既存顧客の更新を表す。
//! この分岐は [`SaveCustomer::new`] に集約している。

use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::DomainError;

// =========================================================================
// CustomerId（顧客 ID）
// =========================================================================

/// 顧客の一意識別子
///
/// DB の `BIGSERIAL` が採番する 64 ビット整数をラップした Newtype。
/// 永続化済みの顧客の ID は 0 以外であることが保証される。
///
/// 検索系の操作では任意の値を受け付ける（該当行がなければ「見つからない」）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct CustomerId(i64);

impl CustomerId {
    /// 整数値から顧客 ID を作成する
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 内部の整数値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

// =========================================================================
// CustomerProfile（連絡先情報）
// =========================================================================

/// 顧客の連絡先情報（値オブジェクト）
///
/// 保存操作で書き換え可能なフィールドの組。
///
/// # 不変条件
///
/// - 名前と電話番号の少なくとも一方は空文字列ではない
///
/// 値のトリミングや形式チェックは行わない（存在チェックのみ）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    name:  String,
    phone: String,
}

impl CustomerProfile {
    /// 連絡先情報を作成する
    ///
    /// # エラー
    ///
    /// 名前と電話番号の両方が空の場合は `DomainError::Validation` を返す。
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let phone = phone.into();

        if name.is_empty() && phone.is_empty() {
            return Err(DomainError::Validation(
                "名前と電話番号のどちらかは必須です".to_string(),
            ));
        }

        Ok(Self { name, phone })
    }

    /// 顧客名を取得する
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 電話番号を取得する
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

// =========================================================================
// SaveCustomer（保存コマンド）
// =========================================================================

/// 顧客の保存コマンド
///
/// 保存リクエストを「新規作成」か「既存顧客の更新」のどちらかに解釈した結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCustomer {
    /// 新規作成（識別子と作成日時はストアが割り当てる）
    Create(CustomerProfile),
    /// 既存顧客の連絡先を更新する
    Update {
        id:      CustomerId,
        profile: CustomerProfile,
    },
}

impl SaveCustomer {
    /// リクエストの識別子から保存コマンドを組み立てる
    ///
    /// `0` は新規作成、それ以外は更新として扱う。
    pub fn new(id: i64, profile: CustomerProfile) -> Self {
        if id == 0 {
            Self::Create(profile)
        } else {
            Self::Update {
                id: CustomerId::from_i64(id),
                profile,
            }
        }
    }
}

// =========================================================================
// Customer（顧客エンティティ）
// =========================================================================

/// 新規顧客の生成パラメータ
///
/// ストアが採番した ID と記録時刻を受け取って [`Customer::new`] に渡す。
pub struct NewCustomer {
    pub id:      CustomerId,
    pub profile: CustomerProfile,
    pub now:     DateTime<Utc>,
}

/// 顧客エンティティ
///
/// # 不変条件
///
/// - `id` と `created` は作成後に変更されない
/// - 作成直後は `active = true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id:      CustomerId,
    name:    String,
    phone:   String,
    active:  bool,
    created: DateTime<Utc>,
}

impl Customer {
    /// 新しい顧客を作成する（有効状態で開始）
    pub fn new(params: NewCustomer) -> Self {
        Self {
            id:      params.id,
            name:    params.profile.name,
            phone:   params.profile.phone,
            active:  true,
            created: params.now,
        }
    }

    /// データベースから顧客を復元する
    ///
    /// 保存済みの行は不変条件を満たしている前提のため、検証は行わない。
    pub fn from_db(
        id: CustomerId,
        name: String,
        phone: String,
        active: bool,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            active,
            created,
        }
    }

    /// 連絡先を差し替えた顧客を返す（ID・有効フラグ・作成日時は維持）
    pub fn with_profile(self, profile: CustomerProfile) -> Self {
        Self {
            name: profile.name,
            phone: profile.phone,
            ..self
        }
    }

    /// 有効フラグを差し替えた顧客を返す（他のフィールドは維持）
    pub fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// 有効（ブロックされていない）かどうか
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
