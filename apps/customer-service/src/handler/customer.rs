//! # 顧客ハンドラ
//!
//! 顧客の参照・保存・ブロック・削除を行うエンドポイント。
//!
//! ## エンドポイント
//!
//! - `/customers.getAll` - 全顧客
//! - `/customers.getAllActive` - 有効な顧客のみ
//! - `/customers.getById?id=` - 顧客 1 件
//! - `/customers.blockById?id=` - ブロック（`active = false`）
//! - `/customers.unblockById?id=` - ブロック解除（`active = true`）
//! - `/customers.removeById?id=` - 削除（削除直前の値を返す）
//! - `/customers.save` - `id`, `name`, `phone` で新規作成（`id=0`）または更新
//!
//! HTTP メソッドは区別しない。入力はクエリ文字列、`/customers.save` のみ
//! `application/x-www-form-urlencoded` ボディも受け付ける（同名のキーはボディ優先）。
//! 同じキーが繰り返された場合は最初の値を使う。
//!
//! ## ステータスコード
//!
//! - `400 Bad Request`: `id` が未指定・整数でない、または名前と電話番号が両方空
//! - `404 Not Found`: 指定 `id` の顧客がいない（`/customers.save` を除く）
//! - `500 Internal Server Error`: データベースエラー、または保存の更新対象がいない

use std::sync::Arc;

use axum::{
    Form,
    Json,
    extract::{FromRequest, Query, Request, State, rejection::QueryRejection},
    http::{Method, header},
};
use chrono::{DateTime, Utc};
use custflow_domain::customer::{Customer, CustomerId, CustomerProfile, SaveCustomer};
use serde::Serialize;

use crate::{error::CoreError, usecase::CustomerUseCaseImpl};

/// 顧客 API の共有状態
pub struct CustomerState {
    pub usecase: CustomerUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// クエリ文字列・フォームボディのキーと値の組（出現順）
///
/// 同じキーが複数回現れても拒否せず、最初の値を採用する。
pub type FormPairs = Vec<(String, String)>;

/// キーに対応する最初の値を取り出す
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// 保存リクエストのパラメータ
///
/// クエリ文字列とフォームボディの両方から読み取る。
#[derive(Debug, Default)]
pub struct SaveParams {
    pub id:    Option<String>,
    pub name:  Option<String>,
    pub phone: Option<String>,
}

impl SaveParams {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let get = |key: &str| first_value(pairs, key).map(str::to_string);
        Self {
            id:    get("id"),
            name:  get("name"),
            phone: get("phone"),
        }
    }

    /// クエリ由来の値にボディ由来の値を重ねる（ボディにあるキーが優先）
    fn merge(self, body: SaveParams) -> Self {
        Self {
            id:    body.id.or(self.id),
            name:  body.name.or(self.name),
            phone: body.phone.or(self.phone),
        }
    }
}

/// 顧客 DTO
#[derive(Debug, Serialize)]
pub struct CustomerDto {
    pub id:      i64,
    pub name:    String,
    pub phone:   String,
    pub active:  bool,
    pub created: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            id:      customer.id().as_i64(),
            name:    customer.name().to_string(),
            phone:   customer.phone().to_string(),
            active:  customer.is_active(),
            created: customer.created(),
        }
    }
}

fn to_dtos(customers: Vec<Customer>) -> Vec<CustomerDto> {
    customers.into_iter().map(CustomerDto::from).collect()
}

// --- 入力の解釈 ---

/// `id` パラメータを整数として解釈する
fn parse_id(raw: Option<&str>) -> Result<i64, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::BadRequest("id が指定されていません".to_string()))?;
    raw.parse()
        .map_err(|_| CoreError::BadRequest(format!("id が整数ではありません: {raw:?}")))
}

/// クエリ文字列から顧客 ID を取り出す
fn customer_id(query: Result<Query<FormPairs>, QueryRejection>) -> Result<CustomerId, CoreError> {
    let Query(pairs) = query.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    parse_id(first_value(&pairs, "id")).map(CustomerId::from_i64)
}

/// ボディをフォームとして読むべきリクエストかどうか
fn has_form_body(request: &Request) -> bool {
    let method = request.method();
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

    is_form && (method == Method::POST || method == Method::PUT || method == Method::PATCH)
}

/// フォームボディを読み取る（フォームでない場合は空）
async fn read_form_body(request: Request) -> Result<SaveParams, CoreError> {
    if !has_form_body(&request) {
        return Ok(SaveParams::default());
    }

    let Form(pairs) = Form::<FormPairs>::from_request(request, &())
        .await
        .map_err(|e| CoreError::BadRequest(e.body_text()))?;
    Ok(SaveParams::from_pairs(&pairs))
}

// --- ハンドラ ---

/// `/customers.getAll`
///
/// 全顧客を取得する。並び順は保証しない。
pub async fn list_customers(
    State(state): State<Arc<CustomerState>>,
) -> Result<Json<Vec<CustomerDto>>, CoreError> {
    let customers = state.usecase.list_customers().await?;
    Ok(Json(to_dtos(customers)))
}

/// `/customers.getAllActive`
pub async fn list_active_customers(
    State(state): State<Arc<CustomerState>>,
) -> Result<Json<Vec<CustomerDto>>, CoreError> {
    let customers = state.usecase.list_active_customers().await?;
    Ok(Json(to_dtos(customers)))
}

/// `/customers.getById`
#[tracing::instrument(skip_all)]
pub async fn get_customer(
    State(state): State<Arc<CustomerState>>,
    query: Result<Query<FormPairs>, QueryRejection>,
) -> Result<Json<CustomerDto>, CoreError> {
    let id = customer_id(query)?;
    let customer = state.usecase.get_customer(id).await?;
    Ok(Json(customer.into()))
}

/// `/customers.blockById`
#[tracing::instrument(skip_all)]
pub async fn block_customer(
    State(state): State<Arc<CustomerState>>,
    query: Result<Query<FormPairs>, QueryRejection>,
) -> Result<Json<CustomerDto>, CoreError> {
    let id = customer_id(query)?;
    let customer = state.usecase.block_customer(id).await?;
    Ok(Json(customer.into()))
}

/// `/customers.unblockById`
#[tracing::instrument(skip_all)]
pub async fn unblock_customer(
    State(state): State<Arc<CustomerState>>,
    query: Result<Query<FormPairs>, QueryRejection>,
) -> Result<Json<CustomerDto>, CoreError> {
    let id = customer_id(query)?;
    let customer = state.usecase.unblock_customer(id).await?;
    Ok(Json(customer.into()))
}

/// `/customers.removeById`
///
/// 削除した顧客の削除直前の値を返す。
#[tracing::instrument(skip_all)]
pub async fn remove_customer(
    State(state): State<Arc<CustomerState>>,
    query: Result<Query<FormPairs>, QueryRejection>,
) -> Result<Json<CustomerDto>, CoreError> {
    let id = customer_id(query)?;
    let customer = state.usecase.remove_customer(id).await?;
    Ok(Json(customer.into()))
}

/// `/customers.save`
///
/// `id = 0` なら新規作成、それ以外は既存顧客の名前と電話番号を更新する。
/// `name` / `phone` の未指定は空文字列として扱う。
#[tracing::instrument(skip_all)]
pub async fn save_customer(
    State(state): State<Arc<CustomerState>>,
    query: Result<Query<FormPairs>, QueryRejection>,
    request: Request,
) -> Result<Json<CustomerDto>, CoreError> {
    let Query(pairs) = query.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let params = SaveParams::from_pairs(&pairs).merge(read_form_body(request).await?);

    let id = parse_id(params.id.as_deref())?;
    let profile = CustomerProfile::new(
        params.name.unwrap_or_default(),
        params.phone.unwrap_or_default(),
    )?;

    let customer = state
        .usecase
        .save_customer(SaveCustomer::new(id, profile))
        .await?;
    Ok(Json(customer.into()))
}

#[cfg(test)]
mod tests;
