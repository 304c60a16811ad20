use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use custflow_domain::customer::CustomerProfile;
use custflow_infra::{InfraError, mock::MockCustomerRepository, repository::CustomerRepository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tower::ServiceExt;

use super::*;
use crate::app::customer_routes;

// テスト用のスタブ実装

/// すべての操作がデータベースエラーになるリポジトリ
struct FailingCustomerRepository;

fn db_down() -> InfraError {
    sqlx::Error::PoolTimedOut.into()
}

#[async_trait]
impl CustomerRepository for FailingCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, InfraError> {
        Err(db_down())
    }

    async fn find_all_active(&self) -> Result<Vec<Customer>, InfraError> {
        Err(db_down())
    }

    async fn find_by_id(&self, _id: CustomerId) -> Result<Option<Customer>, InfraError> {
        Err(db_down())
    }

    async fn update_active(
        &self,
        _id: CustomerId,
        _active: bool,
    ) -> Result<Option<Customer>, InfraError> {
        Err(db_down())
    }

    async fn delete(&self, _id: CustomerId) -> Result<Option<Customer>, InfraError> {
        Err(db_down())
    }

    async fn insert(&self, _profile: &CustomerProfile) -> Result<Customer, InfraError> {
        Err(db_down())
    }

    async fn update_profile(
        &self,
        _id: CustomerId,
        _profile: &CustomerProfile,
    ) -> Result<Option<Customer>, InfraError> {
        Err(db_down())
    }
}

// ヘルパー

fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn create_test_app(repo: Arc<dyn CustomerRepository>) -> Router {
    let state = Arc::new(CustomerState {
        usecase: CustomerUseCaseImpl::new(repo),
    });
    customer_routes(state)
}

/// Alice（有効）と Bob（ブロック中）を登録済みのリポジトリ
async fn seeded_repo() -> MockCustomerRepository {
    let repo = MockCustomerRepository::with_now(test_now());
    repo.insert(&CustomerProfile::new("Alice", "123").unwrap())
        .await
        .unwrap();
    let bob = repo
        .insert(&CustomerProfile::new("Bob", "456").unwrap())
        .await
        .unwrap();
    repo.update_active(bob.id(), false).await.unwrap();
    repo
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// 一覧取得

#[tokio::test]
async fn test_get_allは全顧客を返す() {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get("/customers.getAll")).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_get_all_activeはブロック中の顧客を含まない() {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get("/customers.getAllActive")).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let customers = json.as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["name"], "Alice");
    assert!(customers.iter().all(|c| c["active"] == true));
}

#[tokio::test]
async fn test_顧客がいない場合get_allは空配列を返す() {
    // Given
    let sut = create_test_app(Arc::new(MockCustomerRepository::new()));

    // When
    let response = sut.oneshot(get("/customers.getAll")).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

// ID 指定の取得

#[tokio::test]
async fn test_get_by_idは顧客のjsonを返す() {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get("/customers.getById?id=1")).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "id": 1,
            "name": "Alice",
            "phone": "123",
            "active": true,
            "created": "2023-11-14T22:13:20Z"
        })
    );
}

#[rstest]
#[case("/customers.getById?id=99")]
#[case("/customers.blockById?id=99")]
#[case("/customers.unblockById?id=99")]
#[case("/customers.removeById?id=99")]
#[case("/customers.getById?id=0")]
#[case("/customers.getById?id=-5")]
#[tokio::test]
async fn test_存在しないidは404を返す(#[case] uri: &str) {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get(uri)).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not Found");
}

#[rstest]
#[case("/customers.getById")]
#[case("/customers.getById?id=")]
#[case("/customers.getById?id=abc")]
#[case("/customers.getById?id=1.5")]
#[case("/customers.blockById?id=x")]
#[case("/customers.unblockById")]
#[case("/customers.removeById?id=99999999999999999999")]
#[tokio::test]
async fn test_idが整数でない場合は400を返す(#[case] uri: &str) {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get(uri)).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Bad Request");
}

#[rstest]
#[case::重複の先頭が有効("/customers.getById?id=1&id=2", 1)]
#[case::重複の後続が不正("/customers.getById?id=2&id=abc", 2)]
#[case::他のキーと混在("/customers.blockById?x=9&id=1&id=2", 1)]
#[tokio::test]
async fn test_idが繰り返された場合は最初の値を使う(#[case] uri: &str, #[case] expected_id: i64) {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));

    // When
    let response = sut.oneshot(get(uri)).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], expected_id);
}

#[tokio::test]
async fn test_保存でもキーが繰り返された場合は最初の値を使う() {
    // Given
    let sut = create_test_app(Arc::new(MockCustomerRepository::new()));

    // When
    let response = sut
        .oneshot(post_form(
            "/customers.save?id=0&id=7",
            "name=First&name=Second&phone=1&phone=2",
        ))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "First");
    assert_eq!(json["phone"], "1");
}

#[rstest]
#[case(Method::GET)]
#[case(Method::POST)]
#[case(Method::DELETE)]
#[tokio::test]
async fn test_httpメソッドを区別しない(#[case] method: Method) {
    // Given
    let sut = create_test_app(Arc::new(seeded_repo().await));
    let request = Request::builder()
        .method(method)
        .uri("/customers.getById?id=1")
        .body(Body::empty())
        .unwrap();

    // When
    let response = sut.oneshot(request).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
}

// ブロック / 解除 / 削除

#[tokio::test]
async fn test_ブロックと解除で有効フラグのみが切り替わる() {
    // Given
    let repo = seeded_repo().await;
    let before = repo.customers()[0].clone();
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let blocked = sut
        .clone()
        .oneshot(get("/customers.blockById?id=1"))
        .await
        .unwrap();
    let unblocked = sut
        .oneshot(get("/customers.unblockById?id=1"))
        .await
        .unwrap();

    // Then
    assert_eq!(blocked.status(), StatusCode::OK);
    assert_eq!(body_json(blocked).await["active"], false);
    assert_eq!(unblocked.status(), StatusCode::OK);
    assert_eq!(body_json(unblocked).await["active"], true);
    assert_eq!(repo.customers()[0], before);
}

#[tokio::test]
async fn test_remove_by_idは削除直前の値を返す() {
    // Given
    let repo = seeded_repo().await;
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let response = sut
        .oneshot(get("/customers.removeById?id=2"))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Bob");
    assert_eq!(json["active"], false);
    assert_eq!(repo.customers().len(), 1);
}

// 保存

#[tokio::test]
async fn test_id0のフォーム送信で顧客が新規作成される() {
    // Given
    let repo = MockCustomerRepository::with_now(test_now());
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let response = sut
        .oneshot(post_form("/customers.save?id=0", "name=Alice&phone=123"))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["id"].as_i64().unwrap() > 0);
    assert_eq!(json["name"], "Alice");
    assert_eq!(json["phone"], "123");
    assert_eq!(json["active"], true);
    assert_eq!(repo.customers().len(), 1);
}

#[tokio::test]
async fn test_クエリ文字列のみでも保存できる() {
    // Given
    let sut = create_test_app(Arc::new(MockCustomerRepository::new()));

    // When
    let response = sut
        .oneshot(get("/customers.save?id=0&phone=555"))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "");
    assert_eq!(json["phone"], "555");
}

#[tokio::test]
async fn test_既存idの保存はidと作成日時を維持して更新する() {
    // Given
    let repo = seeded_repo().await;
    let before = repo.customers()[1].clone();
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let response = sut
        .oneshot(post_form("/customers.save", "id=2&name=Carol&phone=789"))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Carol");
    assert_eq!(json["phone"], "789");
    assert_eq!(json["active"], false);
    let after = repo.customers()[1].clone();
    assert_eq!(after.created(), before.created());
}

#[tokio::test]
async fn test_ボディの値がクエリ文字列より優先される() {
    // Given
    let sut = create_test_app(Arc::new(MockCustomerRepository::new()));

    // When
    let response = sut
        .oneshot(post_form(
            "/customers.save?id=0&name=Query&phone=111",
            "name=Body",
        ))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Body");
    assert_eq!(json["phone"], "111");
}

#[tokio::test]
async fn test_存在しないidの保存は500を返す() {
    // Given
    let repo = MockCustomerRepository::new();
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let response = sut
        .oneshot(post_form("/customers.save", "id=42&name=Alice"))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");
    assert!(repo.customers().is_empty());
}

#[rstest]
#[case::名前と電話番号が両方空("id=0&name=&phone=")]
#[case::名前と電話番号が未指定("id=0")]
#[case::id未指定("name=Alice&phone=123")]
#[case::idが整数でない("id=new&name=Alice")]
#[tokio::test]
async fn test_不正な保存リクエストは400を返す(#[case] body: &str) {
    // Given
    let repo = MockCustomerRepository::new();
    let sut = create_test_app(Arc::new(repo.clone()));

    // When
    let response = sut
        .oneshot(post_form("/customers.save", body))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.customers().is_empty());
}

// データベースエラー

#[rstest]
#[case("/customers.getAll")]
#[case("/customers.getAllActive")]
#[case("/customers.getById?id=1")]
#[case("/customers.blockById?id=1")]
#[case("/customers.unblockById?id=1")]
#[case("/customers.removeById?id=1")]
#[case("/customers.save?id=0&name=Alice")]
#[tokio::test]
async fn test_データベースエラーは500を返し詳細を含まない(#[case] uri: &str) {
    // Given
    let sut = create_test_app(Arc::new(FailingCustomerRepository));

    // When
    let response = sut.oneshot(get(uri)).await.unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");
}

// 入力の解釈

#[rstest]
#[case(Some("42"), Some(42))]
#[case(Some("-7"), Some(-7))]
#[case(Some("+3"), Some(3))]
#[case(Some(" 1"), None)]
#[case(Some(""), None)]
#[case(None, None)]
fn test_parse_idは10進整数のみ受け付ける(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
    assert_eq!(parse_id(raw).ok(), expected);
}

#[test]
fn test_saveパラメータはキーごとに最初の値を採用する() {
    let pairs = vec![
        ("name".to_string(), "Alice".to_string()),
        ("id".to_string(), "3".to_string()),
        ("name".to_string(), "Bob".to_string()),
    ];

    let params = SaveParams::from_pairs(&pairs);

    assert_eq!(params.id.as_deref(), Some("3"));
    assert_eq!(params.name.as_deref(), Some("Alice"));
    assert_eq!(params.phone, None);
}

#[test]
fn test_saveパラメータの結合はボディにあるキーを優先する() {
    let query = SaveParams {
        id:    Some("0".to_string()),
        name:  Some("Query".to_string()),
        phone: Some("111".to_string()),
    };
    let body = SaveParams {
        id:    None,
        name:  Some(String::new()),
        phone: None,
    };

    let merged = query.merge(body);

    assert_eq!(merged.id.as_deref(), Some("0"));
    assert_eq!(merged.name.as_deref(), Some(""));
    assert_eq!(merged.phone.as_deref(), Some("111"));
}
