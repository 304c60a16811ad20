//! # Customer Service サーバー
//!
//! PostgreSQL の `customers` テーブルに対する CRUD を HTTP で公開するサービス。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CUSTOMER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CUSTOMER_PORT` | No | ポート番号（デフォルト: `9999`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,custflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env を読み込む）
//! cargo run -p custflow-customer-service
//!
//! # 本番環境
//! DATABASE_URL=postgres://... LOG_FORMAT=json cargo run -p custflow-customer-service --release
//! ```
//!
//! テーブルは事前に `migrations/` の DDL で作成しておくこと（起動時には適用しない）。

use std::sync::Arc;

use anyhow::Context as _;
use custflow_customer_service::{
    app::build_app,
    config::CustomerConfig,
    handler::{CustomerState, ReadinessState},
    usecase::CustomerUseCaseImpl,
};
use custflow_infra::{
    db,
    repository::{CustomerRepository, PostgresCustomerRepository},
};
use custflow_shared::observability::{TracingConfig, init_tracing};
use tokio::{net::TcpListener, signal};

/// Customer Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("customer-service");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "customer-service").entered();

    // 設定読み込み
    let config = CustomerConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Customer Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    // 依存コンポーネントを初期化
    let customer_repo: Arc<dyn CustomerRepository> =
        Arc::new(PostgresCustomerRepository::new(pool.clone()));
    let customer_state = Arc::new(CustomerState {
        usecase: CustomerUseCaseImpl::new(customer_repo),
    });

    let app = build_app(customer_state, readiness_state);

    // サーバー起動
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("{}:{} にバインドできません", config.host, config.port))?;
    tracing::info!(
        "Customer Service サーバーが起動しました: {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Customer Service サーバーを停止しました");

    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラを登録できません");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラを登録できません");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C を受信しました。シャットダウンします"),
        () = terminate => tracing::info!("SIGTERM を受信しました。シャットダウンします"),
    }
}
