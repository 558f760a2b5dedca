//! # Mail Service サーバー
//!
//! メール一括配送を担当する API サーバー。
//!
//! ## 役割
//!
//! - **配送実行**: 宛先リストの抽出・検証・レンダリング・送信・集計
//! - **アカウント管理**: サインアップ・サインイン・セッション認証
//! - **テンプレート管理**: 定型文の保存・一覧
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Client     │────▶│ Mail Service │────▶│ SMTP Server  │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             │
//!                 ┌───────────┼───────────┐
//!                 ▼           ▼           ▼
//!           PostgreSQL      Redis     uploads/
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `MAIL_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `MAIL_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `REDIS_URL` | **Yes** | Redis 接続 URL |
//! | `UPLOAD_DIR` | No | 一時ファイル保存先（デフォルト: `uploads`） |
//! | `MAIL_TRANSPORT` | No | `smtp` / `noop`（デフォルト: `smtp`） |
//! | `SMTP_HOST` | No | SMTP ホスト（デフォルト: `localhost`） |
//! | `SMTP_PORT` | No | SMTP ポート（デフォルト: `1025`） |
//! | `MAIL_FROM_ADDRESS` | No | 送信元アドレス |
//!
//! ## 起動方法
//!
//! ```bash
//! MAIL_PORT=13000 DATABASE_URL=postgres://... REDIS_URL=redis://... \
//!     cargo run -p mailflow-mail-service
//! ```

mod config;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use config::{MailConfig, TransportBackend};
use handler::{
    AuthState,
    DispatchState,
    ReadinessState,
    TemplateState,
    create_template,
    execute_dispatch,
    health_check,
    list_templates,
    readiness_check,
    signin,
    signout,
    signup,
};
use mailflow_infra::{
    Argon2PasswordHasher,
    LocalUploadStore,
    MailTransport,
    NoopMailTransport,
    PasswordHasher,
    RedisSessionManager,
    SessionManager,
    SmtpMailTransport,
    UploadStore,
    db,
    repository::{
        AccountRepository,
        DispatchLogRepository,
        PostgresAccountRepository,
        PostgresDispatchLogRepository,
        PostgresTemplateRepository,
        TemplateRepository,
    },
};
use mailflow_mail_service::{handler, middleware, usecase};
use mailflow_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, TracingConfig, make_request_span},
};
use middleware::{SessionState, require_session};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use usecase::{
    AuthUseCaseImpl,
    DispatchUseCaseImpl,
    MessageRenderer,
    TemplateUseCaseImpl,
    TeraMessageRenderer,
};

/// Mail Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("mail-service");
    mailflow_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "mail-service").entered();

    // 設定読み込み
    let config = MailConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "Mail Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの実行に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // Redis セッションストア
    let redis_sessions = Arc::new(
        RedisSessionManager::new(&config.redis_url)
            .await
            .expect("Redis 接続に失敗しました"),
    );
    tracing::info!("Redis に接続しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = ReadinessState {
        pool:  pool.clone(),
        redis: redis_sessions.clone(),
    };

    // 依存コンポーネントを初期化
    let session_manager: Arc<dyn SessionManager> = redis_sessions;
    let account_repo: Arc<dyn AccountRepository> =
        Arc::new(PostgresAccountRepository::new(pool.clone()));
    let template_repo: Arc<dyn TemplateRepository> =
        Arc::new(PostgresTemplateRepository::new(pool.clone()));
    let dispatch_log_repo: Arc<dyn DispatchLogRepository> =
        Arc::new(PostgresDispatchLogRepository::new(pool));

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let upload_store: Arc<dyn UploadStore> = Arc::new(LocalUploadStore::new(&config.upload_dir));
    let renderer: Arc<dyn MessageRenderer> =
        Arc::new(TeraMessageRenderer::new().expect("テンプレートの初期化に失敗しました"));

    // トランスポートの選択（開発では noop で SMTP なし起動も可能）
    let transport: Arc<dyn MailTransport> = match config.transport {
        TransportBackend::Smtp => Arc::new(SmtpMailTransport::new(
            &config.smtp_host,
            config.smtp_port,
            config.from_address.clone(),
        )),
        TransportBackend::Noop => Arc::new(NoopMailTransport),
    };
    tracing::info!(transport = ?config.transport, "メールトランスポートを初期化しました");

    // ユースケース
    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(AuthUseCaseImpl::new(
            account_repo,
            password_hasher,
            session_manager.clone(),
        )),
    });
    let template_state = Arc::new(TemplateState {
        usecase: Arc::new(TemplateUseCaseImpl::new(template_repo)),
    });
    let dispatch_state = Arc::new(DispatchState {
        usecase:      Arc::new(DispatchUseCaseImpl::new(
            renderer,
            transport,
            upload_store.clone(),
            dispatch_log_repo,
        )),
        upload_store,
    });

    let session_state = SessionState { session_manager };

    // 認証が必要な API
    let protected = Router::new()
        .merge(
            Router::new()
                .route("/api/templates", post(create_template).get(list_templates))
                .with_state(template_state),
        )
        .merge(
            Router::new()
                .route("/api/dispatch", post(execute_dispatch))
                .with_state(dispatch_state),
        )
        .layer(from_fn_with_state(session_state, require_session));

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/api/auth/signup", post(signup))
                .route("/api/auth/signin", post(signin))
                .route("/api/auth/signout", post(signout))
                .with_state(auth_state),
        )
        .merge(protected)
        .layer(CanonicalLogLineLayer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Mail Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
