//! # Relay Service サーバー
//!
//! ドキュメントストアに投入されたメール送信依頼を、メールとして中継するサービス。
//!
//! ## 役割
//!
//! - **イベント受信**: イベント配信基盤から CloudEvent（ドキュメント作成）を HTTP で受け取る
//! - **メール送信**: ドキュメントの宛先・件名・本文を固定の送信元から 1 通送信する
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Upstream   │────▶│  Document    │────▶│Relay Service │────▶│ Mail (SMTP / │
//! │   Process    │     │  Store       │     │  port: 8080  │     │ SES)         │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//!                        mail/{docId}          POST /
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `RELAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `MAIL_FROM` | **Yes** | 送信元（`Name <addr@example.com>` 形式可） |
//! | `MAIL_COLLECTION` | No | 監視するコレクション（デフォルト: `mail`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` | No | SMTP ホスト（デフォルト: `smtp.gmail.com`） |
//! | `SMTP_PORT` | No | SMTP ポート（デフォルト: `465`） |
//! | `SMTP_TLS` | No | `none` / `starttls` / `tls`（デフォルト: `tls`） |
//! | `SMTP_USERNAME` | No | SMTP 認証ユーザー（`SMTP_PASSWORD` と組で指定） |
//! | `SMTP_PASSWORD` | No | SMTP 認証パスワード（アプリパスワード等） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## イベントデータの形式
//!
//! イベントデータは JSON のみ受け付ける。`application/protobuf` で配信されたイベントは
//! ERROR ログを出して破棄されるため、トリガーは JSON 形式で作成すること:
//!
//! ```bash
//! gcloud eventarc triggers create mail-relay \
//!   --event-filters=type=google.cloud.firestore.document.v1.created \
//!   --event-filters=database='(default)' \
//!   --event-filters-path-pattern=document='mail/{docId}' \
//!   --event-data-content-type=application/json \
//!   --destination-run-service=mailrelay-service
//! ```
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用、Mailpit に送信）
//! cargo run -p mailrelay-service
//!
//! # 本番環境（認証情報はシークレットストアから環境変数として注入する）
//! MAIL_FROM="Spacia <noreply@example.com>" NOTIFICATION_BACKEND=smtp \
//!   cargo run -p mailrelay-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use mailrelay_service::{
    app_builder::{build_app, build_sender},
    config::RelayConfig,
    trigger::TriggerRegistry,
    usecase::MailRelay,
};
use mailrelay_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Relay Service サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（`.env` があれば併用）
/// 2. トレーシングの初期化
/// 3. 設定の読み込みと送信実装の作成
/// 4. トリガー登録とルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("relay-service");
    let service = tracing_config.service_name.clone();
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", %service).entered();

    // 設定読み込み
    let config = RelayConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Relay Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存関係の初期化
    let sender = build_sender(&config.mail.backend)
        .await
        .context("メール送信実装の初期化に失敗しました")?;
    let relay = Arc::new(MailRelay::new(sender, config.mail.from_address.clone()));

    let mut registry = TriggerRegistry::new();
    registry.register(config.mail.trigger_pattern.clone(), relay);

    let app = build_app(Arc::new(registry));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Relay Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
