//! # Relay Service アプリケーション構築
//!
//! 送信実装の選択（DI）とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mailrelay_infra::{
    InfraError,
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SesNotificationSender,
        SmtpNotificationSender,
    },
};
use mailrelay_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::NotificationBackend,
    handler::{IngestState, health_check, receive_event},
    trigger::TriggerRegistry,
};

/// 設定に応じたメール送信実装を作成する
pub async fn build_sender(
    backend: &NotificationBackend,
) -> Result<Arc<dyn NotificationSender>, InfraError> {
    tracing::info!(backend = backend.name(), "メール送信実装を初期化します");

    let sender: Arc<dyn NotificationSender> = match backend {
        NotificationBackend::Smtp(settings) => {
            tracing::info!(
                host = %settings.host,
                port = settings.port,
                security = %settings.security,
                "SMTP 送信を使用します"
            );
            Arc::new(SmtpNotificationSender::new(settings)?)
        }
        NotificationBackend::Ses => {
            tracing::info!("SES 送信を使用します");
            Arc::new(SesNotificationSender::from_env().await)
        }
        NotificationBackend::Noop => {
            tracing::warn!("Noop 送信を使用します（メールは送信されません）");
            Arc::new(NoopNotificationSender)
        }
    };

    Ok(sender)
}

/// ルーター定義を行う
///
/// トリガー登録済みの登録表を受け取り、State → Router の順に組み立てる。
pub fn build_app(registry: Arc<TriggerRegistry>) -> Router {
    let ingest_state = Arc::new(IngestState { registry });

    Router::new()
        .route("/health", get(health_check))
        .route("/", post(receive_event))
        .with_state(ingest_state)
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id と CloudEvent の event_id を含める
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mailrelay_infra::notification::{SmtpSecurity, SmtpSettings};
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    /// `backend` フィールドの値を記録する Layer
    #[derive(Clone, Default)]
    struct BackendField(Arc<Mutex<Vec<String>>>);

    impl tracing::field::Visit for BackendField {
        fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn std::fmt::Debug) {}

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "backend" {
                self.0.lock().unwrap().push(value.to_string());
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for BackendField {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            event.record(&mut self.clone());
        }
    }

    #[rstest::rstest]
    #[case::noop(NotificationBackend::Noop, "noop")]
    #[case::smtp(
        NotificationBackend::Smtp(SmtpSettings {
            host:        "localhost".to_string(),
            port:        1025,
            security:    SmtpSecurity::None,
            credentials: None,
        }),
        "smtp"
    )]
    #[tokio::test]
    async fn test_選択したバックエンド名をログに出して送信実装を作成する(
        #[case] backend: NotificationBackend,
        #[case] expected: &str,
    ) {
        let layer = BackendField::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(layer.clone()));

        let result = build_sender(&backend).await;

        assert!(result.is_ok());
        assert_eq!(*layer.0.lock().unwrap(), vec![expected.to_string()]);
    }
}
