//! # CloudEvent 受信ハンドラ
//!
//! イベント配信基盤から HTTP で届くドキュメントイベントを受け取り、
//! トリガー登録表へディスパッチする。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /
//! ```
//!
//! binary モード（`ce-*` ヘッダー + JSON ボディ）と structured モード
//! （`Content-Type: application/cloudevents+json`）の両方を受け付ける。
//!
//! ## 応答
//!
//! 処理結果に関わらず常に `204 No Content` を返す。配信基盤による再配信は行わせない
//! （送信失敗・形式不正はログにのみ残る）。

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use mailrelay_domain::document::DocumentEventKind;
use mailrelay_infra::event_source::CloudEvent;
use mailrelay_shared::event_log::error;

use crate::trigger::TriggerRegistry;

/// イベント受信ハンドラの State
pub struct IngestState {
    pub registry: Arc<TriggerRegistry>,
}

/// CloudEvent を受信する
pub async fn receive_event(
    State(state): State<Arc<IngestState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let event = match CloudEvent::from_http(&headers, &body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(
                error.category = error::category::INPUT,
                error.kind = error::kind::INVALID_EVENT,
                error = %e,
                "CloudEvent の読み取りに失敗したためイベントを破棄します"
            );
            return StatusCode::NO_CONTENT;
        }
    };

    match event.document_event_kind() {
        Some(DocumentEventKind::Created) => {}
        kind => {
            tracing::debug!(
                event_type = %event.event_type,
                kind = kind.map_or("unknown", <&'static str>::from),
                "ドキュメント作成以外のイベントは無視します"
            );
            return StatusCode::NO_CONTENT;
        }
    }

    let created = match event.into_document_created() {
        Ok(created) => created,
        Err(e) => {
            tracing::error!(
                error.category = error::category::INPUT,
                error.kind = error::kind::INVALID_EVENT,
                error = %e,
                "ドキュメント作成イベントの読み取りに失敗したためイベントを破棄します"
            );
            return StatusCode::NO_CONTENT;
        }
    };

    let invoked = state.registry.dispatch(&created).await;
    tracing::debug!(
        path = %created.path,
        invoked,
        "ドキュメント作成イベントをディスパッチしました"
    );

    StatusCode::NO_CONTENT
}
