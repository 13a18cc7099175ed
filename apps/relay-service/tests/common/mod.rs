//! 結合テスト共通のフィクスチャ

#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};
use http::Request;
use mailrelay_infra::mock::MockNotificationSender;
use mailrelay_service::{app_builder::build_app, trigger::TriggerRegistry, usecase::MailRelay};
use serde_json::{Value, json};

pub const FROM: &str = "Spacia <noreply@example.com>";
pub const CREATED: &str = "google.cloud.firestore.document.v1.created";
pub const UPDATED: &str = "google.cloud.firestore.document.v1.updated";
pub const SOURCE: &str = "//firestore.googleapis.com/projects/demo/databases/(default)";

/// `mail/{docId}` にメール中継を登録したルーターを構築する
pub fn relay_app(sender: MockNotificationSender) -> Router {
    let relay = Arc::new(MailRelay::new(Arc::new(sender), FROM));
    let mut registry = TriggerRegistry::new();
    registry.register("mail/{docId}".parse().unwrap(), relay);
    build_app(Arc::new(registry))
}

/// Firestore のワイヤ形式のメール送信依頼ドキュメント
pub fn mail_document(path: &str, to: &str, subject: &str, html: &str) -> Value {
    json!({
        "value": {
            "name": format!("projects/demo/databases/(default)/documents/{path}"),
            "fields": {
                "to": { "stringValue": to },
                "message": { "mapValue": { "fields": {
                    "subject": { "stringValue": subject },
                    "html": { "stringValue": html }
                } } }
            },
            "createTime": "2026-01-01T00:00:00Z",
            "updateTime": "2026-01-01T00:00:00Z"
        }
    })
}

/// binary モードの CloudEvent リクエスト
pub fn binary_request(event_id: &str, event_type: &str, data: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("ce-id", event_id)
        .header("ce-type", event_type)
        .header("ce-source", SOURCE)
        .header("ce-specversion", "1.0")
        .header("ce-time", "2026-01-01T00:00:00Z")
        .body(Body::from(data.to_string()))
        .unwrap()
}

/// structured モードの CloudEvent リクエスト
pub fn structured_request(event_id: &str, event_type: &str, data: &Value) -> Request<Body> {
    let event = json!({
        "specversion": "1.0",
        "id": event_id,
        "type": event_type,
        "source": SOURCE,
        "time": "2026-01-01T00:00:00Z",
        "datacontenttype": "application/json",
        "data": data
    });

    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/cloudevents+json; charset=utf-8")
        .body(Body::from(event.to_string()))
        .unwrap()
}
