//! # イベント受信からメール送信までの結合テスト
//!
//! CloudEvent（HTTP）→ ドキュメント作成イベント → メール送信依頼 → 送信実装 の
//! 変換の連鎖を、モックの送信実装で検証する。

use http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};
use mailrelay_domain::{
    document::{DocumentEventKind, DocumentPattern},
    mail_request::MailRequest,
    notification::EmailMessage,
};
use mailrelay_infra::{
    event_source::CloudEvent,
    mock::MockNotificationSender,
    notification::NotificationSender,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn binary_headers(event_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("ce-id", HeaderValue::from_static("evt-42"));
    headers.insert("ce-type", HeaderValue::from_static(event_type));
    headers.insert(
        "ce-source",
        HeaderValue::from_static("//firestore.googleapis.com/projects/demo/databases/(default)"),
    );
    headers.insert("ce-specversion", HeaderValue::from_static("1.0"));
    headers.insert("ce-subject", HeaderValue::from_static("documents/mail/abc123"));
    headers
}

#[tokio::test]
async fn test_作成イベントのドキュメントがそのままメールとして送信される() {
    let body = json!({
        "value": {
            "name": "projects/demo/databases/(default)/documents/mail/abc123",
            "fields": {
                "to": { "stringValue": "a@b.com" },
                "message": { "mapValue": { "fields": {
                    "subject": { "stringValue": "Hi" },
                    "html": { "stringValue": "<p>x</p>" }
                } } },
                "priority": { "integerValue": "3" }
            },
            "createTime": "2026-01-01T00:00:00Z"
        }
    })
    .to_string();

    let event = CloudEvent::from_http(
        &binary_headers("google.cloud.firestore.document.v1.created"),
        body.as_bytes(),
    )
    .unwrap();
    assert_eq!(event.document_event_kind(), Some(DocumentEventKind::Created));

    let created = event.into_document_created().unwrap();
    let pattern: DocumentPattern = "mail/{docId}".parse().unwrap();
    let params = pattern.matches(&created.path).unwrap();
    assert_eq!(params.get("docId"), Some("abc123"));
    assert_eq!(created.fields["priority"], json!(3));

    let email = MailRequest::from_fields(&created.fields)
        .unwrap()
        .into_email("noreply@example.com");

    let sender = MockNotificationSender::new();
    sender.send_email(&email).await.unwrap();

    assert_eq!(
        sender.sent_emails(),
        vec![EmailMessage {
            from:    "noreply@example.com".to_string(),
            to:      "a@b.com".to_string(),
            subject: "Hi".to_string(),
            html:    "<p>x</p>".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_nameが無い場合はsubjectからパスを取り出す() {
    let body = json!({
        "value": {
            "fields": {
                "to": { "nullValue": null },
                "message": { "mapValue": { "fields": {} } }
            }
        }
    })
    .to_string();

    let created = CloudEvent::from_http(
        &binary_headers("google.cloud.firestore.document.v1.created"),
        body.as_bytes(),
    )
    .unwrap()
    .into_document_created()
    .unwrap();

    assert_eq!(created.path.as_str(), "mail/abc123");

    let email = MailRequest::from_fields(&created.fields)
        .unwrap()
        .into_email("noreply@example.com");
    assert_eq!(email.to, "");
    assert_eq!(email.subject, "");
}

#[tokio::test]
async fn test_送信失敗は送信実装のエラーとして返る() {
    let sender = MockNotificationSender::failing("auth error");
    let email = EmailMessage {
        from:    "noreply@example.com".to_string(),
        to:      "a@b.com".to_string(),
        subject: "Hi".to_string(),
        html:    "<p>x</p>".to_string(),
    };

    let err = sender.send_email(&email).await.unwrap_err();

    assert!(err.to_string().contains("auth error"));
    assert_eq!(sender.sent_emails().len(), 1);
}
