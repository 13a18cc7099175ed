//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのメール送信モック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailrelay-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailrelay_domain::notification::{EmailMessage, NotificationError};

use crate::notification::NotificationSender;

// ===== MockNotificationSender =====

/// 送信されたエンベロープを記録するモック
///
/// `failing()` で作成すると、記録したうえで常に `SendFailed` を返す。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:    Arc<Mutex<Vec<EmailMessage>>>,
    failure: Option<String>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗を返すモックを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent:    Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.into()),
        }
    }

    /// 送信が試みられたエンベロープ（成功・失敗を問わない）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.failure {
            Some(message) => Err(NotificationError::SendFailed(message.clone())),
            None => Ok(()),
        }
    }
}
