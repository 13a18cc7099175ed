//! SES 通知送信実装
//!
//! AWS SES v2 API を使用してメールを送信する。

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    types::{Body, Content, Destination, EmailContent, Message},
};
use mailrelay_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// SES 通知送信
///
/// `aws_sdk_sesv2::Client` をラップする。
/// 送信元アドレスはエンベロープの `from` を使う（SES で検証済みであること）。
pub struct SesNotificationSender {
    client: Client,
}

impl SesNotificationSender {
    /// 既存の SES v2 クライアントから作成する
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// AWS の標準プロバイダチェーン（環境変数、プロファイル、IAM ロール）から作成する
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl NotificationSender for SesNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let destination = Destination::builder().to_addresses(&email.to).build();

        let subject = Content::builder()
            .data(&email.subject)
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("件名構築失敗: {e}")))?;
        let html = Content::builder()
            .data(&email.html)
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("HTML 本文構築失敗: {e}")))?;

        let content = EmailContent::builder()
            .simple(
                Message::builder()
                    .subject(subject)
                    .body(Body::builder().html(html).build())
                    .build(),
            )
            .build();

        self.client
            .send_email()
            .from_email_address(&email.from)
            .destination(destination)
            .content(content)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SES 送信失敗: {e}")))?;

        Ok(())
    }
}
