//! # メール中継
//!
//! メール送信依頼ドキュメントの作成を受けて、固定の送信元から 1 通のメールを送信する。
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: `handle()` は送信失敗・形式不正でもエラーを返さない
//! - **ログ記録**: 成功・失敗どちらもビジネスイベントとしてログ出力する
//! - **再送しない**: 失敗時のリトライや重複排除は行わない（1 イベント 1 回の送信試行）
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use async_trait::async_trait;
use mailrelay_domain::{document::DocumentCreated, mail_request::MailRequest};
use mailrelay_infra::notification::NotificationSender;
use mailrelay_shared::{
    event_log::{error, event},
    log_business_error,
    log_business_event,
};

use crate::trigger::DocumentCreatedHandler;

/// 1 イベントの処理結果
///
/// 呼び出し元へのエラー伝播には使わない。テストと診断用の情報。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RelayOutcome {
    /// 送信基盤がメールを受け付けた
    Sent,
    /// 送信基盤がエラーを返した（ログ出力済み）
    SendFailed,
    /// ドキュメントがメール送信依頼として解釈できなかった（送信していない）
    Malformed,
}

/// メール中継
pub struct MailRelay {
    sender:       Arc<dyn NotificationSender>,
    from_address: String,
}

impl MailRelay {
    pub fn new(sender: Arc<dyn NotificationSender>, from_address: impl Into<String>) -> Self {
        Self {
            sender,
            from_address: from_address.into(),
        }
    }

    /// 作成されたドキュメントをメールとして送信する
    ///
    /// 宛先・件名・本文はドキュメントの値をそのまま使う（検証・サニタイズしない）。
    #[tracing::instrument(
        skip_all,
        fields(path = %created.path, doc_id = created.path.document_id(), event_id = %created.event_id)
    )]
    pub async fn handle(&self, created: &DocumentCreated) -> RelayOutcome {
        let request = match MailRequest::from_fields(&created.fields) {
            Ok(request) => request,
            Err(e) => {
                log_business_error!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_MALFORMED,
                    event.entity_type = event::entity_type::MAIL_REQUEST,
                    event.entity_id = %created.path,
                    event.result = event::result::FAILURE,
                    error.category = error::category::INPUT,
                    error.kind = error::kind::MALFORMED_REQUEST,
                    error = %e,
                    "メール送信依頼の形式が不正なため送信しません"
                );
                return RelayOutcome::Malformed;
            }
        };

        let email = request.into_email(self.from_address.as_str());

        match self.sender.send_email(&email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_SENT,
                    event.entity_type = event::entity_type::MAIL_REQUEST,
                    event.entity_id = %created.path,
                    event.result = event::result::SUCCESS,
                    mail.recipient = %email.to,
                    "メール送信成功"
                );
                RelayOutcome::Sent
            }
            Err(e) => {
                log_business_error!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_SEND_FAILED,
                    event.entity_type = event::entity_type::MAIL_REQUEST,
                    event.entity_id = %created.path,
                    event.result = event::result::FAILURE,
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::SEND_FAILURE,
                    mail.recipient = %email.to,
                    error = %e,
                    "メール送信失敗"
                );
                RelayOutcome::SendFailed
            }
        }
    }
}

#[async_trait]
impl DocumentCreatedHandler for MailRelay {
    async fn on_document_created(&self, event: &DocumentCreated) {
        let outcome = self.handle(event).await;
        tracing::debug!(%outcome, "メール送信依頼の処理が完了しました");
    }
}
