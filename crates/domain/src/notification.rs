//! # 通知
//!
//! メール送信基盤に渡すエンベロープと、送信時のエラーを定義する。
//!
//! ## 設計方針
//!
//! - **エンベロープは最小限**: 送信元・宛先・件名・HTML 本文の 4 項目のみ
//! - **送信元は固定**: `from` は設定値から埋められ、メール送信依頼からは受け取らない
//! - **fire-and-forget**: [`NotificationError`] は呼び出し元に伝播させず、ログに記録して握りつぶす

use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    ///
    /// 認証失敗、ネットワーク障害、宛先不正、プロバイダ側の拒否などを区別せず扱う。
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// メールメッセージ（エンベロープ）
///
/// `NotificationSender` に渡される送信単位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元（`addr@example.com` または `Name <addr@example.com>`）
    pub from:    String,
    /// 送信先メールアドレス
    pub to:      String,
    /// 件名
    pub subject: String,
    /// HTML 本文
    pub html:    String,
}
