//! # 通知送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SMTP（Gmail 等のリレー / Mailpit）、SES（AWS）、Noop（開発・テスト用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **状態を持たない**: 実装は認証情報などの固定値だけを保持し、並行呼び出しで共有できる

mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use mailrelay_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use ses::SesNotificationSender;
pub use smtp::{SmtpCredentials, SmtpNotificationSender, SmtpSecurity, SmtpSettings};

/// メール送信トレイト
///
/// 中継処理の出口。エンベロープ 1 件につき 1 回呼ばれ、再試行はしない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
