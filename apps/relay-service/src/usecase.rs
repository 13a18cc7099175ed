//! # ユースケース層
//!
//! Relay Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信実装を `Arc<dyn NotificationSender>` で外部から注入
//! - **薄いハンドラ**: HTTP ハンドラはイベントの復号とディスパッチのみを行う

pub mod mail_relay;

pub use mail_relay::{MailRelay, RelayOutcome};
