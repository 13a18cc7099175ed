//! # MailRelay インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **イベントの受信**: CloudEvent と Firestore のワイヤ形式をドメインのイベントに変換
//! - **メール送信**: SMTP / SES / Noop の送信実装
//!
//! ## 依存関係
//!
//! ```text
//! relay-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`event_source`] - CloudEvent / Firestore ドキュメントイベントの読み取り
//! - [`notification`] - メール送信トレイトと実装
//! - [`error`] - インフラ層エラー定義
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use mailrelay_infra::{
//!     event_source::CloudEvent,
//!     notification::{NotificationSender, SmtpNotificationSender},
//! };
//!
//! let event = CloudEvent::from_http(&headers, &body)?;
//! let created = event.into_document_created()?;
//! ```

pub mod error;
pub mod event_source;
pub mod notification;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
