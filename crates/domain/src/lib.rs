//! # MailRelay ドメイン層
//!
//! メール中継の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **外部依存なし**: ドキュメントストアやメール送信基盤の詳細は infra 層に閉じ込める
//! - **値オブジェクト**: ドキュメントパスやパターンは検証済みの型として扱う
//! - **ドメインエラー**: 入力値の検証失敗を [`DomainError`] で表現する
//!
//! ## 依存関係の方向
//!
//! ```text
//! relay-service → infra → domain
//!        ↘                  ↑
//!          shared   ────────┘ (依存なし)
//! ```
//!
//! ## モジュール構成
//!
//! - [`document`] - ドキュメントパス、トリガーパターン、作成イベント
//! - [`mail_request`] - ドキュメントストアに投入されるメール送信依頼
//! - [`notification`] - メール送信基盤に渡すエンベロープと送信エラー
//! - [`error`] - ドメイン層エラー
//!
//! ## 使用例
//!
//! ```rust
//! use mailrelay_domain::document::{DocumentPath, DocumentPattern};
//!
//! let pattern: DocumentPattern = "mail/{docId}".parse().unwrap();
//! let path: DocumentPath = "mail/abc123".parse().unwrap();
//!
//! let params = pattern.matches(&path).unwrap();
//! assert_eq!(params.get("docId"), Some("abc123"));
//! ```

pub mod document;
pub mod error;
pub mod mail_request;
pub mod notification;

pub use error::DomainError;
