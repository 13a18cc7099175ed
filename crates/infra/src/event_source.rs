//! # イベントソース
//!
//! ドキュメントストアの変更通知を受け取り、ドメインの [`DocumentCreated`] に変換する。
//!
//! ## モジュール構成
//!
//! - [`cloud_event`] - CloudEvents HTTP バインディング（binary / structured）
//! - [`firestore`] - Firestore の `DocumentEventData` と型付きフィールド値
//!
//! [`DocumentCreated`]: mailrelay_domain::document::DocumentCreated

pub mod cloud_event;
pub mod firestore;

pub use cloud_event::CloudEvent;
