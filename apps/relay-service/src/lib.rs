//! # Relay Service ライブラリ
//!
//! ドキュメントストアのメール送信依頼をメールとして中継するサービスのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 送信実装の選択とルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `handler`: HTTP ハンドラ（CloudEvent 受信、ヘルスチェック）
//! - `trigger`: ドキュメントパターンとハンドラの登録表
//! - `usecase`: メール中継

pub mod app_builder;
pub mod config;
pub mod handler;
pub mod trigger;
pub mod usecase;
