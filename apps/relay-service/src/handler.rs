//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - `event`: CloudEvent の受信
//! - `health`: ヘルスチェック

pub mod event;
pub mod health;

pub use event::{IngestState, receive_event};
pub use health::health_check;
