//! # ビジネスイベントログの構造化ヘルパー
//!
//! `jq` で効率的に調査できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] / [`log_business_error!`] マクロで出力する。
//! `event.kind = "business_event"` マーカーが自動付与され、
//! `jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを INFO レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// 失敗したビジネスイベントを ERROR レベルで出力する。
///
/// フィールドの慣例は [`log_business_event!`] と同じ。
#[macro_export]
macro_rules! log_business_error {
    ($($args:tt)*) => {
        ::tracing::error!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const MAIL: &str = "mail";
    }

    /// イベントアクション
    pub mod action {
        pub const MAIL_SENT: &str = "mail.sent";
        pub const MAIL_SEND_FAILED: &str = "mail.send_failed";
        pub const MAIL_MALFORMED: &str = "mail.malformed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const MAIL_REQUEST: &str = "mail_request";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（メール送信基盤）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 受信したイベント・ドキュメントの形式不正
        pub const INPUT: &str = "input";
    }

    /// エラー種別
    pub mod kind {
        pub const SEND_FAILURE: &str = "send_failure";
        pub const MALFORMED_REQUEST: &str = "malformed_request";
        pub const INVALID_EVENT: &str = "invalid_event";
    }
}
