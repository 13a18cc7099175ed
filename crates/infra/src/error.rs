//! # インフラ層エラー定義
//!
//! イベントの復号やメール送信基盤の初期化で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Serialization, InvalidEvent, Transport）
//!
//! `From` 実装や convenience constructor でエラーを生成すると、その時点の
//! スパン情報（どのリクエスト・どのイベントの処理中か）が自動的に記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::InvalidEvent(msg) => { /* 破棄してログ出力 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// シリアライズ/デシリアライズエラー
    ///
    /// リクエストボディが JSON として読めない場合など。
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// イベント不正
    ///
    /// CloudEvent の必須属性の欠落、ドキュメントパスの書式違反など。
    #[error("不正なイベント: {0}")]
    InvalidEvent(String),

    /// メール送信基盤の初期化エラー
    ///
    /// SMTP リレーの構築失敗など。送信時のエラーは `NotificationError` で扱う。
    #[error("メール送信基盤エラー: {0}")]
    Transport(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 不正なイベントエラーを生成する
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidEvent(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// メール送信基盤の初期化エラーを生成する
    pub fn transport(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Transport(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
