//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に発生する検証エラーを表現する。
//!
//! ## 使用例
//!
//! ```rust
//! use mailrelay_domain::{DomainError, document::DocumentPath};
//!
//! let result: Result<DocumentPath, DomainError> = "mail".parse();
//! assert!(matches!(result, Err(DomainError::Validation(_))));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 入力値の検証失敗
    ///
    /// ドキュメントパスやトリガーパターンの書式違反など。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
