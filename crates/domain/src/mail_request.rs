//! # メール送信依頼
//!
//! 上流のプロセスがドキュメントストアに投入するメール送信依頼を定義する。
//!
//! ## ドキュメントの形
//!
//! ```json
//! {
//!   "to": "a@b.com",
//!   "message": {
//!     "subject": "Hi",
//!     "html": "<p>hi</p>"
//!   }
//! }
//! ```
//!
//! ## 検証方針
//!
//! 値の検証は行わない。`to` / `subject` / `html` は型を問わずテキストにして送信基盤に渡す:
//!
//! - 文字列はそのまま
//! - 配列は各要素をテキストにして `", "` で連結（`["a@b.com", "c@d.com"]` → `"a@b.com, c@d.com"`）
//! - 欠落と `null` は空文字列
//! - それ以外（数値、真偽値、オブジェクト）は JSON 表記
//!
//! 一方、`message` が欠けている（`null` やオブジェクト以外を含む）場合はネストした
//! フィールドを読めないため [`MailRequestError::Malformed`] になる。

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::notification::EmailMessage;

/// メール送信依頼の読み取りエラー
#[derive(Debug, Error)]
pub enum MailRequestError {
    /// `message` が欠落している、またはオブジェクトでない
    #[error("メール送信依頼の形式が不正です: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// 値をテキストにする
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// 型を問わずテキストとして読み取る（欠落は `#[serde(default)]` で空文字列になる）
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_text)
}

/// メール本文
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailMessage {
    /// 件名
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: String,
    /// HTML 本文
    #[serde(default, deserialize_with = "lenient_text")]
    pub html:    String,
}

/// メール送信依頼
///
/// 作成後に 1 度だけ読まれ、このシステムが変更・削除することはない。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailRequest {
    /// 送信先（ドキュメント上のキーは `to`）
    #[serde(rename = "to", default, deserialize_with = "lenient_text")]
    pub recipient: String,
    /// メール本文
    pub message:   MailMessage,
}

impl MailRequest {
    /// ドキュメントのフィールド値からメール送信依頼を読み取る
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, MailRequestError> {
        serde_json::from_value(Value::Object(fields.clone())).map_err(MailRequestError::Malformed)
    }

    /// 固定の送信元を付けてエンベロープを組み立てる
    ///
    /// 宛先・件名・本文は加工せずにそのまま写す。
    pub fn into_email(self, from: impl Into<String>) -> EmailMessage {
        EmailMessage {
            from:    from.into(),
            to:      self.recipient,
            subject: self.message.subject,
            html:    self.message.html,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("オブジェクトを渡すこと: {other}"),
        }
    }

    #[test]
    fn test_フィールドをそのまま読み取る() {
        let request = MailRequest::from_fields(&fields(json!({
            "to": "a@b.com",
            "message": { "subject": "Hi", "html": "<p>hi</p>" }
        })))
        .unwrap();

        assert_eq!(
            request,
            MailRequest {
                recipient: "a@b.com".to_string(),
                message:   MailMessage {
                    subject: "Hi".to_string(),
                    html:    "<p>hi</p>".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_エンベロープに固定の送信元と各フィールドを写す() {
        let request = MailRequest::from_fields(&fields(json!({
            "to": "a@b.com",
            "message": { "subject": "Hi", "html": "<p>hi</p>" }
        })))
        .unwrap();

        let email = request.into_email("Spacia <noreply@example.com>");

        assert_eq!(
            email,
            EmailMessage {
                from:    "Spacia <noreply@example.com>".to_string(),
                to:      "a@b.com".to_string(),
                subject: "Hi".to_string(),
                html:    "<p>hi</p>".to_string(),
            }
        );
    }

    #[test]
    fn test_余分なフィールドは無視する() {
        let request = MailRequest::from_fields(&fields(json!({
            "to": "a@b.com",
            "createdBy": "user-1",
            "message": { "subject": "Hi", "html": "<p>hi</p>", "text": "hi" }
        })))
        .unwrap();

        assert_eq!(request.recipient, "a@b.com");
    }

    #[rstest]
    #[case::宛先の欠落(json!({ "message": { "subject": "Hi", "html": "<p>hi</p>" } }))]
    #[case::宛先がnull(json!({ "to": null, "message": { "subject": "Hi", "html": "<p>hi</p>" } }))]
    #[case::本文の欠落(json!({ "to": "", "message": {} }))]
    fn test_欠落やnullは空文字列として通す(#[case] value: Value) {
        let result = MailRequest::from_fields(&fields(value));
        assert!(result.is_ok());
    }

    #[test]
    fn test_件名と本文の欠落は空文字列になる() {
        let request = MailRequest::from_fields(&fields(json!({
            "to": "a@b.com",
            "message": {}
        })))
        .unwrap();

        assert_eq!(request.message.subject, "");
        assert_eq!(request.message.html, "");
    }

    #[rstest]
    #[case::messageの欠落(json!({ "to": "a@b.com" }))]
    #[case::messageがnull(json!({ "to": "a@b.com", "message": null }))]
    #[case::messageが文字列(json!({ "to": "a@b.com", "message": "Hi" }))]
    fn test_ネストしたフィールドを読めない場合はmalformedになる(#[case] value: Value) {
        let result = MailRequest::from_fields(&fields(value));
        assert!(matches!(result, Err(MailRequestError::Malformed(_))));
    }

    #[rstest]
    #[case::宛先の配列(json!(["a@b.com", "c@d.com"]), "a@b.com, c@d.com")]
    #[case::宛先が数値(json!(42), "42")]
    #[case::宛先が真偽値(json!(true), "true")]
    #[case::宛先が空配列(json!([]), "")]
    fn test_文字列以外の宛先もテキストにして通す(#[case] to: Value, #[case] expected: &str) {
        let request = MailRequest::from_fields(&fields(json!({
            "to": to,
            "message": { "subject": "Hi", "html": "<p>hi</p>" }
        })))
        .unwrap();

        assert_eq!(request.recipient, expected);
    }

    #[test]
    fn test_数値の件名はそのまま文字列になる() {
        let request = MailRequest::from_fields(&fields(json!({
            "to": "a@b.com",
            "message": { "subject": 2026, "html": 1.5 }
        })))
        .unwrap();

        assert_eq!(request.message.subject, "2026");
        assert_eq!(request.message.html, "1.5");
    }
}
