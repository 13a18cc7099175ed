//! CloudEvents HTTP バインディング
//!
//! ホスティング基盤（Eventarc 等）が HTTP で配送する CloudEvent を読み取る。
//!
//! ## 対応するコンテンツモード
//!
//! | モード | 判定 | 属性の位置 | data |
//! |-------|------|----------|------|
//! | binary | 既定 | `ce-*` ヘッダー | リクエストボディ（JSON） |
//! | structured | `Content-Type: application/cloudevents+json` | ボディの JSON | ボディの `data` |

use chrono::{DateTime, Utc};
use http::{HeaderMap, header::CONTENT_TYPE};
use mailrelay_domain::document::{DocumentCreated, DocumentEventKind, DocumentPath};
use serde::Deserialize;
use serde_json::Value;

use super::firestore::DocumentEventData;
use crate::error::InfraError;

/// 対応する CloudEvents 仕様バージョン
pub const SPEC_VERSION: &str = "1.0";

/// structured モードの Content-Type
const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// CloudEvent
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEvent {
    pub id:           String,
    /// `type` 属性
    pub event_type:   String,
    pub source:       String,
    pub spec_version: String,
    pub subject:      Option<String>,
    pub time:         Option<DateTime<Utc>>,
    pub data:         Value,
}

/// structured モードのボディ
#[derive(Debug, Deserialize)]
struct StructuredCloudEvent {
    specversion: String,
    id:          String,
    #[serde(rename = "type")]
    event_type:  String,
    source:      String,
    subject:     Option<String>,
    time:        Option<DateTime<Utc>>,
    #[serde(default)]
    data:        Value,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, InfraError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| InfraError::invalid_event(format!("{name} ヘッダーが不正です")))
        })
        .transpose()
}

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, InfraError> {
    header_str(headers, name)?
        .map(str::to_string)
        .ok_or_else(|| InfraError::invalid_event(format!("{name} ヘッダーがありません")))
}

/// JSON として扱える Content-Type か判定する
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

impl CloudEvent {
    /// HTTP リクエストのヘッダーとボディから CloudEvent を読み取る
    pub fn from_http(headers: &HeaderMap, body: &[u8]) -> Result<Self, InfraError> {
        let content_type = header_str(headers, CONTENT_TYPE.as_str())?;

        let event = match content_type {
            Some(ct) if ct.to_ascii_lowercase().starts_with(STRUCTURED_CONTENT_TYPE) => {
                Self::from_structured(body)?
            }
            Some(ct) if !is_json_content_type(ct) => {
                return Err(InfraError::invalid_event(format!(
                    "サポートしていない Content-Type です: {ct}"
                )));
            }
            _ => Self::from_binary(headers, body)?,
        };

        if event.spec_version != SPEC_VERSION {
            return Err(InfraError::invalid_event(format!(
                "サポートしていない specversion です: {}",
                event.spec_version
            )));
        }

        Ok(event)
    }

    fn from_structured(body: &[u8]) -> Result<Self, InfraError> {
        let structured: StructuredCloudEvent = serde_json::from_slice(body)?;
        Ok(Self {
            id:           structured.id,
            event_type:   structured.event_type,
            source:       structured.source,
            spec_version: structured.specversion,
            subject:      structured.subject,
            time:         structured.time,
            data:         structured.data,
        })
    }

    fn from_binary(headers: &HeaderMap, body: &[u8]) -> Result<Self, InfraError> {
        let time = header_str(headers, "ce-time")?
            .map(|value| {
                DateTime::parse_from_rfc3339(value)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| InfraError::invalid_event(format!("ce-time が不正です: {e}")))
            })
            .transpose()?;

        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(body)?
        };

        Ok(Self {
            id: required_header(headers, "ce-id")?,
            event_type: required_header(headers, "ce-type")?,
            source: required_header(headers, "ce-source")?,
            spec_version: required_header(headers, "ce-specversion")?,
            subject: header_str(headers, "ce-subject")?.map(str::to_string),
            time,
            data,
        })
    }

    /// Firestore のドキュメントイベント種別を返す
    ///
    /// Firestore 以外のイベントは `None`。
    pub fn document_event_kind(&self) -> Option<DocumentEventKind> {
        DocumentEventKind::from_cloud_event_type(&self.event_type)
    }

    /// ドキュメント作成イベントに変換する
    ///
    /// パスは `data.value.name`（リソース名）を優先し、無ければ `subject` から取り出す。
    pub fn into_document_created(self) -> Result<DocumentCreated, InfraError> {
        let data: DocumentEventData = serde_json::from_value(self.data)?;
        let document = data
            .value
            .ok_or_else(|| InfraError::invalid_event("data.value がありません"))?;

        let path = if !document.name.is_empty() {
            DocumentPath::from_resource_name(&document.name)
        } else if let Some(subject) = &self.subject {
            DocumentPath::from_subject(subject)
        } else {
            return Err(InfraError::invalid_event(
                "ドキュメントパスを特定できません（name も subject もありません）",
            ));
        }
        .map_err(|e| InfraError::invalid_event(e.to_string()))?;

        let create_time = document.create_time.or(self.time);
        let event = DocumentCreated::new(self.id, path, document.into_json_fields());

        Ok(match create_time {
            Some(t) => event.with_create_time(t),
            None => event,
        })
    }
}
