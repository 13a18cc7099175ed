//! Firestore ドキュメントイベントのワイヤ形式
//!
//! Eventarc が JSON で配送する `DocumentEventData` を読み取り、型付きの
//! フィールド値（`{"stringValue": "..."}` 等）をプレーンな JSON に変換する。
//!
//! ```json
//! {
//!   "value": {
//!     "name": "projects/demo/databases/(default)/documents/mail/abc123",
//!     "fields": {
//!       "to": { "stringValue": "a@b.com" },
//!       "message": { "mapValue": { "fields": {
//!         "subject": { "stringValue": "Hi" },
//!         "html": { "stringValue": "<p>hi</p>" }
//!       } } }
//!     },
//!     "createTime": "2026-01-01T00:00:00Z"
//!   },
//!   "oldValue": {}
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// 64bit 整数は文字列でも数値でも受け付ける（proto3 JSON では文字列になる）
fn deserialize_int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// 緯度経度
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude:  f64,
    #[serde(default)]
    pub longitude: f64,
}

/// 配列値
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

/// マップ値
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

/// 型付きのフィールド値
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    /// `null` または `"NULL_VALUE"`
    NullValue(Value),
    BooleanValue(bool),
    IntegerValue(#[serde(deserialize_with = "deserialize_int64")] i64),
    DoubleValue(f64),
    /// RFC 3339 形式の文字列のまま扱う
    TimestampValue(String),
    StringValue(String),
    /// Base64 文字列のまま扱う
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl FirestoreValue {
    /// プレーンな JSON 値に変換する
    ///
    /// 有限でない浮動小数点数は JSON で表せないため `null` になる。
    pub fn into_json(self) -> Value {
        match self {
            Self::NullValue(_) => Value::Null,
            Self::BooleanValue(b) => Value::Bool(b),
            Self::IntegerValue(n) => Value::Number(n.into()),
            Self::DoubleValue(f) => json_f64(f),
            Self::TimestampValue(s)
            | Self::StringValue(s)
            | Self::BytesValue(s)
            | Self::ReferenceValue(s) => Value::String(s),
            Self::GeoPointValue(point) => {
                let mut map = Map::new();
                map.insert("latitude".to_string(), json_f64(point.latitude));
                map.insert("longitude".to_string(), json_f64(point.longitude));
                Value::Object(map)
            }
            Self::ArrayValue(array) => {
                Value::Array(array.values.into_iter().map(Self::into_json).collect())
            }
            Self::MapValue(map) => Value::Object(fields_into_json(map.fields)),
        }
    }
}

fn json_f64(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

fn fields_into_json(fields: BTreeMap<String, FirestoreValue>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, value.into_json()))
        .collect()
}

/// Firestore ドキュメント
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// リソース名（`projects/{p}/databases/{d}/documents/...`）
    #[serde(default)]
    pub name:        String,
    #[serde(default)]
    pub fields:      BTreeMap<String, FirestoreValue>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl FirestoreDocument {
    /// フィールド値をプレーンな JSON オブジェクトに変換する
    pub fn into_json_fields(self) -> Map<String, Value> {
        fields_into_json(self.fields)
    }
}

/// ドキュメントイベントのペイロード
///
/// 作成イベントでは `old_value` が空、削除イベントでは `value` が空になる。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    pub value:     Option<FirestoreDocument>,
    pub old_value: Option<FirestoreDocument>,
}
