//! # ドキュメント
//!
//! ドキュメントストアから通知されるイベントのドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 例 |
//! |---|------------|----|
//! | [`DocumentPath`] | ドキュメントパス | `mail/abc123` |
//! | [`DocumentPattern`] | トリガーパターン | `mail/{docId}` |
//! | [`DocumentEventKind`] | ドキュメントイベント種別 | created / updated / deleted / written |
//! | [`DocumentCreated`] | ドキュメント作成イベント | 新規ドキュメントのフィールド値を運ぶ |
//!
//! ## パスの書式
//!
//! パスはデータベースルートからの相対パスで、`コレクション/ドキュメントID` の組が
//! 1 つ以上連なる。サブコレクション（`users/u1/mail/m1`）もそのまま扱える。

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde_json::{Map, Value};
use strum::IntoStaticStr;

use crate::DomainError;

/// Firestore のリソース名でドキュメントパスの直前に置かれる区切り
const RESOURCE_NAME_DOCUMENTS_MARKER: &str = "/documents/";

/// CloudEvent の subject でドキュメントパスの前に付く接頭辞
const SUBJECT_PREFIX: &str = "documents/";

/// パスを `/` で分割し、空セグメントを検出する
fn split_segments(value: &str) -> Result<Vec<&str>, DomainError> {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "ドキュメントパスは必須です".to_string(),
        ));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(DomainError::Validation(format!(
            "ドキュメントパスに空のセグメントが含まれています: {value}"
        )));
    }
    if segments.len() % 2 != 0 {
        return Err(DomainError::Validation(format!(
            "ドキュメントパスはコレクションとドキュメント ID の組である必要があります: {value}"
        )));
    }

    Ok(segments)
}

/// ドキュメントパス
///
/// 先頭・末尾の `/` を取り除いた正規形で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Firestore のリソース名からパスを取り出す
    ///
    /// `projects/{project}/databases/{database}/documents/mail/abc123` → `mail/abc123`
    pub fn from_resource_name(name: &str) -> Result<Self, DomainError> {
        let (_, path) = name
            .split_once(RESOURCE_NAME_DOCUMENTS_MARKER)
            .ok_or_else(|| {
                DomainError::Validation(format!("ドキュメントのリソース名が不正です: {name}"))
            })?;
        path.parse()
    }

    /// CloudEvent の subject からパスを取り出す
    ///
    /// `documents/mail/abc123` → `mail/abc123`
    pub fn from_subject(subject: &str) -> Result<Self, DomainError> {
        let path = subject.strip_prefix(SUBJECT_PREFIX).ok_or_else(|| {
            DomainError::Validation(format!("CloudEvent の subject が不正です: {subject}"))
        })?;
        path.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.split('/')
    }

    /// ドキュメントが属するコレクションの ID
    pub fn collection_id(&self) -> &str {
        self.segments().rev().nth(1).unwrap_or_default()
    }

    /// ドキュメント ID（末尾セグメント）
    pub fn document_id(&self) -> &str {
        self.segments().next_back().unwrap_or_default()
    }
}

impl FromStr for DocumentPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = split_segments(s)?;
        Ok(Self(segments.join("/")))
    }
}

/// トリガーパターンのセグメント
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    /// 完全一致するセグメント
    Literal(String),
    /// 任意の 1 セグメントに一致し、その値をパラメータとして捕捉する
    Wildcard(String),
}

impl fmt::Display for PatternSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.write_str(value),
            Self::Wildcard(name) => write!(f, "{{{name}}}"),
        }
    }
}

/// トリガーパターン
///
/// `mail/{docId}` のように、`{name}` 形式のワイルドカードを含むドキュメントパス。
/// ワイルドカードはちょうど 1 セグメントに一致する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPattern(Vec<PatternSegment>);

impl DocumentPattern {
    /// パスがパターンに一致するか判定し、一致すれば捕捉したパラメータを返す
    pub fn matches(&self, path: &DocumentPath) -> Option<DocumentParams> {
        let segments: Vec<&str> = path.segments().collect();
        if segments.len() != self.0.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (pattern_segment, segment) in self.0.iter().zip(segments) {
            match pattern_segment {
                PatternSegment::Literal(literal) if literal == segment => {}
                PatternSegment::Literal(_) => return None,
                PatternSegment::Wildcard(name) => {
                    params.insert(name.clone(), segment.to_string());
                }
            }
        }

        Some(DocumentParams(params))
    }
}

impl FromStr for DocumentPattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut names: Vec<&str> = Vec::new();
        let mut segments = Vec::new();

        for raw in split_segments(s)? {
            let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) else {
                if raw.contains(['{', '}']) {
                    return Err(DomainError::Validation(format!(
                        "ワイルドカードはセグメント全体を {{name}} で囲む必要があります: {raw}"
                    )));
                }
                segments.push(PatternSegment::Literal(raw.to_string()));
                continue;
            };

            if inner.is_empty() || !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(DomainError::Validation(format!(
                    "ワイルドカード名が不正です: {raw}"
                )));
            }
            if names.contains(&inner) {
                return Err(DomainError::Validation(format!(
                    "ワイルドカード名が重複しています: {inner}"
                )));
            }
            names.push(inner);
            segments.push(PatternSegment::Wildcard(inner.to_string()));
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for DocumentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// パターン照合で捕捉したパラメータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentParams(BTreeMap<String, String>);

impl DocumentParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// ドキュメントイベント種別
///
/// CloudEvent の `type` 属性（`google.cloud.firestore.document.v1.<kind>`）に対応する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    IntoStaticStr,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentEventKind {
    /// ドキュメント作成
    Created,
    /// ドキュメント更新
    Updated,
    /// ドキュメント削除
    Deleted,
    /// 作成・更新・削除のいずれか
    Written,
}

impl DocumentEventKind {
    /// CloudEvent type の共通接頭辞
    pub const CLOUD_EVENT_TYPE_PREFIX: &'static str = "google.cloud.firestore.document.v1.";

    /// 認証コンテキスト付きイベントの接尾辞
    const AUTH_CONTEXT_SUFFIX: &'static str = ".withAuthContext";

    /// CloudEvent の `type` 属性から種別を判定する
    ///
    /// Firestore 以外のイベント種別や未知の種別は `None` を返す。
    pub fn from_cloud_event_type(event_type: &str) -> Option<Self> {
        let kind = event_type.strip_prefix(Self::CLOUD_EVENT_TYPE_PREFIX)?;
        let kind = kind.strip_suffix(Self::AUTH_CONTEXT_SUFFIX).unwrap_or(kind);
        kind.parse().ok()
    }
}

/// ドキュメント作成イベント
///
/// 新規作成されたドキュメントのフィールド値を、ワイヤ形式から復号した
/// プレーンな JSON オブジェクトとして保持する。
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCreated {
    /// イベント ID（CloudEvent の `id`）
    pub event_id:    String,
    /// 作成されたドキュメントのパス
    pub path:        DocumentPath,
    /// トリガーパターンで捕捉したパラメータ（ディスパッチ時に設定される）
    pub params:      DocumentParams,
    /// ドキュメントのフィールド値
    pub fields:      Map<String, Value>,
    /// ドキュメントの作成日時
    pub create_time: Option<DateTime<Utc>>,
}

impl DocumentCreated {
    pub fn new(event_id: impl Into<String>, path: DocumentPath, fields: Map<String, Value>) -> Self {
        Self {
            event_id: event_id.into(),
            path,
            params: DocumentParams::default(),
            fields,
            create_time: None,
        }
    }

    pub fn with_create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = Some(create_time);
        self
    }

    pub fn with_params(mut self, params: DocumentParams) -> Self {
        self.params = params;
        self
    }
}
