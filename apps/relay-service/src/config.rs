//! # Relay Service 設定
//!
//! 環境変数から Relay Service の設定を読み込む。
//!
//! 認証情報はソースコードに埋め込まず、環境変数（本番ではシークレットストアから
//! 注入されたもの、開発では `.env`）からのみ受け取る。

use std::env;

use mailrelay_domain::document::DocumentPattern;
use mailrelay_infra::notification::{SmtpCredentials, SmtpSecurity, SmtpSettings};
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定（または空）
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("{name} の値が不正です（{value:?}）: {reason}")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// Relay Service の設定
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// メール中継の設定
    pub mail: MailConfig,
}

/// メール中継の設定
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// 固定の送信元（`addr@example.com` または `Name <addr@example.com>`）
    pub from_address:    String,
    /// 監視するドキュメントのパターン（`{MAIL_COLLECTION}/{docId}`）
    pub trigger_pattern: DocumentPattern,
    /// 送信バックエンド
    pub backend:         NotificationBackend,
}

/// メール送信バックエンド
///
/// `NOTIFICATION_BACKEND` 環境変数で切り替える:
/// - `smtp`: SMTP リレー経由で送信
/// - `ses`: Amazon SES v2 経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationBackend {
    Smtp(SmtpSettings),
    Ses,
    Noop,
}

impl NotificationBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Ses => "ses",
            Self::Noop => "noop",
        }
    }
}

/// 環境変数の読み取り元
///
/// テストでプロセスの環境変数を書き換えずに済むよう、読み取り関数を差し替え可能にする。
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 未設定・空文字列はどちらも未設定として扱う
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn port(&self, name: &'static str, default: u16) -> Result<u16, ConfigError> {
        match self.get(name) {
            Some(value) => value.trim().parse().map_err(|e| ConfigError::Invalid {
                name,
                reason: format!("{e}"),
                value,
            }),
            None => Ok(default),
        }
    }
}

impl RelayConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の読み取り関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            host: vars.get_or("RELAY_HOST", "0.0.0.0"),
            port: vars.port("PORT", 8080)?,
            mail: MailConfig::from_vars(&vars)?,
        })
    }
}

impl MailConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let collection = vars.get_or("MAIL_COLLECTION", "mail");
        let trigger_pattern = format!("{}/{{docId}}", collection.trim_matches('/'))
            .parse()
            .map_err(|e: mailrelay_domain::DomainError| ConfigError::Invalid {
                name:   "MAIL_COLLECTION",
                value:  collection.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            from_address: vars.required("MAIL_FROM")?,
            trigger_pattern,
            backend: NotificationBackend::from_vars(vars)?,
        })
    }
}

impl NotificationBackend {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = vars.get_or("NOTIFICATION_BACKEND", "noop");
        match backend.as_str() {
            "smtp" => Ok(Self::Smtp(smtp_settings(vars)?)),
            "ses" => Ok(Self::Ses),
            "noop" => Ok(Self::Noop),
            _ => Err(ConfigError::Invalid {
                name:   "NOTIFICATION_BACKEND",
                value:  backend,
                reason: "smtp / ses / noop のいずれかを指定してください".to_string(),
            }),
        }
    }
}

/// SMTP 接続設定を読み込む
///
/// 既定値は Gmail の SMTP リレー（smtp.gmail.com:465, TLS）。
fn smtp_settings<F>(vars: &Vars<F>) -> Result<SmtpSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let security_value = vars.get_or("SMTP_TLS", "tls");
    let security: SmtpSecurity =
        security_value
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name:   "SMTP_TLS",
                value:  security_value.clone(),
                reason: "none / starttls / tls のいずれかを指定してください".to_string(),
            })?;

    let credentials = match (vars.get("SMTP_USERNAME"), vars.get("SMTP_PASSWORD")) {
        (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::Missing("SMTP_PASSWORD")),
        (None, Some(_)) => return Err(ConfigError::Missing("SMTP_USERNAME")),
    };

    Ok(SmtpSettings {
        host: vars.get_or("SMTP_HOST", "smtp.gmail.com"),
        port: vars.port("SMTP_PORT", 465)?,
        security,
        credentials,
    })
}
