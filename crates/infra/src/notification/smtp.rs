//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 本番では Gmail 等の SMTP リレー（TLS + 認証）、開発環境では Mailpit（平文）に接続する。

use std::fmt;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use mailrelay_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;
use crate::error::InfraError;

/// SMTP 接続の暗号化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SmtpSecurity {
    /// 平文（Mailpit 等のローカル SMTP 向け）
    None,
    /// 平文で接続後に STARTTLS で昇格（通常ポート 587）
    StartTls,
    /// 接続時から TLS（通常ポート 465）
    Tls,
}

/// SMTP 認証情報
///
/// `Debug` 出力ではパスワードを伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// SMTP 接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    /// SMTP サーバーのホスト名（例: "smtp.gmail.com"）
    pub host:        String,
    /// SMTP サーバーのポート番号（例: 465, 1025 for Mailpit）
    pub port:        u16,
    /// 暗号化方式
    pub security:    SmtpSecurity,
    /// 認証情報（未設定なら認証しない）
    pub credentials: Option<SmtpCredentials>,
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 接続はここでは行わず、送信時に確立する。
    pub fn new(settings: &SmtpSettings) -> Result<Self, InfraError> {
        let builder = match settings.security {
            // builder_dangerous: TLS なしで接続
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host).map_err(
                    |e| InfraError::transport(format!("STARTTLS リレー構築失敗: {e}")),
                )?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| InfraError::transport(format!("TLS リレー構築失敗: {e}")))?,
        };

        let builder = builder.port(settings.port);
        let builder = match &settings.credentials {
            Some(credentials) => builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            )),
            None => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// エンベロープから送信用メッセージを組み立てる
///
/// 送信元・宛先がメールアドレスとして解釈できない場合（空文字列を含む）は
/// 送信失敗として扱う。
fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn make_email(to: &str) -> EmailMessage {
        EmailMessage {
            from:    "Spacia <noreply@example.com>".to_string(),
            to:      to.to_string(),
            subject: "Hi".to_string(),
            html:    "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[rstest]
    #[case("none", SmtpSecurity::None)]
    #[case("starttls", SmtpSecurity::StartTls)]
    #[case("tls", SmtpSecurity::Tls)]
    fn smtp_securityを文字列からパースできる(#[case] input: &str, #[case] expected: SmtpSecurity) {
        assert_eq!(input.parse::<SmtpSecurity>().unwrap(), expected);
    }

    #[test]
    fn 未知の暗号化方式はパースエラーになる() {
        assert!("ssl".parse::<SmtpSecurity>().is_err());
    }

    #[rstest]
    #[case(SmtpSecurity::None, 1025)]
    #[case(SmtpSecurity::StartTls, 587)]
    #[case(SmtpSecurity::Tls, 465)]
    fn 各暗号化方式で送信インスタンスを作成できる(
        #[case] security: SmtpSecurity,
        #[case] port: u16,
    ) {
        let settings = SmtpSettings {
            host: "smtp.example.com".to_string(),
            port,
            security,
            credentials: Some(SmtpCredentials {
                username: "relay@example.com".to_string(),
                password: "app-password".to_string(),
            }),
        };

        assert!(SmtpNotificationSender::new(&settings).is_ok());
    }

    #[test]
    fn 認証情報のdebug出力はパスワードを伏せる() {
        let credentials = SmtpCredentials {
            username: "relay@example.com".to_string(),
            password: "app-password".to_string(),
        };

        let debug = format!("{credentials:?}");
        assert!(debug.contains("relay@example.com"));
        assert!(!debug.contains("app-password"));
    }

    #[test]
    fn エンベロープからhtmlメッセージを組み立てる() {
        let message = build_message(&make_email("a@b.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("noreply@example.com"));
        assert!(formatted.contains("To: a@b.com"));
        assert!(formatted.contains("Subject: Hi"));
        assert!(formatted.contains("Content-Type: text/html"));
        assert!(formatted.contains("<p>hi</p>"));
    }

    #[rstest]
    #[case("")]
    #[case("not-an-address")]
    fn 宛先が解釈できない場合は送信失敗になる(#[case] to: &str) {
        let result = build_message(&make_email(to));
        assert!(matches!(result, Err(NotificationError::SendFailed(msg)) if msg.contains("宛先")));
    }

    #[test]
    fn 送信元が解釈できない場合は送信失敗になる() {
        let mut email = make_email("a@b.com");
        email.from = "Spacia".to_string();

        let result = build_message(&email);
        assert!(matches!(result, Err(NotificationError::SendFailed(msg)) if msg.contains("送信元")));
    }
}
