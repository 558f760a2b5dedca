//! # Mail Service 設定
//!
//! 環境変数から Mail Service サーバーの設定を読み込む。

use std::env;

/// メールトランスポートのバックエンド種別
///
/// 環境変数 `MAIL_TRANSPORT` で切り替える。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportBackend {
    /// SMTP サーバー経由で送信（開発: Mailpit、本番: SMTP リレー）
    Smtp,
    /// 送信せずログ出力のみ
    Noop,
}

impl TransportBackend {
    /// 文字列からバックエンド種別をパースする
    ///
    /// 不正な値の場合は `Noop` にフォールバックし、stderr に警告を出力する。
    pub fn parse(s: &str) -> Self {
        match s {
            "smtp" => Self::Smtp,
            "noop" => Self::Noop,
            other => {
                eprintln!("WARNING: unknown MAIL_TRANSPORT={other:?}, falling back to noop");
                Self::Noop
            }
        }
    }
}

/// Mail Service サーバーの設定
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// データベース接続 URL
    pub database_url: String,
    /// Redis 接続 URL（セッションストア）
    pub redis_url:    String,
    /// アップロードファイルの保存ディレクトリ
    pub upload_dir:   String,
    /// メールトランスポートのバックエンド
    pub transport:    TransportBackend,
    /// SMTP サーバーのホスト名
    pub smtp_host:    String,
    /// SMTP サーバーのポート番号
    pub smtp_port:    u16,
    /// 送信元メールアドレス
    pub from_address: String,
}

impl MailConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host:         env::var("MAIL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port:         env::var("MAIL_PORT")
                .expect("MAIL_PORT が設定されていません")
                .parse()
                .expect("MAIL_PORT は有効なポート番号である必要があります"),
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL が設定されていません"),
            redis_url:    env::var("REDIS_URL").expect("REDIS_URL が設定されていません"),
            upload_dir:   env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            transport:    TransportBackend::parse(
                &env::var("MAIL_TRANSPORT").unwrap_or_else(|_| "smtp".to_string()),
            ),
            smtp_host:    env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port:    env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .expect("SMTP_PORT は有効なポート番号である必要があります"),
            from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "no-reply@mailflow.example.com".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_backendのパース() {
        assert_eq!(TransportBackend::parse("smtp"), TransportBackend::Smtp);
        assert_eq!(TransportBackend::parse("noop"), TransportBackend::Noop);
    }

    #[test]
    fn test_不正なtransport_backendはnoopにフォールバックする() {
        assert_eq!(TransportBackend::parse("ses"), TransportBackend::Noop);
        assert_eq!(TransportBackend::parse(""), TransportBackend::Noop);
    }
}
