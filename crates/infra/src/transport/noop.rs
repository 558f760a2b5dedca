//! Noop 送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 送信無効化時に使用する。

use async_trait::async_trait;
use mailflow_domain::{dispatch::TransportError, message::RenderedMessage};

use super::MailTransport;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn send(&self, to: &str, message: &RenderedMessage) -> Result<(), TransportError> {
        tracing::info!(
            to = %to,
            subject = %message.subject,
            has_attachment = message.attachment.is_some(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
