//! SMTP 送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Attachment as MimeAttachment, Message, MultiPart, SinglePart, header::ContentType},
};
use mailflow_domain::{dispatch::TransportError, message::RenderedMessage};

use super::MailTransport;

/// SMTP 送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// Mailpit（開発）や SMTP リレー（本番）で使用する。
pub struct SmtpMailTransport {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailTransport {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: 送信元メールアドレス
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, to: &str, message: &RenderedMessage) -> Result<(), TransportError> {
        let builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| TransportError::InvalidMessage(format!("送信元アドレス不正: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| TransportError::InvalidMessage(format!("宛先アドレス不正: {e}")))?)
            .subject(&message.subject);

        let html_part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone());

        // 添付がある場合は multipart/mixed、ない場合は HTML 単体
        let mail = match &message.attachment {
            Some(attachment) => {
                let content_type = attachment
                    .content_type
                    .parse::<ContentType>()
                    .map_err(|e| {
                        TransportError::InvalidMessage(format!("添付の Content-Type 不正: {e}"))
                    })?;
                let mime_part = MimeAttachment::new(attachment.file_name.clone())
                    .body(attachment.data.to_vec(), content_type);

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(html_part)
                        .singlepart(mime_part),
                )
            }
            None => builder.singlepart(html_part),
        }
        .map_err(|e| TransportError::InvalidMessage(format!("メッセージ構築失敗: {e}")))?;

        self.transport
            .send(mail)
            .await
            .map_err(|e| TransportError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
