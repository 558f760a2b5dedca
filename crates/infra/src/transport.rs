//! # メール送信
//!
//! レンダリング済みメッセージの宛先単位での送信を担当するモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait で送信手段を抽象化
//! - **2 つの実装**: SMTP（開発・本番用）、Noop（送信無効化時）
//! - **環境変数切替**: `MAIL_TRANSPORT` でランタイム選択
//! - **宛先単位の失敗**: 1 件の送信失敗は [`TransportError`] として呼び出し元に返し、
//!   他の宛先への送信継続可否は呼び出し元が判断する

mod noop;
mod smtp;

use async_trait::async_trait;
use mailflow_domain::{dispatch::TransportError, message::RenderedMessage};
pub use noop::NoopMailTransport;
pub use smtp::SmtpMailTransport;

/// メール送信トレイト
///
/// 送信基盤の中核。1 宛先への 1 通の送信を抽象化する。
/// SMTP / Noop の 2 実装を環境変数で切り替える。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// レンダリング済みメッセージを 1 宛先へ送信する
    async fn send(&self, to: &str, message: &RenderedMessage) -> Result<(), TransportError>;
}
