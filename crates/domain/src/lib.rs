//! # MailFlow ドメイン層
//!
//! メール配送システムのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **外部依存の最小化**: インフラや Web フレームワークに依存しない
//! - **Newtype パターン**: ID・メールアドレス等は専用型でラップし型安全性を確保
//! - **不変性**: 配送リクエストとレポートは生成後に変更されない
//!
//! ## モジュール構成
//!
//! - [`account`] - アカウントエンティティ
//! - [`dispatch`] - 配送リクエスト・レポート・エラー分類
//! - [`message`] - レンダリング済みメッセージと添付ファイル
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`recipient`] - 宛先アドレスの分類（バリデータ）
//! - [`template`] - メッセージテンプレート
//! - [`error`] - ドメイン層エラー定義

#[macro_use]
mod macros;

pub mod account;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod password;
pub mod recipient;
pub mod template;

pub use error::DomainError;
