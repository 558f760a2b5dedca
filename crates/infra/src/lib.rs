//! # MailFlow インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **セッションストア**: Redis によるセッション管理
//! - **メールトランスポート**: SMTP / Noop バックエンドによる送信
//! - **宛先抽出**: アップロードファイルからの宛先リスト抽出
//! - **一時ファイル管理**: アップロードファイルの保存・削除
//! - **リポジトリ実装**: ドメインエンティティの永続化
//!
//! ## 依存関係
//!
//! ```text
//! app → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。

pub mod db;
pub mod error;
pub mod extractor;
pub mod password;
pub mod repository;
pub mod session;
pub mod transport;
pub mod upload;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
pub use extractor::RecipientExtractor;
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use session::{RedisSessionManager, SessionData, SessionManager};
pub use transport::{MailTransport, NoopMailTransport, SmtpMailTransport};
pub use upload::{LocalUploadStore, StoredUpload, UploadStore};
