//! # リポジトリ実装
//!
//! ドメイン層のエンティティの永続化を担当するリポジトリ群。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: トレイトをここで定義し、ユースケース層はトレイト経由で利用
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod account_repository;
pub mod dispatch_log_repository;
pub mod template_repository;

pub use account_repository::{AccountRepository, PostgresAccountRepository};
pub use dispatch_log_repository::{
    DispatchLog,
    DispatchLogRepository,
    PostgresDispatchLogRepository,
};
pub use template_repository::{PostgresTemplateRepository, TemplateRepository};
