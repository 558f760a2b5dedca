//! # AccountRepository
//!
//! アカウント情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **メールアドレス一意**: `accounts.email` に UNIQUE 制約があり、
//!   重複登録の最終防衛線はデータベースが担う
//! - **実行時検証クエリ**: `sqlx::query` / `query_as` を使用し、
//!   接続先なしでビルド可能に保つ

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailflow_domain::{
    account::{Account, AccountId, AccountName},
    password::PasswordHash,
    recipient::Email,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// accounts テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, InfraError> {
        Ok(Account::new(
            AccountId::from_uuid(self.id),
            Email::new(&self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            AccountName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            PasswordHash::new(self.password_hash),
            self.created_at,
        ))
    }
}

/// アカウントリポジトリトレイト
///
/// アカウント情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// メールアドレスでアカウントを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(account))`: アカウントが見つかった場合
    /// - `Ok(None)`: アカウントが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, InfraError>;

    /// アカウントを作成
    async fn create(&self, account: &Account) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, InfraError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id,
                email,
                name,
                password_hash,
                created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(&self, account: &Account) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.email().as_str())
        .bind(account.name().as_str())
        .bind(account.password_hash().as_str())
        .bind(account.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresAccountRepository>();
    }
}
