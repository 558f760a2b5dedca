//! # アカウント
//!
//! 配送 API を利用するアカウントのエンティティを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: `AccountId` は UUID v7 をラップし、型安全性を確保
//! - **パスワードはハッシュのみ保持**: 平文は [`crate::password::PlainPassword`]
//!   としてユースケース層を通過するだけで、エンティティには入らない

use chrono::{DateTime, Utc};

use crate::{DomainError, password::PasswordHash, recipient::Email};

define_uuid_id! {
    /// アカウント ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct AccountId;
}

/// アカウント名
///
/// 表示用の名前。trim 後に空でないこと、100 文字以内であることを要求する。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccountName(String);

impl AccountName {
    /// アカウント名を作成する
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("アカウント名は必須です".to_string()));
        }

        if value.chars().count() > 100 {
            return Err(DomainError::Validation(
                "アカウント名は 100 文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// アカウント
///
/// メール配送 API の利用者。メールアドレスで一意に識別される。
#[derive(Debug, Clone)]
pub struct Account {
    id:            AccountId,
    email:         Email,
    name:          AccountName,
    password_hash: PasswordHash,
    created_at:    DateTime<Utc>,
}

impl Account {
    /// 新規アカウントを作成する
    pub fn new(
        id: AccountId,
        email: Email,
        name: AccountName,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            created_at,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
