//! # TemplateRepository
//!
//! メッセージテンプレートの永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailflow_domain::template::{Template, TemplateId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// templates テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    subject: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Template {
            id:         TemplateId::from_uuid(row.id),
            subject:    row.subject,
            content:    row.content,
            created_at: row.created_at,
        }
    }
}

/// テンプレートリポジトリトレイト
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// テンプレートを保存
    async fn create(&self, template: &Template) -> Result<(), InfraError>;

    /// 保存済みテンプレートの一覧を取得（新しい順）
    async fn find_all(&self) -> Result<Vec<Template>, InfraError>;
}

/// PostgreSQL 実装の TemplateRepository
#[derive(Debug, Clone)]
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn create(&self, template: &Template) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO templates (id, subject, content, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(template.id.as_uuid())
        .bind(&template.subject)
        .bind(&template.content)
        .bind(template.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Template>, InfraError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT
                id,
                subject,
                content,
                created_at
            FROM templates
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Template::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresTemplateRepository>();
    }
}
