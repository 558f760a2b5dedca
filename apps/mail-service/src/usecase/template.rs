//! # テンプレートユースケース
//!
//! メッセージテンプレートの作成と一覧取得を実装する。
//! テンプレートは件名・本文の定型文であり、配送リクエストの下書きとして使う。

use std::sync::Arc;

use async_trait::async_trait;
use mailflow_domain::template::Template;
use mailflow_infra::repository::TemplateRepository;
use mailflow_shared::{event_log::event, log_business_event};

use crate::error::ApiError;

/// テンプレートユースケーストレイト
#[async_trait]
pub trait TemplateUseCase: Send + Sync {
    /// テンプレートを作成する
    async fn create(&self, subject: &str, content: &str) -> Result<Template, ApiError>;

    /// テンプレートを作成日時の降順で一覧する
    async fn list(&self) -> Result<Vec<Template>, ApiError>;
}

/// テンプレートユースケースの実装
pub struct TemplateUseCaseImpl {
    template_repository: Arc<dyn TemplateRepository>,
}

impl TemplateUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(template_repository: Arc<dyn TemplateRepository>) -> Self {
        Self {
            template_repository,
        }
    }
}

#[async_trait]
impl TemplateUseCase for TemplateUseCaseImpl {
    async fn create(&self, subject: &str, content: &str) -> Result<Template, ApiError> {
        let template = Template::new(subject, content)?;
        self.template_repository.create(&template).await?;

        log_business_event!(
            event.category = event::category::TEMPLATE,
            event.action = event::action::TEMPLATE_CREATED,
            event.result = event::result::SUCCESS,
            template.id = %template.id,
            "テンプレートを作成しました"
        );

        Ok(template)
    }

    async fn list(&self) -> Result<Vec<Template>, ApiError> {
        Ok(self.template_repository.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use mailflow_domain::DomainError;
    use mailflow_infra::mock::MockTemplateRepository;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_テンプレートを作成できる() {
        // Given
        let repo = MockTemplateRepository::new();
        let sut = TemplateUseCaseImpl::new(Arc::new(repo.clone()));

        // When
        let template = sut.create("お知らせ", "本文テキスト").await.unwrap();

        // Then
        assert_eq!(template.subject, "お知らせ");
        assert_eq!(template.content, "本文テキスト");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_件名が空ならvalidationエラー() {
        let sut = TemplateUseCaseImpl::new(Arc::new(MockTemplateRepository::new()));

        let result = sut.create("   ", "本文").await;

        assert!(matches!(
            result,
            Err(ApiError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_一覧は作成日時の降順() {
        // Given
        let repo = MockTemplateRepository::new();
        let sut = TemplateUseCaseImpl::new(Arc::new(repo));
        sut.create("最初", "本文 1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        sut.create("あと", "本文 2").await.unwrap();

        // When
        let templates = sut.list().await.unwrap();

        // Then
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].subject, "あと");
        assert_eq!(templates[1].subject, "最初");
    }
}
