//! # メッセージテンプレート
//!
//! 再利用可能なメッセージテンプレートのエンティティを定義する。
//!
//! 件名と本文のみを持つ単純な保存単位。配送時のレンダリングとは独立しており、
//! テンプレートの保存・一覧は配送エンジンの外部協調コンポーネントにあたる。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

define_uuid_id! {
    /// テンプレート ID（一意識別子）
    pub struct TemplateId;
}

/// メッセージテンプレート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// テンプレート ID
    pub id:         TemplateId,
    /// 件名
    pub subject:    String,
    /// 本文
    pub content:    String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// 新しいテンプレートを作成する
    ///
    /// 件名と本文の両方が必須（trim 後に空でないこと）。
    pub fn new(
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let subject = subject.into().trim().to_string();
        let content = content.into().trim().to_string();

        if subject.is_empty() {
            return Err(DomainError::Validation("件名は必須です".to_string()));
        }
        if content.is_empty() {
            return Err(DomainError::Validation("本文は必須です".to_string()));
        }

        Ok(Self {
            id: TemplateId::new(),
            subject,
            content,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_テンプレートを作成できる() {
        let template = Template::new("お知らせ", "本文です").unwrap();
        assert_eq!(template.subject, "お知らせ");
        assert_eq!(template.content, "本文です");
    }

    #[test]
    fn test_件名が空ならエラー() {
        assert!(Template::new("  ", "本文").is_err());
    }

    #[test]
    fn test_本文が空ならエラー() {
        assert!(Template::new("件名", "").is_err());
    }
}
