//! # DispatchLogRepository
//!
//! 配送実行の履歴を記録するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 実行 1 行**: 配送 1 回の集計（総数・成功・不正・失敗）を記録する
//! - **記録失敗は致命的でない**: 書き込み失敗の扱いは呼び出し元が決める
//!   （配送結果そのものは失わない）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailflow_domain::dispatch::{DispatchReport, SendType};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 配送実行ログエンティティ
#[derive(Debug, Clone)]
pub struct DispatchLog {
    pub id: Uuid,
    pub send_type: SendType,
    pub subject: String,
    pub total: i32,
    pub sent: i32,
    pub invalid: i32,
    pub failed: i32,
    pub created_at: DateTime<Utc>,
}

/// カラム型 INTEGER に収まらない集計値は i32::MAX に飽和させる
fn saturate_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

impl DispatchLog {
    /// 配送レポートからログ行を作る
    pub fn from_report(send_type: SendType, subject: &str, report: &DispatchReport) -> Self {
        Self {
            id: Uuid::now_v7(),
            send_type,
            subject: subject.to_string(),
            total: saturate_count(report.total),
            sent: saturate_count(report.sent),
            invalid: saturate_count(report.invalid),
            failed: saturate_count(report.failed),
            created_at: Utc::now(),
        }
    }
}

/// 配送実行ログリポジトリトレイト
#[async_trait]
pub trait DispatchLogRepository: Send + Sync {
    /// ログ行を記録する
    async fn create(&self, log: &DispatchLog) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の DispatchLogRepository
#[derive(Debug, Clone)]
pub struct PostgresDispatchLogRepository {
    pool: PgPool,
}

impl PostgresDispatchLogRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchLogRepository for PostgresDispatchLogRepository {
    async fn create(&self, log: &DispatchLog) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO dispatch_logs
                (id, send_type, subject, total, sent, invalid, failed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(log.id)
        .bind(log.send_type.to_string())
        .bind(&log.subject)
        .bind(log.total)
        .bind(log.sent)
        .bind(log.invalid)
        .bind(log.failed)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mailflow_domain::{dispatch::DispatchReportBuilder, recipient::ValidatedRecipient};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_レポートからログ行を作れる() {
        let mut builder = DispatchReportBuilder::new();
        builder.record(
            &ValidatedRecipient::classify("a@example.com"),
            mailflow_domain::dispatch::DispatchOutcome::Sent,
        );
        let report = builder.finalize();

        let log = DispatchLog::from_report(SendType::Bulk, "お知らせ", &report);

        assert_eq!(log.total, 1);
        assert_eq!(log.sent, 1);
        assert_eq!(log.invalid, 0);
        assert_eq!(log.failed, 0);
        assert_eq!(log.subject, "お知らせ");
    }

    #[test]
    fn test_i32を超える集計値は飽和する() {
        assert_eq!(saturate_count(0), 0);
        assert_eq!(saturate_count(i32::MAX as usize), i32::MAX);
        assert_eq!(saturate_count(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(saturate_count(usize::MAX), i32::MAX);
    }
}
