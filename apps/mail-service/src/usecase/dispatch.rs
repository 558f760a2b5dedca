//! # 配送ユースケース
//!
//! 1 回の配送呼び出しを最初から最後まで取り仕切るコーディネータ。
//!
//! ## 処理の流れ
//!
//! ```text
//! 受信 → 抽出 → 分類 → レンダリング（1 回） → 逐次送信 → レポート確定
//! ```
//!
//! ## 不変条件
//!
//! - レンダリングは配送 1 回につき 1 度だけ。全宛先が同一内容を受け取る
//! - 宛先 1 件の送信失敗は他の宛先の処理を止めない
//! - 抽出順がそのまま送信順・レポート明細順になる
//! - アップロードされた宛先リストファイルは、成功・抽出失敗・レンダリング
//!   失敗のいずれの経路でも呼び出し終了時に削除される
//! - 実行ログの書き込み失敗は配送結果を失わせない（記録して握りつぶす）

pub mod renderer;

use std::sync::Arc;

use async_trait::async_trait;
use mailflow_domain::{
    dispatch::{
        DispatchOutcome,
        DispatchReport,
        DispatchReportBuilder,
        DispatchRequest,
        ExtractionError,
        RecipientFile,
        SendType,
    },
    recipient::ValidatedRecipient,
};
use mailflow_infra::{
    MailTransport,
    RecipientExtractor,
    UploadStore,
    repository::{DispatchLog, DispatchLogRepository},
};
use mailflow_shared::{event_log::event, log_business_event};
pub use renderer::{MessageRenderer, TeraMessageRenderer};

use crate::error::ApiError;

/// 配送ユースケーストレイト
#[async_trait]
pub trait DispatchUseCase: Send + Sync {
    /// 配送を実行し、集計レポートを返す
    ///
    /// `file` は一括配送の宛先リストファイル。渡された場合、処理の成否に
    /// かかわらず呼び出し終了時に削除される。
    async fn dispatch(
        &self,
        request: DispatchRequest,
        file: Option<RecipientFile>,
    ) -> Result<DispatchReport, ApiError>;
}

/// 配送ユースケースの実装
pub struct DispatchUseCaseImpl {
    extractor:               RecipientExtractor,
    renderer:                Arc<dyn MessageRenderer>,
    transport:               Arc<dyn MailTransport>,
    upload_store:            Arc<dyn UploadStore>,
    dispatch_log_repository: Arc<dyn DispatchLogRepository>,
}

impl DispatchUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        renderer: Arc<dyn MessageRenderer>,
        transport: Arc<dyn MailTransport>,
        upload_store: Arc<dyn UploadStore>,
        dispatch_log_repository: Arc<dyn DispatchLogRepository>,
    ) -> Self {
        Self {
            extractor: RecipientExtractor::new(),
            renderer,
            transport,
            upload_store,
            dispatch_log_repository,
        }
    }

    /// 宛先候補を収集する
    ///
    /// 単一配送はリクエストの宛先 1 件（未指定なら空文字列 1 件。分類で
    /// 不正と判定され、レポートに残る）。一括配送はファイルから抽出する。
    async fn collect_candidates(
        &self,
        request: &DispatchRequest,
        file: Option<&RecipientFile>,
    ) -> Result<Vec<String>, ApiError> {
        match request.send_type {
            SendType::Single => Ok(vec![request.recipient.clone().unwrap_or_default()]),
            SendType::Bulk => {
                let file = file.ok_or(ExtractionError::MissingFile)?;
                let bytes = self
                    .upload_store
                    .read(&file.path)
                    .await
                    .map_err(|e| ExtractionError::Read(e.to_string()))?;
                let candidates = self.extractor.extract(&bytes, file.format)?;
                Ok(candidates)
            }
        }
    }

    /// 抽出からレポート確定までの本体
    ///
    /// 一時ファイルの削除は [`DispatchUseCase::dispatch`] 側で行うため、
    /// ここでは途中で `?` で抜けてよい。
    async fn run(
        &self,
        request: &DispatchRequest,
        file: Option<&RecipientFile>,
    ) -> Result<DispatchReport, ApiError> {
        let candidates = self.collect_candidates(request, file).await?;

        let recipients: Vec<ValidatedRecipient> = candidates
            .into_iter()
            .map(ValidatedRecipient::classify)
            .collect();

        // レンダリングは宛先ループの前に 1 回だけ
        let message = self.renderer.render(request)?;

        let mut builder = DispatchReportBuilder::new();
        for recipient in &recipients {
            if !recipient.valid {
                builder.record(recipient, DispatchOutcome::Invalid);
                continue;
            }

            match self.transport.send(&recipient.address, &message).await {
                Ok(()) => builder.record(recipient, DispatchOutcome::Sent),
                Err(e) => {
                    tracing::warn!(to = %recipient.address, error = %e, "宛先への送信に失敗");
                    builder.record(
                        recipient,
                        DispatchOutcome::TransportFailure {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        let report = builder.finalize();

        // 実行ログの書き込み失敗で配送結果を失わせない
        let log = DispatchLog::from_report(request.send_type, &request.subject, &report);
        if let Err(e) = self.dispatch_log_repository.create(&log).await {
            tracing::warn!(error = %e, "配送ログの書き込みに失敗");
        }

        log_business_event!(
            event.category = event::category::DISPATCH,
            event.action = event::action::DISPATCH_COMPLETED,
            event.result = event::result::SUCCESS,
            dispatch.send_type = %request.send_type,
            dispatch.total = report.total,
            dispatch.sent = report.sent,
            dispatch.invalid = report.invalid,
            dispatch.failed = report.failed,
            "配送が完了しました"
        );

        Ok(report)
    }
}

#[async_trait]
impl DispatchUseCase for DispatchUseCaseImpl {
    async fn dispatch(
        &self,
        request: DispatchRequest,
        file: Option<RecipientFile>,
    ) -> Result<DispatchReport, ApiError> {
        let result = self.run(&request, file.as_ref()).await;

        // 成否にかかわらず一時ファイルを削除する。削除失敗は配送結果を
        // 置き換えない（記録のみ）
        if let Some(file) = &file {
            if let Err(e) = self.upload_store.remove(&file.path).await {
                tracing::warn!(
                    path = %file.path.display(),
                    error = %e,
                    "一時ファイルの削除に失敗"
                );
            }
        }

        result
    }
}
