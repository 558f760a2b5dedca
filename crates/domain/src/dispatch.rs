//! # 配送
//!
//! 一括配送エンジンの中核となるドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 要件 |
//! |---|------------|------|
//! | [`DispatchRequest`] | 配送リクエスト | 1 回の配送呼び出しの入力。不変 |
//! | [`RecipientFile`] | 宛先リストファイル | 一時アップロード。配送終了時に必ず削除 |
//! | [`DispatchOutcome`] | 宛先ごとの結果 | Sent / Invalid / TransportFailure の 3 分類 |
//! | [`DispatchReport`] | 集計レポート | 送信ループ完了後に確定。以後は不変 |
//!
//! ## 設計方針
//!
//! - **結果のタグ付き union**: 宛先ごとの失敗を黙って握りつぶさず、
//!   [`DispatchOutcome`] としてレポートに残す
//! - **呼び出し中断とローカル回復の分離**: [`ExtractionError`] と
//!   [`RenderError`] は呼び出し全体を中断し、[`TransportError`] は
//!   宛先単位で回復してレポート項目になる
//! - **送信順の決定性**: 抽出順がそのまま送信順・レポート順になる

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Attachment;
use crate::recipient::ValidatedRecipient;

/// 配送種別
///
/// 単一宛先か、アップロードされた宛先リストへの一括配送か。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SendType {
    /// 単一宛先への配送
    Single,
    /// 宛先リストファイルへの一括配送
    Bulk,
}

/// 宛先リストファイルの形式
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipientFileFormat {
    /// 区切りテキスト（1 行 1 宛先。CSV/TSV の先頭カラムも可）
    Delimited,
    /// スプレッドシート（xlsx。先頭シートのみ読み取る）
    Spreadsheet,
}

impl RecipientFileFormat {
    /// MIME タイプとファイル名から形式を推定する
    ///
    /// MIME タイプを優先し、不明な場合は拡張子で判定する。
    /// どちらでも判定できない場合は区切りテキストとして扱う。
    pub fn from_hint(content_type: Option<&str>, file_name: &str) -> Self {
        if let Some(mime) = content_type {
            if mime.contains("spreadsheet") || mime.contains("ms-excel") {
                return Self::Spreadsheet;
            }
            if mime.starts_with("text/") {
                return Self::Delimited;
            }
        }

        let lower = file_name.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Self::Spreadsheet
        } else {
            Self::Delimited
        }
    }
}

/// 宛先リストファイル
///
/// アップロードされた一時ファイルへの参照。1 回の配送呼び出しが排他的に
/// 所有し、処理の成否にかかわらず呼び出し終了時に削除される
/// （一時ファイルを残さないことがこのコンポーネントの中心的な不変条件）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientFile {
    /// 保存先パス
    pub path:   PathBuf,
    /// ファイル形式
    pub format: RecipientFileFormat,
}

/// 配送リクエスト
///
/// 1 回の配送呼び出しの入力。受信時に 1 度だけ構築され、配送中は不変。
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// 単一配送の宛先アドレス（`send_type = Single` の場合に使用）
    pub recipient:  Option<String>,
    /// 件名（必須）
    pub subject:    String,
    /// 本文テキスト（必須）
    pub body_text:  String,
    /// 画像 URL（任意）
    pub image_url:  Option<String>,
    /// リンク URL（任意）
    pub link_url:   Option<String>,
    /// 添付ファイル（任意）
    pub attachment: Option<Attachment>,
    /// 配送種別
    pub send_type:  SendType,
}

/// 宛先ごとの配送結果
///
/// 送信ループが宛先 1 件ごとに確定する結果の 3 分類。
/// `Invalid` はエラーではなく分類である点に注意。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// トランスポートによる送信に成功した
    Sent,
    /// 構文チェックを通過せず、送信を試みなかった
    Invalid,
    /// 送信を試みたがトランスポートが失敗を返した
    TransportFailure {
        /// トランスポートが報告した失敗理由
        reason: String,
    },
}

/// レポート明細（宛先 1 件分）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchDetail {
    /// 宛先アドレス
    pub address: String,
    /// 配送結果
    pub outcome: DispatchOutcome,
}

/// 配送レポート
///
/// 送信ループ中に [`DispatchReportBuilder`] で逐次構築され、全宛先の処理後に
/// 確定して返される。確定後は変更されない。
///
/// シリアライズ形式:
/// `{ message, total, sent, invalid, failed, details: [{address, outcome}] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// 人間可読のサマリメッセージ
    pub message: String,
    /// 処理した宛先の総数
    pub total:   usize,
    /// 送信に成功した宛先数
    pub sent:    usize,
    /// 構文チェックで弾かれた宛先数
    pub invalid: usize,
    /// トランスポートが失敗を返した宛先数
    pub failed:  usize,
    /// 宛先ごとの明細（抽出順を保持）
    pub details: Vec<DispatchDetail>,
}

/// 配送レポートのビルダー
///
/// 送信ループが宛先ごとの結果を抽出順に積み上げ、[`finalize`](Self::finalize)
/// で確定する。
#[derive(Debug, Default)]
pub struct DispatchReportBuilder {
    details: Vec<DispatchDetail>,
    sent:    usize,
    invalid: usize,
    failed:  usize,
}

impl DispatchReportBuilder {
    /// 空のビルダーを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 宛先 1 件の結果を記録する
    ///
    /// 呼び出し順がそのままレポートの明細順になる。
    pub fn record(&mut self, recipient: &ValidatedRecipient, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => self.sent += 1,
            DispatchOutcome::Invalid => self.invalid += 1,
            DispatchOutcome::TransportFailure { .. } => self.failed += 1,
        }
        self.details.push(DispatchDetail {
            address: recipient.address.clone(),
            outcome,
        });
    }

    /// レポートを確定する
    pub fn finalize(self) -> DispatchReport {
        let total = self.details.len();
        let message = if total == 0 {
            "宛先が 0 件のため送信しませんでした".to_string()
        } else {
            format!(
                "配送が完了しました: 成功 {}/{}（不正 {} 件、失敗 {} 件）",
                self.sent, total, self.invalid, self.failed
            )
        };

        DispatchReport {
            message,
            total,
            sent: self.sent,
            invalid: self.invalid,
            failed: self.failed,
            details: self.details,
        }
    }
}

// ===== エラー分類 =====

/// 宛先抽出エラー
///
/// 宛先リストファイルが読めない・解析できない場合に使用する。
/// 抽出結果が 0 件であること自体はエラーではない。
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 一括配送なのに宛先リストファイルが添付されていない
    #[error("宛先リストファイルが指定されていません")]
    MissingFile,

    /// ファイルの読み込みに失敗
    #[error("宛先リストファイルを読み込めません: {0}")]
    Read(String),

    /// 宣言された形式として解析できない（破損アーカイブ、未対応エンコーディング等）
    #[error("宛先リストファイルの解析に失敗: {0}")]
    Parse(String),
}

/// レンダリングエラー
///
/// 件名または本文が欠けている場合のみ発生する。任意フィールド
/// （画像 URL・リンク URL・添付）の欠如はエラーにならない。
#[derive(Debug, Error)]
pub enum RenderError {
    /// 件名が未指定
    #[error("件名は必須です")]
    MissingSubject,

    /// 本文が未指定
    #[error("本文は必須です")]
    MissingBody,

    /// テンプレートエンジンの内部エラー
    #[error("メッセージの生成に失敗: {0}")]
    Template(String),
}

/// トランスポートエラー
///
/// 宛先 1 件への送信試行の失敗。呼び出し全体を中断せず、
/// [`DispatchOutcome::TransportFailure`] としてレポートに記録される。
#[derive(Debug, Error)]
pub enum TransportError {
    /// メッセージの組み立てに失敗（宛先アドレス不正など）
    #[error("メッセージ構築失敗: {0}")]
    InvalidMessage(String),

    /// 送信に失敗
    #[error("送信失敗: {0}")]
    SendFailed(String),
}

/// 配送呼び出し全体を中断するエラー
///
/// 抽出・レンダリングの失敗は宛先処理を開始できないため、部分レポートを
/// 返さず呼び出し元へ伝播する。
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 宛先抽出に失敗
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// レンダリングに失敗
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, "list.csv", RecipientFileFormat::Delimited)]
    #[case(None, "list.XLSX", RecipientFileFormat::Spreadsheet)]
    #[case(Some("text/csv"), "list", RecipientFileFormat::Delimited)]
    #[case(
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "list",
        RecipientFileFormat::Spreadsheet
    )]
    #[case(Some("application/vnd.ms-excel"), "list", RecipientFileFormat::Spreadsheet)]
    #[case(Some("application/octet-stream"), "list.xlsx", RecipientFileFormat::Spreadsheet)]
    #[case(Some("application/octet-stream"), "list.txt", RecipientFileFormat::Delimited)]
    fn test_形式推定(
        #[case] content_type: Option<&str>,
        #[case] file_name: &str,
        #[case] expected: RecipientFileFormat,
    ) {
        assert_eq!(
            RecipientFileFormat::from_hint(content_type, file_name),
            expected
        );
    }

    #[test]
    fn test_send_typeの文字列変換() {
        use std::str::FromStr;

        assert_eq!(SendType::Single.to_string(), "single");
        assert_eq!(SendType::Bulk.to_string(), "bulk");
        assert_eq!(SendType::from_str("bulk").unwrap(), SendType::Bulk);
    }

    fn classify(addr: &str) -> crate::recipient::ValidatedRecipient {
        crate::recipient::ValidatedRecipient::classify(addr)
    }

    #[test]
    fn test_builderがカウントを正しく集計する() {
        let mut builder = DispatchReportBuilder::new();
        builder.record(&classify("a@example.com"), DispatchOutcome::Sent);
        builder.record(&classify("broken"), DispatchOutcome::Invalid);
        builder.record(
            &classify("b@example.com"),
            DispatchOutcome::TransportFailure {
                reason: "接続失敗".to_string(),
            },
        );

        let report = builder.finalize();

        assert_eq!(report.total, 3);
        assert_eq!(report.sent, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.details.len(), 3);
        // 記録順がそのまま明細順になる
        assert_eq!(report.details[0].address, "a@example.com");
        assert_eq!(report.details[1].address, "broken");
        assert_eq!(report.details[2].address, "b@example.com");
    }

    #[test]
    fn test_宛先0件のレポート() {
        let report = DispatchReportBuilder::new().finalize();
        assert_eq!(report.total, 0);
        assert_eq!(report.message, "宛先が 0 件のため送信しませんでした");
    }

    #[test]
    fn test_レポートのシリアライズ形状() {
        let mut builder = DispatchReportBuilder::new();
        builder.record(&classify("a@example.com"), DispatchOutcome::Sent);
        builder.record(
            &classify("b@example.com"),
            DispatchOutcome::TransportFailure {
                reason: "SMTP 接続失敗".to_string(),
            },
        );
        let report = builder.finalize();

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total"], 2);
        assert_eq!(json["sent"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["details"][0]["address"], "a@example.com");
        assert_eq!(json["details"][0]["outcome"]["status"], "sent");
        assert_eq!(
            json["details"][1]["outcome"]["status"],
            "transport_failure"
        );
        assert_eq!(json["details"][1]["outcome"]["reason"], "SMTP 接続失敗");
    }

    #[test]
    fn test_dispatch_errorへの変換() {
        let err: DispatchError = ExtractionError::MissingFile.into();
        assert!(matches!(err, DispatchError::Extraction(_)));

        let err: DispatchError = RenderError::MissingSubject.into();
        assert!(matches!(err, DispatchError::Render(_)));
    }
}
