//! # メッセージ
//!
//! レンダリング済みメッセージと添付ファイルを定義する。
//!
//! ## 設計方針
//!
//! - **1 回レンダリング・使い回し**: [`RenderedMessage`] は配送 1 回につき
//!   1 度だけ生成され、すべての宛先に対して再利用される。一括配送の全宛先に
//!   同一内容が送られることをデータ構造で保証する。
//! - **宛先非依存**: 宛先情報を一切含まない。

use bytes::Bytes;

/// 添付ファイル
///
/// アップロードされた添付ファイルの内容をメモリ上に保持する。
/// `Bytes` なので宛先ごとの再利用は参照カウントのみで済む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// 元のファイル名（メール上の表示名）
    pub file_name:    String,
    /// MIME タイプ（例: `application/pdf`）
    pub content_type: String,
    /// ファイル内容
    pub data:         Bytes,
}

/// レンダリング済みメッセージ
///
/// Message Renderer の出力。トランスポートに宛先とともに渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// 件名
    pub subject:    String,
    /// HTML 本文
    pub html_body:  String,
    /// 添付ファイル（任意）
    pub attachment: Option<Attachment>,
}
