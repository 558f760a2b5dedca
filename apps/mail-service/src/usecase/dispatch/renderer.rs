//! # メッセージレンダラー
//!
//! tera テンプレートエンジンで配送メッセージの HTML 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **1 配送 1 回**: レンダリングは宛先に依存せず、配送 1 回につき 1 度だけ
//!   実行される。呼び出し側は結果の [`RenderedMessage`] を全宛先で再利用する
//! - **任意フィールドは省略可**: 画像 URL・リンク URL・添付がなくてもエラーにしない

use mailflow_domain::{
    dispatch::{DispatchRequest, RenderError},
    message::RenderedMessage,
};
use tera::{Context, Tera};

/// メッセージレンダラートレイト
///
/// 配送リクエストから宛先非依存の [`RenderedMessage`] を生成する。
pub trait MessageRenderer: Send + Sync {
    /// メッセージを生成する
    ///
    /// # エラー
    ///
    /// 件名または本文が欠けている場合のみ [`RenderError`] を返す。
    fn render(&self, request: &DispatchRequest) -> Result<RenderedMessage, RenderError>;
}

/// tera によるメッセージレンダラーの実装
pub struct TeraMessageRenderer {
    engine: Tera,
}

impl TeraMessageRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, RenderError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![(
                "message.html",
                include_str!("../../../templates/message.html"),
            )])
            .map_err(|e| RenderError::Template(e.to_string()))?;

        Ok(Self { engine })
    }
}

impl MessageRenderer for TeraMessageRenderer {
    fn render(&self, request: &DispatchRequest) -> Result<RenderedMessage, RenderError> {
        let subject = request.subject.trim();
        if subject.is_empty() {
            return Err(RenderError::MissingSubject);
        }

        let body_text = request.body_text.trim();
        if body_text.is_empty() {
            return Err(RenderError::MissingBody);
        }

        let mut context = Context::new();
        context.insert("body_text", body_text);
        context.insert("image_url", &request.image_url);
        context.insert("link_url", &request.link_url);

        let html_body = self
            .engine
            .render("message.html", &context)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        Ok(RenderedMessage {
            subject: subject.to_string(),
            html_body,
            attachment: request.attachment.clone(),
        })
    }
}
