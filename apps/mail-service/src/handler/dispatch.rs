//! # 配送ハンドラ
//!
//! 配送呼び出しのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/dispatch` - 配送実行（multipart/form-data）
//!
//! ## multipart フィールド
//!
//! | フィールド | 必須 | 内容 |
//! |-----------|------|------|
//! | `sendType` | ○ | `single` または `bulk` |
//! | `subject` | ○ | 件名 |
//! | `message` | ○ | 本文テキスト |
//! | `email` | single のみ | 宛先アドレス |
//! | `file` | bulk のみ | 宛先リストファイル（txt/csv/xlsx） |
//! | `imageUrl` | - | 本文に埋め込む画像 URL |
//! | `linkUrl` | - | 本文に埋め込むリンク URL |
//! | `attachment` | - | 添付ファイル |
//!
//! 宛先リストファイルは受信時に一時保存され、配送ユースケースが
//! 処理の成否にかかわらず削除する。リクエスト検証エラーで
//! ユースケースに渡らなかった場合はハンドラ側で削除する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
};
use bytes::Bytes;
use mailflow_domain::{
    dispatch::{DispatchReport, DispatchRequest, RecipientFile, RecipientFileFormat, SendType},
    message::Attachment,
};
use mailflow_infra::UploadStore;
use mailflow_shared::ApiResponse;

use crate::{error::ApiError, usecase::DispatchUseCase};

/// 配送ハンドラの共有状態
pub struct DispatchState {
    pub usecase:      Arc<dyn DispatchUseCase>,
    pub upload_store: Arc<dyn UploadStore>,
}

/// multipart から組み立てた配送入力
#[derive(Default)]
struct DispatchForm {
    recipient:  Option<String>,
    subject:    Option<String>,
    body_text:  Option<String>,
    image_url:  Option<String>,
    link_url:   Option<String>,
    attachment: Option<Attachment>,
    send_type:  Option<SendType>,
    file:       Option<RecipientFile>,
}

/// 空文字列を None に落とす（未入力のフォームフィールド対策）
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn read_form(
    upload_store: &dyn UploadStore,
    mut multipart: Multipart,
    form: &mut DispatchForm,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart の読み取りに失敗: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "email" => form.recipient = non_empty(field.text().await.map_err(bad_field)?),
            "subject" => form.subject = Some(field.text().await.map_err(bad_field)?),
            "message" => form.body_text = Some(field.text().await.map_err(bad_field)?),
            "imageUrl" => form.image_url = non_empty(field.text().await.map_err(bad_field)?),
            "linkUrl" => form.link_url = non_empty(field.text().await.map_err(bad_field)?),
            "sendType" => {
                let value = field.text().await.map_err(bad_field)?;
                let send_type = value.parse::<SendType>().map_err(|_| {
                    ApiError::BadRequest(format!("不正な sendType です: {value}"))
                })?;
                form.send_type = Some(send_type);
            }
            "file" => {
                // ファイル未選択のフォームは空の file パートを送ることがある
                let file_name = match field.file_name() {
                    Some(n) if !n.is_empty() => n.to_string(),
                    _ => continue,
                };
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_field)?;

                let format = RecipientFileFormat::from_hint(content_type.as_deref(), &file_name);
                let stored = upload_store.store(&file_name, &bytes).await?;
                form.file = Some(RecipientFile {
                    path: stored.path,
                    format,
                });
            }
            "attachment" => {
                let file_name = match field.file_name() {
                    Some(n) if !n.is_empty() => n.to_string(),
                    _ => continue,
                };
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data: Bytes = field.bytes().await.map_err(bad_field)?;
                form.attachment = Some(Attachment {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(())
}

/// 配送ユースケースに渡らなかった一時ファイルを削除する
///
/// リクエスト検証エラーで 400 を返すケース。削除失敗は記録のみ。
async fn discard_upload(upload_store: &dyn UploadStore, file: Option<RecipientFile>) {
    let Some(file) = file else {
        return;
    };
    if let Err(e) = upload_store.remove(&file.path).await {
        tracing::warn!(
            path = %file.path.display(),
            error = %e,
            "一時ファイルの削除に失敗"
        );
    }
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("multipart フィールドの読み取りに失敗: {e}"))
}

/// POST /api/dispatch
///
/// multipart を解釈して配送ユースケースを呼び出し、集計レポートを返す。
/// 宛先ごとの失敗はエラーにならずレポートの明細に現れる。
pub async fn execute_dispatch(
    State(state): State<Arc<DispatchState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<DispatchReport>>, ApiError> {
    let mut form = DispatchForm::default();
    if let Err(e) = read_form(state.upload_store.as_ref(), multipart, &mut form).await {
        discard_upload(state.upload_store.as_ref(), form.file).await;
        return Err(e);
    }

    let Some(send_type) = form.send_type else {
        discard_upload(state.upload_store.as_ref(), form.file).await;
        return Err(ApiError::BadRequest("sendType は必須です".to_string()));
    };

    let request = DispatchRequest {
        recipient: form.recipient,
        subject: form.subject.unwrap_or_default(),
        body_text: form.body_text.unwrap_or_default(),
        image_url: form.image_url,
        link_url: form.link_url,
        attachment: form.attachment,
        send_type,
    };

    let report = state.usecase.dispatch(request, form.file).await?;
    Ok(Json(ApiResponse::new(report)))
}
