//! 配送フロー統合テスト
//!
//! 実際のローカルディスク（一時ディレクトリ）とテンプレートエンジンを使用し、
//! 受信から集計レポートまでの一連のフローをテストする。
//! メール送信のみモックを使用する。
//!
//! ## 実行方法
//!
//! ```bash
//! cargo test -p mailflow-mail-service --test dispatch_flow_test
//! ```
//!
//! ## テストケース
//!
//! - 一括配送: 抽出 → 検証 → レンダリング → 送信 → 集計の一連フロー
//! - 宛先ごとの失敗分離（不正アドレス・送信失敗が他の宛先を止めない）
//! - 一時ファイルが成功時・抽出失敗時ともにディスクから消えること

use std::sync::Arc;

use mailflow_domain::dispatch::{
    DispatchOutcome,
    DispatchRequest,
    RecipientFile,
    RecipientFileFormat,
    SendType,
};
use mailflow_infra::{
    UploadStore,
    mock::{MockDispatchLogRepository, MockMailTransport},
    upload::LocalUploadStore,
};
use mailflow_mail_service::usecase::{DispatchUseCase, DispatchUseCaseImpl, TeraMessageRenderer};
use pretty_assertions::assert_eq;

/// テストごとに独立した一時ディレクトリの保管を作る
fn temp_upload_store() -> LocalUploadStore {
    let dir = std::env::temp_dir().join(format!("mailflow-dispatch-test-{}", uuid::Uuid::now_v7()));
    LocalUploadStore::new(dir)
}

fn bulk_request() -> DispatchRequest {
    DispatchRequest {
        recipient:  None,
        subject:    "キャンペーンのお知らせ".to_string(),
        body_text:  "本文テキストです。".to_string(),
        image_url:  Some("https://example.com/banner.png".to_string()),
        link_url:   Some("https://example.com/campaign".to_string()),
        attachment: None,
        send_type:  SendType::Bulk,
    }
}

struct Harness {
    store:     Arc<LocalUploadStore>,
    transport: MockMailTransport,
    sut:       DispatchUseCaseImpl,
}

fn harness() -> Harness {
    let store = Arc::new(temp_upload_store());
    let transport = MockMailTransport::new();
    let sut = DispatchUseCaseImpl::new(
        Arc::new(TeraMessageRenderer::new().unwrap()),
        Arc::new(transport.clone()),
        store.clone(),
        Arc::new(MockDispatchLogRepository::new()),
    );
    Harness {
        store,
        transport,
        sut,
    }
}

async fn store_file(h: &Harness, name: &str, content: &[u8]) -> RecipientFile {
    let stored = h.store.store(name, content).await.unwrap();
    RecipientFile {
        path:   stored.path,
        format: RecipientFileFormat::from_hint(None, name),
    }
}

#[tokio::test]
async fn test_一括配送の一連フロー() {
    // Given: 有効 2 件と不正 1 件の宛先リスト
    let h = harness();
    let file = store_file(&h, "list.csv", b"a@example.com\nbroken\nb@example.com\n").await;
    let path = file.path.clone();

    // When
    let report = h.sut.dispatch(bulk_request(), Some(file)).await.unwrap();

    // Then: 集計
    assert_eq!(report.total, 3);
    assert_eq!(report.sent, 2);
    assert_eq!(report.invalid, 1);
    assert_eq!(report.failed, 0);

    // 全宛先が同一のレンダリング結果を受け取り、本文に画像とリンクが入る
    let sent = h.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, sent[1].1);
    assert!(sent[0].1.html_body.contains("https://example.com/banner.png"));
    assert!(sent[0].1.html_body.contains("https://example.com/campaign"));

    // 一時ファイルはディスクから消えている
    assert!(!path.exists());
}

#[tokio::test]
async fn test_送信失敗が他の宛先を止めない() {
    // Given
    let h = harness();
    let file = store_file(&h, "list.txt", b"a@example.com\nb@example.com\nc@example.com\n").await;
    h.transport.fail_for("b@example.com", "SMTP 接続失敗");

    // When
    let report = h.sut.dispatch(bulk_request(), Some(file)).await.unwrap();

    // Then: b の失敗後も c は送信される
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.details[2].address, "c@example.com");
    assert_eq!(report.details[2].outcome, DispatchOutcome::Sent);
}

#[tokio::test]
async fn test_抽出失敗でも一時ファイルがディスクから消える() {
    // Given: xlsx として解析できないファイル
    let h = harness();
    let file = store_file(&h, "list.xlsx", b"not a real xlsx").await;
    let path = file.path.clone();

    // When
    let result = h.sut.dispatch(bulk_request(), Some(file)).await;

    // Then
    assert!(result.is_err());
    assert!(!path.exists());
    assert_eq!(h.transport.attempt_count(), 0);
}

#[tokio::test]
async fn test_単一配送はファイルなしで完結する() {
    let h = harness();
    let request = DispatchRequest {
        recipient: Some("user@example.com".to_string()),
        send_type: SendType::Single,
        ..bulk_request()
    };

    let report = h.sut.dispatch(request, None).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.sent, 1);
    assert_eq!(h.transport.sent()[0].0, "user@example.com");
}
