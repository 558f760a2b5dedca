//! # アップロード保管
//!
//! リクエストで受け取ったファイルを一時的にローカルディスクへ置くモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `UploadStore` trait で保管先を抽象化
//! - **一時保管前提**: 配送処理の完了時に必ず削除される前提で、
//!   削除操作を first-class に持つ
//! - **衝突回避**: 保存名はタイムスタンプ + 元ファイル名で一意化する

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::InfraError;

/// 保管されたアップロードファイル
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// 保管先の絶対または相対パス
    pub path: PathBuf,
}

/// アップロード保管トレイト
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// ファイル内容を保管し、保管先を返す
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload, InfraError>;

    /// 保管済みファイルの内容を読み出す
    async fn read(&self, path: &Path) -> Result<Vec<u8>, InfraError>;

    /// 保管済みファイルを削除する
    async fn remove(&self, path: &Path) -> Result<(), InfraError>;
}

/// ローカルディスクへのアップロード保管
///
/// 指定ディレクトリ配下にファイルを書き込む。ディレクトリは
/// 初回保存時に作成される。
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    base_dir: PathBuf,
}

impl LocalUploadStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// タイムスタンプ付きの保存名を作る
    ///
    /// 同名ファイルの同時アップロードで上書きし合わないようにする。
    fn unique_name(&self, file_name: &str) -> String {
        let sanitized: String = file_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                other => other,
            })
            .collect();
        format!("{}-{}", Utc::now().timestamp_millis(), sanitized)
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload, InfraError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let path = self.base_dir.join(self.unique_name(file_name));
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "アップロードを保管");

        Ok(StoredUpload { path })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, InfraError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(bytes)
    }

    async fn remove(&self, path: &Path) -> Result<(), InfraError> {
        tokio::fs::remove_file(path).await?;
        tracing::debug!(path = %path.display(), "アップロードを削除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_store() -> LocalUploadStore {
        let dir = std::env::temp_dir().join(format!("mailflow-upload-test-{}", uuid::Uuid::now_v7()));
        LocalUploadStore::new(dir)
    }

    #[tokio::test]
    async fn test_保管したファイルを読み出せる() {
        let store = temp_store();

        let stored = store.store("list.txt", b"a@example.com\n").await.unwrap();
        let bytes = store.read(&stored.path).await.unwrap();

        assert_eq!(bytes, b"a@example.com\n");

        store.remove(&stored.path).await.unwrap();
    }

    #[tokio::test]
    async fn test_削除後は読み出せない() {
        let store = temp_store();

        let stored = store.store("list.txt", b"a@example.com\n").await.unwrap();
        store.remove(&stored.path).await.unwrap();

        let result = store.read(&stored.path).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_同名ファイルでも保存名が衝突しない() {
        let store = temp_store();

        let first = store.store("list.txt", b"1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.store("list.txt", b"2").await.unwrap();

        assert_ne!(first.path, second.path);

        store.remove(&first.path).await.unwrap();
        store.remove(&second.path).await.unwrap();
    }

    #[test]
    fn test_パス区切り文字は置換される() {
        let store = LocalUploadStore::new("/tmp");
        let name = store.unique_name("../etc/passwd");
        assert!(!name.contains('/'));
    }
}
