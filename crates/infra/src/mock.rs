//! # テスト用モック実装
//!
//! ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use mailflow_domain::{
    account::Account,
    dispatch::TransportError,
    message::RenderedMessage,
    recipient::Email,
    template::Template,
};
use uuid::Uuid;

use crate::{
    error::InfraError,
    repository::{AccountRepository, DispatchLog, DispatchLogRepository, TemplateRepository},
    session::{SessionData, SessionManager},
    transport::MailTransport,
    upload::{StoredUpload, UploadStore},
};

// ===== MockMailTransport =====

/// インメモリのメール送信モック
///
/// 送信されたメッセージを記録し、指定した宛先への送信を失敗させられる。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    sent:     Arc<Mutex<Vec<(String, RenderedMessage)>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    attempts: Arc<Mutex<usize>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>, reason: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(address.into(), reason.into());
    }

    /// 送信されたメッセージの記録を取得する
    pub fn sent(&self) -> Vec<(String, RenderedMessage)> {
        self.sent.lock().unwrap().clone()
    }

    /// 送信試行の回数を取得する（失敗した試行も含む）
    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, to: &str, message: &RenderedMessage) -> Result<(), TransportError> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(reason) = self.failures.lock().unwrap().get(to) {
            return Err(TransportError::SendFailed(reason.clone()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), message.clone()));
        Ok(())
    }
}

// ===== MockAccountRepository =====

#[derive(Clone, Default)]
pub struct MockAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, account: Account) {
        self.accounts.lock().unwrap().push(account);
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, InfraError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email() == email)
            .cloned())
    }

    async fn create(&self, account: &Account) -> Result<(), InfraError> {
        self.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }
}

// ===== MockTemplateRepository =====

#[derive(Clone, Default)]
pub struct MockTemplateRepository {
    templates: Arc<Mutex<Vec<Template>>>,
}

impl MockTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for MockTemplateRepository {
    async fn create(&self, template: &Template) -> Result<(), InfraError> {
        self.templates.lock().unwrap().push(template.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Template>, InfraError> {
        let mut templates = self.templates.lock().unwrap().clone();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }
}

// ===== MockDispatchLogRepository =====

#[derive(Clone, Default)]
pub struct MockDispatchLogRepository {
    logs: Arc<Mutex<Vec<DispatchLog>>>,
}

impl MockDispatchLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> Vec<DispatchLog> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl DispatchLogRepository for MockDispatchLogRepository {
    async fn create(&self, log: &DispatchLog) -> Result<(), InfraError> {
        self.logs.lock().unwrap().push(log.clone());
        Ok(())
    }
}

// ===== MockSessionManager =====

/// インメモリのセッション管理モック
#[derive(Clone, Default)]
pub struct MockSessionManager {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MockSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既知のセッション ID でセッションを登録する（テストの事前条件用）
    pub fn insert(&self, session_id: impl Into<String>, data: SessionData) {
        self.sessions.lock().unwrap().insert(session_id.into(), data);
    }
}

#[async_trait]
impl SessionManager for MockSessionManager {
    async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.clone(), data.clone());
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

// ===== MockUploadStore =====

/// インメモリのアップロード保管モック
///
/// 保管内容と削除履歴を記録し、クリーンアップ保証のテストに使用する。
#[derive(Clone, Default)]
pub struct MockUploadStore {
    files:   Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 削除されたパスの履歴を取得する
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }

    /// 保管中のファイル数を取得する
    pub fn stored_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadStore for MockUploadStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload, InfraError> {
        let path = PathBuf::from(format!("mock://{}-{file_name}", Uuid::now_v7()));
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), bytes.to_vec());
        Ok(StoredUpload { path })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, InfraError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                InfraError::from(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("ファイルが存在しません: {}", path.display()),
                ))
            })
    }

    async fn remove(&self, path: &Path) -> Result<(), InfraError> {
        let existed = self.files.lock().unwrap().remove(path).is_some();
        self.removed.lock().unwrap().push(path.to_path_buf());
        if existed {
            Ok(())
        } else {
            Err(InfraError::from(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("ファイルが存在しません: {}", path.display()),
            )))
        }
    }
}
