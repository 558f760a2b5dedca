//! # 認証ユースケース
//!
//! アカウント登録・サインイン・サインアウトを実装する。
//! 認証に成功するとセッションを作成し、セッション ID をトークンとして返す。
//!
//! ## タイミング攻撃対策
//!
//! サインインでは、アカウントが存在しない場合もダミーハッシュで
//! 検証を実行し、処理時間を均一化する。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mailflow_domain::{
    DomainError,
    account::{Account, AccountId, AccountName},
    password::{PasswordHash, PlainPassword},
    recipient::Email,
};
use mailflow_infra::{
    PasswordHasher,
    SessionData,
    SessionManager,
    repository::AccountRepository,
};
use mailflow_shared::{event_log::event, log_business_event};

use crate::error::ApiError;

/// 認証済みアカウント
///
/// サインアップ・サインイン成功時の戻り値。`session_id` が以降の
/// リクエストの Bearer トークンになる。
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub session_id: String,
    pub account_id: AccountId,
    pub name:       String,
    pub email:      String,
}

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// アカウントを登録し、セッションを開始する
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, ApiError>;

    /// サインインし、セッションを開始する
    async fn signin(&self, email: &str, password: &str)
    -> Result<AuthenticatedAccount, ApiError>;

    /// セッションを破棄する
    ///
    /// 存在しないセッション ID でも成功とする（冪等）。
    async fn signout(&self, session_id: &str) -> Result<(), ApiError>;
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    account_repository: Arc<dyn AccountRepository>,
    password_hasher:    Arc<dyn PasswordHasher>,
    session_manager:    Arc<dyn SessionManager>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_manager: Arc<dyn SessionManager>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            session_manager,
        }
    }

    /// セッションを開始し、認証済みアカウントを返す
    async fn start_session(&self, account: &Account) -> Result<AuthenticatedAccount, ApiError> {
        let data = SessionData::new(account.id().clone(), account.email().as_str().to_string());
        let session_id = self.session_manager.create(&data).await?;

        Ok(AuthenticatedAccount {
            session_id,
            account_id: account.id().clone(),
            name: account.name().as_str().to_string(),
            email: account.email().as_str().to_string(),
        })
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// アカウントが存在しない場合も実際のパスワード検証と同等の時間を
    /// 消費する。固定 sleep ではなく実際に Argon2id 検証を実行することで、
    /// CPU/メモリ状況による自然な変動も含めて同じ時間特性になる。
    fn dummy_verification(&self, password: &PlainPassword) {
        // ダミーハッシュ（有効な Argon2id 形式）
        let dummy_hash = PasswordHash::new(
            "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        );
        // 結果は無視（エラーでも問題ない）
        let _ = self.password_hasher.verify(password, &dummy_hash);
    }
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, ApiError> {
        let name = AccountName::new(name)?;
        let email = Email::new(email)?;

        if self.account_repository.find_by_email(&email).await?.is_some() {
            log_business_event!(
                event.category = event::category::AUTH,
                event.action = event::action::SIGNUP_FAILURE,
                event.result = event::result::FAILURE,
                "メールアドレスが既に登録されています"
            );
            return Err(DomainError::Conflict(
                "このメールアドレスは既に登録されています".to_string(),
            )
            .into());
        }

        let password_hash = self.password_hasher.hash(&PlainPassword::new(password))?;
        let account = Account::new(AccountId::new(), email, name, password_hash, Utc::now());
        self.account_repository.create(&account).await?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::SIGNUP_SUCCESS,
            event.result = event::result::SUCCESS,
            account.id = %account.id(),
            "アカウントを登録しました"
        );

        self.start_session(&account).await
    }

    async fn signin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, ApiError> {
        let plain_password = PlainPassword::new(password);

        // メールアドレスの構文エラーも「認証失敗」に落とす
        // （存在の有無を応答から推測させない）
        let Ok(email) = Email::new(email) else {
            self.dummy_verification(&plain_password);
            return Err(ApiError::AuthenticationFailed);
        };

        let account = self.account_repository.find_by_email(&email).await?;

        match account {
            Some(account) => {
                let result = self
                    .password_hasher
                    .verify(&plain_password, account.password_hash())?;

                if !result.is_match() {
                    log_business_event!(
                        event.category = event::category::AUTH,
                        event.action = event::action::SIGNIN_FAILURE,
                        event.result = event::result::FAILURE,
                        "パスワードが一致しませんでした"
                    );
                    return Err(ApiError::AuthenticationFailed);
                }

                log_business_event!(
                    event.category = event::category::AUTH,
                    event.action = event::action::SIGNIN_SUCCESS,
                    event.result = event::result::SUCCESS,
                    account.id = %account.id(),
                    "サインインしました"
                );

                self.start_session(&account).await
            }
            None => {
                // タイミング攻撃対策: ダミーハッシュで検証を実行
                self.dummy_verification(&plain_password);
                log_business_event!(
                    event.category = event::category::AUTH,
                    event.action = event::action::SIGNIN_FAILURE,
                    event.result = event::result::FAILURE,
                    "アカウントが見つかりませんでした"
                );
                Err(ApiError::AuthenticationFailed)
            }
        }
    }

    async fn signout(&self, session_id: &str) -> Result<(), ApiError> {
        self.session_manager.delete(session_id).await?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::SIGNOUT,
            event.result = event::result::SUCCESS,
            "サインアウトしました"
        );

        Ok(())
    }
}
