//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック・readiness チェック
//! - `auth`: サインアップ・サインイン・サインアウト
//! - `template`: テンプレートの作成・一覧
//! - `dispatch`: 配送呼び出し（multipart 受信）

pub mod auth;
pub mod dispatch;
pub mod health;
pub mod template;

pub use auth::{AuthState, signin, signout, signup};
pub use dispatch::{DispatchState, execute_dispatch};
pub use health::{ReadinessState, health_check, readiness_check};
pub use template::{TemplateState, create_template, list_templates};
