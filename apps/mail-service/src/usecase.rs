//! # ユースケース層
//!
//! ハンドラから呼び出されるアプリケーションロジック。
//! ドメインモデルとインフラ層のトレイトを組み合わせて操作を実現する。
//!
//! | モジュール | 責務 |
//! |-----------|------|
//! | [`auth`] | アカウント登録・認証・セッション管理 |
//! | [`template`] | メッセージテンプレートの作成・一覧 |
//! | [`dispatch`] | 配送呼び出しの実行（抽出→レンダリング→送信→集計） |

pub mod auth;
pub mod dispatch;
pub mod template;

pub use auth::{AuthUseCase, AuthUseCaseImpl};
pub use dispatch::{DispatchUseCase, DispatchUseCaseImpl, MessageRenderer, TeraMessageRenderer};
pub use template::{TemplateUseCase, TemplateUseCaseImpl};
