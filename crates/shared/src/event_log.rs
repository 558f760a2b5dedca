//! # ビジネスイベントログの構造化ヘルパー
//!
//! ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"`
//! マーカーが自動付与され、`jq 'select(.["event.kind"] == "business_event")'`
//! でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`event.action`）を使用。JSON 出力で
//! フラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const AUTH: &str = "auth";
        pub const TEMPLATE: &str = "template";
        pub const DISPATCH: &str = "dispatch";
    }

    /// イベントアクション
    pub mod action {
        // 認証
        pub const SIGNUP_SUCCESS: &str = "auth.signup_success";
        pub const SIGNUP_FAILURE: &str = "auth.signup_failure";
        pub const SIGNIN_SUCCESS: &str = "auth.signin_success";
        pub const SIGNIN_FAILURE: &str = "auth.signin_failure";
        pub const SIGNOUT: &str = "auth.signout";

        // テンプレート
        pub const TEMPLATE_CREATED: &str = "template.created";

        // 配送
        pub const DISPATCH_COMPLETED: &str = "dispatch.completed";
        pub const DISPATCH_ABORTED: &str = "dispatch.aborted";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DB、Redis、ファイルシステム）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// メールトランスポート
        pub const TRANSPORT: &str = "transport";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const SESSION: &str = "session";
        pub const UPLOAD: &str = "upload";
        pub const SMTP: &str = "smtp";
        pub const INTERNAL: &str = "internal";
    }
}
