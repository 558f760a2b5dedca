//! # Mail Service ライブラリ
//!
//! メール一括配送 API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `error`: API エラー型と HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: 認証ミドルウェア（Bearer セッション検証）
//! - `usecase`: アプリケーションロジック（認証・テンプレート・配送）

pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
