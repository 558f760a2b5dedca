//! # 宛先アドレス
//!
//! 配送先アドレスの分類（バリデータ）と、アカウント用の厳格な
//! メールアドレス値オブジェクトを定義する。
//!
//! ## 2 つの検証ルール
//!
//! | 型 | ルール | 用途 |
//! |---|-------|------|
//! | [`ValidatedRecipient`] | `@` がちょうど 1 つ、前後に 1 文字以上 | 一括配送の宛先分類 |
//! | [`Email`] | 上記 + 最大 255 文字 + trim | アカウント登録 |
//!
//! ## 設計方針
//!
//! - **分類は全域関数**: 宛先の検証は失敗せず、`valid` フラグで分類する。
//!   不正な宛先もレポートに名前を残すため、破棄しない。
//! - **RFC 5322 完全準拠はしない**: 厳密な検証はトランスポート側の責務とし、
//!   ここでは構文上の最小チェックのみ行う。

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 分類済みの宛先
///
/// 抽出された生の宛先文字列 1 件に対する分類結果。
/// 不正な宛先も保持される（レポートで名指しするため）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRecipient {
    /// 宛先アドレス（生の文字列のまま保持）
    pub address: String,
    /// 構文チェックを通過したかどうか
    pub valid:   bool,
}

impl ValidatedRecipient {
    /// 生の宛先文字列を分類する
    ///
    /// 空でない文字列で、`@` をちょうど 1 つ含み、その前後に
    /// 1 文字以上ある場合のみ `valid` とする（`[^@]+@[^@]+` の完全一致）。
    ///
    /// 決定的な全域関数であり、エラーを返さずブロックもしない。
    pub fn classify(raw: impl Into<String>) -> Self {
        let address = raw.into();
        let valid = is_deliverable(&address);
        Self { address, valid }
    }
}

/// `[^@]+@[^@]+` の完全一致判定
fn is_deliverable(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// メールアドレス（値オブジェクト）
///
/// アカウント登録時に使用する厳格な形式。生成時にバリデーションを実行し、
/// 不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない（trim 後）
    /// - `@` をちょうど 1 つ含み、前後に 1 文字以上ある
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        if value.chars().count() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは 255 文字以内である必要があります".to_string(),
            ));
        }

        if !is_deliverable(&value) {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a@b", true)]
    #[case("user@example.com", true)]
    #[case("@b", false)]
    #[case("a@", false)]
    #[case("", false)]
    #[case("noat", false)]
    #[case("a@b@c", false)]
    #[case("@", false)]
    fn test_classifyの判定(#[case] raw: &str, #[case] expected: bool) {
        let recipient = ValidatedRecipient::classify(raw);
        assert_eq!(recipient.valid, expected);
        assert_eq!(recipient.address, raw);
    }

    #[test]
    fn test_classifyは重複を独立に分類する() {
        let first = ValidatedRecipient::classify("dup@example.com");
        let second = ValidatedRecipient::classify("dup@example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_emailを作成できる() {
        let email = Email::new("user@example.com").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_emailはtrimされる() {
        let email = Email::new("  user@example.com  ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[rstest]
    #[case("")]
    #[case("noat")]
    #[case("@example.com")]
    #[case("a@b@c")]
    fn test_不正なemailはエラー(#[case] raw: &str) {
        assert!(Email::new(raw).is_err());
    }

    #[test]
    fn test_256文字のemailはエラー() {
        let local = "a".repeat(250);
        let raw = format!("{local}@ex.com");
        assert!(Email::new(raw).is_err());
    }
}
