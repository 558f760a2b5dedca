//! # 宛先抽出
//!
//! アップロードされた宛先リストファイルから、生の宛先候補文字列の
//! 順序付き列を抽出する。
//!
//! ## 設計方針
//!
//! - **純粋変換**: バイト列から文字列列への変換のみ。ネットワークも副作用もない
//! - **順序保持**: ファイル上の出現順がそのまま送信順になるため、順序を変えない
//! - **0 件は正常**: 抽出結果が空であることはエラーではない（報告は呼び出し元の責務）
//!
//! ## 対応形式
//!
//! | 形式 | 規則 |
//! |------|------|
//! | 区切りテキスト | 1 行 1 候補。空行は捨て、行頭の空白区切りトークンを採用 |
//! | スプレッドシート | 先頭シートのみ。セルを行優先で平坦化、空セルはスキップ |

use calamine::{Data, Reader, Xlsx};
use mailflow_domain::dispatch::{ExtractionError, RecipientFileFormat};

/// 宛先抽出器
///
/// ファイル内容（バイト列）と形式ヒントから宛先候補の列を取り出す。
/// 状態を持たない。
#[derive(Debug, Clone, Default)]
pub struct RecipientExtractor;

impl RecipientExtractor {
    pub fn new() -> Self {
        Self
    }

    /// ファイル内容から宛先候補を抽出する
    ///
    /// # エラー
    ///
    /// 宣言された形式として解析できない場合のみ [`ExtractionError`] を返す。
    /// 候補が 0 件でも `Ok(vec![])` を返す。
    pub fn extract(
        &self,
        bytes: &[u8],
        format: RecipientFileFormat,
    ) -> Result<Vec<String>, ExtractionError> {
        match format {
            RecipientFileFormat::Delimited => extract_delimited(bytes),
            RecipientFileFormat::Spreadsheet => extract_spreadsheet(bytes),
        }
    }
}

/// 区切りテキストから抽出する
///
/// `\n` / `\r\n` で行に分割し、trim 後に空の行を捨て、残った各行の
/// 先頭の空白区切りトークンを 1 候補とする。非空行 N 行からは
/// ちょうど N 候補が出現順で得られる。
fn extract_delimited(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ExtractionError::Parse(format!("UTF-8 として解釈できません: {e}")))?;

    let candidates = text
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                // カラム構造を持つ行でも先頭トークンを宛先とみなす
                trimmed.split_whitespace().next().map(str::to_string)
            }
        })
        .collect();

    Ok(candidates)
}

/// スプレッドシート（xlsx）から抽出する
///
/// 先頭シートのみを読み、セル値を行優先で平坦化する。
/// 文字列以外のセル値は文字列化し、空セルは読み飛ばす。
fn extract_spreadsheet(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut workbook = Xlsx::new(cursor)
        .map_err(|e| ExtractionError::Parse(format!("xlsx として読み込めません: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractionError::Parse("シートが存在しません".to_string()))?
        .map_err(|e| ExtractionError::Parse(format!("シートの読み取りに失敗: {e}")))?;

    let mut candidates = Vec::new();
    for row in range.rows() {
        for cell in row {
            match cell {
                Data::Empty => {}
                Data::String(s) => {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        candidates.push(trimmed.to_string());
                    }
                }
                other => {
                    let s = other.to_string();
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        candidates.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn extract_delimited_ok(input: &str) -> Vec<String> {
        RecipientExtractor::new()
            .extract(input.as_bytes(), RecipientFileFormat::Delimited)
            .unwrap()
    }

    #[test]
    fn test_非空行n行からn候補が出現順で得られる() {
        let input = "a@example.com\nb@example.com\nc@example.com\n";
        assert_eq!(
            extract_delimited_ok(input),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
    }

    #[test]
    fn test_crlf改行を扱える() {
        let input = "a@example.com\r\nb@example.com\r\n";
        assert_eq!(
            extract_delimited_ok(input),
            vec!["a@example.com", "b@example.com"]
        );
    }

    #[test]
    fn test_空行は捨てられる() {
        let input = "a@example.com\n\n   \nb@example.com\n";
        assert_eq!(
            extract_delimited_ok(input),
            vec!["a@example.com", "b@example.com"]
        );
    }

    #[test]
    fn test_カラム構造の行は先頭トークンを採用する() {
        let input = "a@example.com 山田太郎\nb@example.com\t営業部\n";
        assert_eq!(
            extract_delimited_ok(input),
            vec!["a@example.com", "b@example.com"]
        );
    }

    #[test]
    fn test_行頭行末の空白はtrimされる() {
        let input = "  a@example.com  \n";
        assert_eq!(extract_delimited_ok(input), vec!["a@example.com"]);
    }

    #[test]
    fn test_空ファイルは0件で正常() {
        assert_eq!(extract_delimited_ok(""), Vec::<String>::new());
    }

    #[test]
    fn test_不正な宛先も候補として残る() {
        // 分類はバリデータの責務。抽出は捨てない
        let input = "not-an-address\na@example.com\n";
        assert_eq!(
            extract_delimited_ok(input),
            vec!["not-an-address", "a@example.com"]
        );
    }

    #[test]
    fn test_utf8でないバイト列はparse_error() {
        let result = RecipientExtractor::new()
            .extract(&[0xff, 0xfe, 0x00], RecipientFileFormat::Delimited);
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[test]
    fn test_破損したxlsxはparse_error() {
        let result = RecipientExtractor::new()
            .extract(b"this is not a zip archive", RecipientFileFormat::Spreadsheet);
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }
}
