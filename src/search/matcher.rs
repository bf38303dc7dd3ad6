//! 検索用マッチャー

use super::SearchMatch;

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// `from` 以降で最初のマッチを返す
    fn find_from(&self, text: &str, pattern: &str, from: usize) -> Option<SearchMatch>;

    /// 重なりのないマッチを先頭から全て返す
    fn find_all(&self, text: &str, pattern: &str) -> Vec<SearchMatch> {
        let mut matches = Vec::new();
        let mut from = 0;
        while let Some(found) = self.find_from(text, pattern, from) {
            from = found.end;
            matches.push(found);
        }
        matches
    }
}

/// 大文字小文字を区別するリテラルマッチャー
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher;

impl LiteralMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for LiteralMatcher {
    fn find_from(&self, text: &str, pattern: &str, from: usize) -> Option<SearchMatch> {
        if pattern.is_empty() {
            return None;
        }

        let byte_from = match text.char_indices().nth(from) {
            Some((idx, _)) => idx,
            None => return None,
        };

        let byte_start = byte_from + text[byte_from..].find(pattern)?;
        let start = from + text[byte_from..byte_start].chars().count();
        let end = start + pattern.chars().count();

        Some(SearchMatch { start, end })
    }
}
