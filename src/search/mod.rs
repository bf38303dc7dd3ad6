//! 検索・置換
//!
//! 先頭から前方へ、大文字小文字を区別するリテラル検索のみを扱う

pub mod matcher;

pub use matcher::{LiteralMatcher, StringMatcher};

/// 検索の一致範囲（文字単位、`[start, end)`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

/// 検索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    Found(SearchMatch),
    NotFound,
}

/// 文書先頭から最初の一致を探す
pub fn find_first(text: &str, pattern: &str) -> FindOutcome {
    match LiteralMatcher::new().find_from(text, pattern, 0) {
        Some(found) => FindOutcome::Found(found),
        None => FindOutcome::NotFound,
    }
}

/// 全ての一致位置（置換用）
pub fn find_all(text: &str, pattern: &str) -> Vec<SearchMatch> {
    LiteralMatcher::new().find_all(text, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_first_reports_outcome() {
        match find_first("hello\nworld", "world") {
            FindOutcome::Found(m) => assert_eq!((m.start, m.end), (6, 11)),
            FindOutcome::NotFound => panic!("expected a match"),
        }
        assert_eq!(find_first("hello", "xyz"), FindOutcome::NotFound);
        assert_eq!(find_first("hello", ""), FindOutcome::NotFound);
    }
}
