//! テーマシステム
//!
//! 画面要素ごとのカラー設定。既定はダークテーマのみ

use ratatui::{
    style::{Color, Modifier, Style},
    widgets::BorderType,
};
use std::collections::HashMap;

/// UIコンポーネントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// テキストエリア
    TextArea,
    /// 行番号
    LineNumber,
    /// 選択範囲
    Selection,
    /// メニューバー
    MenuBar,
    /// 開いているメニュー見出し
    MenuTitleActive,
    /// メニュー項目
    MenuItem,
    /// 選択中のメニュー項目
    MenuItemSelected,
    /// ツールバー
    Toolbar,
    /// ツールバーボタン
    ToolbarButton,
    /// ステータスライン
    StatusLine,
    /// ダイアログ
    Dialog,
    /// 入力欄
    Input,
    /// エラーメッセージ
    Error,
    /// 警告メッセージ
    Warning,
    /// 情報メッセージ
    Info,
}

/// カラー設定
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// 前景色
    pub foreground: Color,
    /// 背景色
    pub background: Color,
    /// 修飾子（太字、下線など）
    pub modifiers: Modifier,
}

impl ColorScheme {
    pub fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
            modifiers: Modifier::empty(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers = modifier;
        self
    }

    pub fn to_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .bg(self.background)
            .add_modifier(self.modifiers)
    }
}

/// テーマ設定
#[derive(Debug, Clone)]
pub struct Theme {
    /// コンポーネント別のカラー設定
    pub colors: HashMap<ComponentType, ColorScheme>,
    /// ボーダータイプ
    pub border_type: BorderType,
}

impl Theme {
    /// ダークテーマ
    pub fn dark() -> Self {
        use ComponentType::*;

        let mut colors = HashMap::new();
        colors.insert(TextArea, ColorScheme::new(Color::White, Color::Reset));
        colors.insert(LineNumber, ColorScheme::new(Color::DarkGray, Color::Reset));
        colors.insert(Selection, ColorScheme::new(Color::Black, Color::LightBlue));
        colors.insert(MenuBar, ColorScheme::new(Color::Black, Color::Gray));
        colors.insert(
            MenuTitleActive,
            ColorScheme::new(Color::White, Color::Blue).with_modifier(Modifier::BOLD),
        );
        colors.insert(MenuItem, ColorScheme::new(Color::Black, Color::Gray));
        colors.insert(MenuItemSelected, ColorScheme::new(Color::White, Color::Blue));
        colors.insert(Toolbar, ColorScheme::new(Color::Gray, Color::Reset));
        colors.insert(
            ToolbarButton,
            ColorScheme::new(Color::Cyan, Color::Reset).with_modifier(Modifier::BOLD),
        );
        colors.insert(StatusLine, ColorScheme::new(Color::Black, Color::Gray));
        colors.insert(Dialog, ColorScheme::new(Color::White, Color::DarkGray));
        colors.insert(Input, ColorScheme::new(Color::White, Color::Black));
        colors.insert(
            Error,
            ColorScheme::new(Color::LightRed, Color::DarkGray).with_modifier(Modifier::BOLD),
        );
        colors.insert(Warning, ColorScheme::new(Color::Yellow, Color::DarkGray));
        colors.insert(Info, ColorScheme::new(Color::White, Color::DarkGray));

        Self {
            colors,
            border_type: BorderType::Rounded,
        }
    }

    /// コンポーネントのスタイルを取得
    pub fn style(&self, component: ComponentType) -> Style {
        self.colors
            .get(&component)
            .map(ColorScheme::to_style)
            .unwrap_or_default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
