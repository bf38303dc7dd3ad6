//! TUIレイアウト管理
//!
//! 画面をメニューバー・ツールバー・ガター・テキスト・ステータス行に分割し、
//! マウス操作の当たり判定に使う領域も同じ計算から求める

use crate::commands::{Menu, MenuItem, CommandId};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

/// 画面全体のレイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    pub menu_bar: Rect,
    pub toolbar: Rect,
    pub gutter: Rect,
    pub text: Rect,
    pub status: Rect,
    pub total: Rect,
}

impl ScreenLayout {
    /// 画面サイズとガター幅からレイアウトを計算
    pub fn compute(area: Rect, gutter_width: u16) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // メニューバー
                Constraint::Length(1), // ツールバー
                Constraint::Min(1),    // 本文
                Constraint::Length(1), // ステータス行
            ])
            .split(area);

        let body = rows[2];
        let gutter_width = gutter_width.min(body.width.saturating_sub(1));
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(gutter_width), Constraint::Min(1)])
            .split(body);

        Self {
            menu_bar: rows[0],
            toolbar: rows[1],
            gutter: columns[0],
            text: columns[1],
            status: rows[3],
            total: area,
        }
    }
}

/// 当たり判定付きの配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitBox<T> {
    pub area: Rect,
    pub target: T,
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// メニュー見出しの表示文字列
pub fn menu_title_label(menu: &Menu) -> String {
    format!(" {} ", menu.title)
}

/// ツールバーボタンの表示文字列
pub fn toolbar_label(id: CommandId) -> String {
    format!("[{}]", id.label())
}

pub const TOOLBAR_SEPARATOR: &str = "│";

/// メニュー見出しの配置
pub fn menu_title_boxes(menus: &[Menu], bar: Rect) -> Vec<HitBox<usize>> {
    let mut x = bar.x;
    let mut boxes = Vec::with_capacity(menus.len());
    for (idx, menu) in menus.iter().enumerate() {
        let width = menu_title_label(menu).width() as u16;
        boxes.push(HitBox {
            area: Rect::new(x, bar.y, width, 1).intersection(bar),
            target: idx,
        });
        x = x.saturating_add(width);
    }
    boxes
}

/// ツールバーボタンの配置（区切りは当たり判定なし）
pub fn toolbar_boxes(items: &[MenuItem], bar: Rect) -> Vec<HitBox<CommandId>> {
    let mut x = bar.x.saturating_add(1);
    let mut boxes = Vec::new();
    for item in items {
        match item {
            MenuItem::Command(id) => {
                let width = toolbar_label(*id).width() as u16;
                boxes.push(HitBox {
                    area: Rect::new(x, bar.y, width, 1).intersection(bar),
                    target: *id,
                });
                x = x.saturating_add(width + 1);
            }
            MenuItem::Separator => {
                x = x.saturating_add(TOOLBAR_SEPARATOR.width() as u16 + 1);
            }
        }
    }
    boxes
}

/// ドロップダウンメニューの項目表示文字列
pub fn menu_item_label(id: CommandId, label_width: usize) -> String {
    format!(" {:<width$}  {} ", id.label(), id.shortcut(), width = label_width)
}

/// メニュー項目名の最大幅
pub fn menu_label_width(menu: &Menu) -> usize {
    menu.items
        .iter()
        .filter_map(|item| match item {
            MenuItem::Command(id) => Some(id.label().width()),
            MenuItem::Separator => None,
        })
        .max()
        .unwrap_or(0)
}

/// ドロップダウンの外枠（枠線込み）
pub fn dropdown_area(menus: &[Menu], index: usize, bar: Rect, screen: Rect) -> Option<Rect> {
    let menu = menus.get(index)?;
    let title = menu_title_boxes(menus, bar).get(index)?.area;
    let label_width = menu_label_width(menu);
    let inner_width = menu
        .items
        .iter()
        .filter_map(|item| match item {
            MenuItem::Command(id) => Some(menu_item_label(*id, label_width).width()),
            MenuItem::Separator => None,
        })
        .max()
        .unwrap_or(0) as u16;

    let area = Rect::new(
        title.x,
        bar.y + 1,
        inner_width + 2,
        menu.items.len() as u16 + 2,
    );
    Some(area.intersection(screen))
}

/// ドロップダウン内の項目インデックス
pub fn dropdown_item_at(
    menus: &[Menu],
    index: usize,
    bar: Rect,
    screen: Rect,
    x: u16,
    y: u16,
) -> Option<usize> {
    let area = dropdown_area(menus, index, bar, screen)?;
    if !contains(area, x, y) || y == area.y || x == area.x || x + 1 >= area.x + area.width {
        return None;
    }
    let item = (y - area.y - 1) as usize;
    match menus[index].items.get(item)? {
        MenuItem::Command(_) => Some(item),
        MenuItem::Separator => None,
    }
}

/// 座標にある要素
pub fn hit<T: Copy>(boxes: &[HitBox<T>], x: u16, y: u16) -> Option<T> {
    boxes
        .iter()
        .find(|b| contains(b.area, x, y))
        .map(|b| b.target)
}

/// 中央寄せしたダイアログ領域
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn is_inside(area: Rect, x: u16, y: u16) -> bool {
    contains(area, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{menu_bar, toolbar};

    #[test]
    fn layout_stacks_bars_around_body() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 80, 24), 3);
        assert_eq!(layout.menu_bar, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.toolbar, Rect::new(0, 1, 80, 1));
        assert_eq!(layout.gutter, Rect::new(0, 2, 3, 21));
        assert_eq!(layout.text, Rect::new(3, 2, 77, 21));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn zero_width_gutter_gives_text_the_whole_body() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 40, 10), 0);
        assert_eq!(layout.gutter.width, 0);
        assert_eq!(layout.text.width, 40);
    }

    #[test]
    fn toolbar_buttons_are_hit_by_position() {
        let bar = Rect::new(0, 1, 120, 1);
        let boxes = toolbar_boxes(&toolbar(), bar);
        // " [Open] [Save] │ [Cut] ..."
        assert_eq!(hit(&boxes, 1, 1), Some(CommandId::Open));
        assert_eq!(hit(&boxes, 6, 1), Some(CommandId::Open));
        assert_eq!(hit(&boxes, 8, 1), Some(CommandId::Save));
        assert_eq!(hit(&boxes, 15, 1), None);
        assert_eq!(hit(&boxes, 17, 1), Some(CommandId::Cut));
        assert_eq!(hit(&boxes, 1, 0), None);
    }

    #[test]
    fn menu_titles_are_hit_by_position() {
        let menus = menu_bar();
        let boxes = menu_title_boxes(&menus, Rect::new(0, 0, 80, 1));
        assert_eq!(hit(&boxes, 0, 0), Some(0));
        assert_eq!(hit(&boxes, 5, 0), Some(0));
        assert_eq!(hit(&boxes, 6, 0), Some(1));
    }

    #[test]
    fn dropdown_items_skip_separators_and_border() {
        let menus = menu_bar();
        let bar = Rect::new(0, 0, 80, 1);
        let screen = Rect::new(0, 0, 80, 24);
        // File メニュー: 枠(1行) + Open, Save, ---, Exit
        assert_eq!(dropdown_item_at(&menus, 0, bar, screen, 2, 2), Some(0));
        assert_eq!(dropdown_item_at(&menus, 0, bar, screen, 2, 3), Some(1));
        assert_eq!(dropdown_item_at(&menus, 0, bar, screen, 2, 4), None);
        assert_eq!(dropdown_item_at(&menus, 0, bar, screen, 2, 5), Some(3));
        assert_eq!(dropdown_item_at(&menus, 0, bar, screen, 2, 1), None);
    }

    #[test]
    fn centered_fits_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }
}
