//! クリップボード
//!
//! システムクリップボードを優先し、使えない環境ではプロセス内の
//! クリップボードに切り替える

/// クリップボード操作
pub trait Clipboard {
    /// テキストを取得（空なら `None`）
    fn get_text(&mut self) -> Option<String>;

    /// テキストを設定
    fn set_text(&mut self, text: &str);
}

/// プロセス内クリップボード
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}

/// システムクリップボード（失敗時はプロセス内へフォールバック）
pub struct SystemClipboard {
    system: Option<arboard::Clipboard>,
    fallback: MemoryClipboard,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("system clipboard unavailable, using in-process clipboard: {}", err);
                None
            }
        };
        Self {
            system,
            fallback: MemoryClipboard::new(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        if let Some(system) = self.system.as_mut() {
            match system.get_text() {
                Ok(text) => return Some(text),
                Err(err) => log::debug!("clipboard read failed: {}", err),
            }
        }
        self.fallback.get_text()
    }

    fn set_text(&mut self, text: &str) {
        // 読み戻しに失敗してもプロセス内では貼り付けられるよう両方へ書く
        self.fallback.set_text(text);
        if let Some(system) = self.system.as_mut() {
            if let Err(err) = system.set_text(text.to_string()) {
                log::warn!("clipboard write failed: {}", err);
            }
        }
    }
}
