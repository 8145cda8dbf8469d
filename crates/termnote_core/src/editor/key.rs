//! Platform-independent key events and the textual key-script encoding.

use once_cell::sync::Lazy;
use regex::Regex;

static SPECIAL_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(cr|enter|bs|esc|c-s|c-n|lt)>").expect("valid special key regex")
});

/// Key event delivered to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character.
    Char(char),
    Enter,
    Backspace,
    Escape,
    /// Ctrl/Cmd+S.
    Save,
    /// Ctrl/Cmd+N.
    NewNote,
}

impl Key {
    /// Decodes a key script into key events.
    ///
    /// Literal characters map to `Key::Char`; `<CR>`, `<BS>`, `<Esc>`,
    /// `<C-s>`, `<C-n>` and `<lt>` (a literal `<`) are special. Any other
    /// `<...>` text is typed literally.
    pub fn parse_script(script: &str) -> Vec<Key> {
        let mut keys = Vec::with_capacity(script.len());
        let mut cursor = 0;
        for captures in SPECIAL_KEY_RE.captures_iter(script) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            keys.extend(script[cursor..whole.start()].chars().map(Key::Char));
            keys.push(match name.as_str().to_ascii_lowercase().as_str() {
                "cr" | "enter" => Key::Enter,
                "bs" => Key::Backspace,
                "esc" => Key::Escape,
                "c-s" => Key::Save,
                "c-n" => Key::NewNote,
                _ => Key::Char('<'),
            });
            cursor = whole.end();
        }
        keys.extend(script[cursor..].chars().map(Key::Char));
        keys
    }
}
