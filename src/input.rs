//! Single-line text input used for entering the media reference.

/// Editable text with a character cursor and a length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters, `0..=value.chars().count()`.
    cursor: usize,
    char_limit: usize,
}

impl TextInput {
    pub const PROMPT: &'static str = "🔗 ";
    pub const PLACEHOLDER: &'static str = "Paste link here ..! (YouTube,X,Reddit,Insta)";

    #[must_use]
    pub const fn new(char_limit: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            char_limit,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Inserts a character at the cursor unless the limit is reached.
    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.len() >= self.char_limit {
            return;
        }
        let at = byte_index(&self.value, self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts pasted text, folding line breaks into spaces.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.trim().chars() {
            self.insert(if matches!(ch, '\n' | '\r') { ' ' } else { ch });
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = byte_index(&self.value, self.cursor - 1);
        let end = byte_index(&self.value, self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let start = byte_index(&self.value, self.cursor);
        let end = byte_index(&self.value, self.cursor + 1);
        self.value.replace_range(start..end, "");
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(index, _)| index)
}
