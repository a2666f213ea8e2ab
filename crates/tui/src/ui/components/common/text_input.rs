//! UTF-8 safe single-line text input with cursor management, shared by the
//! target URL editor and operation field editing.

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    input: String,
    /// Byte index into `input`, always on a UTF-8 boundary.
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }

    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len().min(self.cursor);
        while !self.input.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.input.len());
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        let Some(prev) = self.input[..self.cursor].chars().last() else {
            return;
        };
        let start = self.cursor - prev.len_utf8();
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_respect_multibyte_chars() {
        let mut st = TextInputState::new();
        st.set_input("café.fr");
        st.set_cursor(5); // after 'é'
        st.backspace();
        assert_eq!(st.input(), "caf.fr");
        st.insert_char('e');
        assert_eq!(st.input(), "cafe.fr");
        assert_eq!(st.cursor_column(), 4);
        st.move_end();
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "cafe.r");
    }

    #[test]
    fn set_input_keeps_cursor_on_boundary() {
        let mut st = TextInputState::new();
        st.set_input("ééé");
        st.set_cursor(6);
        st.set_input("é");
        assert_eq!(st.cursor(), 2);
        st.clear();
        assert_eq!(st.cursor(), 0);
    }
}
