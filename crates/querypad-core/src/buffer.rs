//! Text buffers with a char-indexed caret.
//!
//! [`QueryBuffer`] backs both the multi-line query editor and the single-line
//! lookup box. Cursor positions are counted in `char`s, never bytes, so a
//! caret can't land inside a multi-byte sequence.

/// Replace `del_count` chars starting at char offset `start` with `insert`.
///
/// `start` past the end of `s` appends; the deleted range is clipped to the
/// string.
pub fn splice(s: &str, start: usize, del_count: usize, insert: &str) -> String {
    let head = byte_offset(s, start);
    let tail = byte_offset(s, start.saturating_add(del_count));

    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..head]);
    out.push_str(insert);
    out.push_str(&s[tail..]);
    out
}

/// Byte offset of the `char_idx`-th char, or `s.len()` when out of range.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuffer {
    content: String,
    cursor: usize,
}

impl QueryBuffer {
    /// Build a buffer, clamping `cursor` into the content.
    pub fn new(content: impl Into<String>, cursor: usize) -> Self {
        let content = content.into();
        let cursor = cursor.min(content.chars().count());
        Self { content, cursor }
    }

    /// Build a buffer with the caret after the last char.
    pub fn at_end(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        Self { content, cursor }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// A copy of this buffer with `snippet` spliced in at the caret and the
    /// caret placed right after it.
    pub fn with_inserted(&self, snippet: &str) -> Self {
        Self {
            content: splice(&self.content, self.cursor, 0, snippet),
            cursor: self.cursor + snippet.chars().count(),
        }
    }

    // ─── Editing ───────────────────────────────────────────

    pub fn insert_char(&mut self, c: char) {
        let at = byte_offset(&self.content, self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        *self = self.with_inserted(s);
    }

    /// Delete the char before the caret. Returns `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.content = splice(&self.content, self.cursor - 1, 1, "");
        self.cursor -= 1;
        true
    }

    /// Delete the char under the caret. Returns `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len_chars() {
            return false;
        }
        self.content = splice(&self.content, self.cursor, 1, "");
        true
    }

    // ─── Caret motion ──────────────────────────────────────

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len_chars());
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.len_chars();
    }

    /// Start of the caret's line.
    pub fn move_home(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.line_starts()[line];
    }

    /// End of the caret's line (before its newline).
    pub fn move_end(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.line_starts()[line] + self.line_len(line);
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.line_col();
        if line == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.line_starts()[line - 1] + col.min(self.line_len(line - 1));
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.line_col();
        let starts = self.line_starts();
        if line + 1 >= starts.len() {
            self.move_to_end();
            return;
        }
        self.cursor = starts[line + 1] + col.min(self.line_len(line + 1));
    }

    // ─── Line geometry ─────────────────────────────────────

    /// Zero-based (line, column) of the caret, both in chars.
    pub fn line_col(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = starts
            .iter()
            .rposition(|&start| start <= self.cursor)
            .unwrap_or(0);
        (line, self.cursor - starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    /// Char offsets at which each line begins. Never empty.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in self.content.chars().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    fn line_len(&self, line: usize) -> usize {
        self.content
            .split('\n')
            .nth(line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_inserts_at_char_offset() {
        assert_eq!(splice("SELECT  WHERE", 7, 0, "?x"), "SELECT ?x WHERE");
        assert_eq!(splice("abc", 0, 0, "x"), "xabc");
        assert_eq!(splice("abc", 3, 0, "x"), "abcx");
    }

    #[test]
    fn test_splice_past_end_appends() {
        assert_eq!(splice("abc", 10, 0, "!"), "abc!");
        assert_eq!(splice("abc", 1, 99, "Z"), "aZ");
    }

    #[test]
    fn test_splice_counts_chars_not_bytes() {
        assert_eq!(splice("αβγ", 1, 1, "x"), "αxγ");
        assert_eq!(splice("→", 1, 0, "∀"), "→∀");
    }

    #[test]
    fn test_with_inserted_moves_caret_after_snippet() {
        let buf = QueryBuffer::new("SELECT ?e WHERE { }", 18);
        let out = buf.with_inserted(":R15[\"is subclass of\"]");
        assert_eq!(out.content(), "SELECT ?e WHERE { :R15[\"is subclass of\"]}");
        assert_eq!(out.cursor(), 18 + 22);
    }

    #[test]
    fn test_new_clamps_cursor() {
        let buf = QueryBuffer::new("ab", 50);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_backspace_and_delete_at_edges() {
        let mut buf = QueryBuffer::new("ab", 0);
        assert!(!buf.backspace());
        assert!(buf.delete());
        assert_eq!(buf.content(), "b");

        buf.move_to_end();
        assert!(!buf.delete());
        assert!(buf.backspace());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_line_motion_keeps_column_when_possible() {
        let mut buf = QueryBuffer::new("PREFIX P\nSELECT ?e\nWHERE", 14);
        assert_eq!(buf.line_col(), (1, 5));

        buf.move_up();
        assert_eq!(buf.line_col(), (0, 5));

        buf.move_down();
        buf.move_down();
        // "WHERE" has exactly five chars: the caret lands at its end.
        assert_eq!(buf.line_col(), (2, 5));

        buf.move_down();
        assert_eq!(buf.cursor(), buf.len_chars());
    }

    #[test]
    fn test_home_end_are_line_local() {
        let mut buf = QueryBuffer::new("one\ntwo three\nfour", 6);
        buf.move_home();
        assert_eq!(buf.cursor(), 4);
        buf.move_end();
        assert_eq!(buf.cursor(), 13);
        assert_eq!(buf.line_count(), 3);
    }

    #[test]
    fn test_caret_after_trailing_newline_is_on_last_line() {
        let buf = QueryBuffer::at_end("abc\n");
        assert_eq!(buf.line_col(), (1, 0));
    }
}
