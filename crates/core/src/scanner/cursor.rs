//! Forward-only cursor over script text with line tracking.
//!
//! The cursor works on byte offsets into a `&str` and only ever stops on
//! `char` boundaries. It keeps the 1-based line number and the offset where
//! the current line begins, so the scanner can ask "am I at the start of a
//! line?" and "give me the rest of this line" without offset arithmetic.

/// Cursor over the script being scanned.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// 1-based line number of the current position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// `true` when the remainder starts with `word` (ASCII case-insensitive)
    /// followed by a blank, a line break or the end of input.
    pub fn starts_with_keyword(&self, word: &str) -> bool {
        let rest = self.rest().as_bytes();
        rest.len() >= word.len()
            && rest[..word.len()].eq_ignore_ascii_case(word.as_bytes())
            && matches!(rest.get(word.len()), None | Some(b' ' | b'\t' | b'\r' | b'\n'))
    }

    /// `true` when only spaces and tabs precede the cursor on this line.
    pub fn at_line_start(&self) -> bool {
        self.src[self.line_start..self.pos]
            .bytes()
            .all(|b| b == b' ' || b == b'\t')
    }

    /// Consume one character and return it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    /// Consume `pat`, which the caller has checked with [`Self::starts_with`].
    pub fn eat(&mut self, pat: &str) {
        debug_assert!(self.starts_with(pat));
        for _ in pat.chars() {
            self.bump();
        }
    }

    /// Advance up to, but not past, the next line break (or end of input).
    pub fn skip_to_line_end(&mut self) {
        let len = self
            .rest()
            .find(['\r', '\n'])
            .unwrap_or_else(|| self.rest().len());
        self.pos += len;
    }

    /// Consume the rest of the current line including its line break
    /// (`\n`, `\r\n` or a lone `\r`) and return the text before the break.
    ///
    /// Returns `None` without moving when no line break follows.
    pub fn take_line(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.find(['\r', '\n'])?;
        let text = &rest[..len];
        self.pos += len;
        if self.starts_with("\r\n") {
            self.pos += 1;
        }
        if self.peek() == Some('\r') {
            // A lone carriage return still ends the line.
            self.pos += 1;
            self.line += 1;
            self.line_start = self.pos;
        } else {
            self.bump();
        }
        Some(text)
    }
}
