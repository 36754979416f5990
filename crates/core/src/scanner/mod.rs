//! Script tokenizer: splits a multi-statement SQL script into statements.
//!
//! The scanner is a best-effort lexical splitter, not a validator. It is
//! aware of exactly four constructs: quoted literals (with backslash
//! escapes), block comments (nestable), line comments (`# ` and `-- `), and
//! the `DELIMITER` directive used by database command-line clients to change
//! the statement terminator mid-script.
//!
//! Block-comment text is kept in the statement (versioned comments such as
//! `/*!40101 SET NAMES utf8 */` are meaningful to the server); comments only
//! stop the delimiter from being recognized. Line comments and directive
//! lines are dropped.

pub mod cursor;

use cursor::Cursor;

/// Statement terminator in effect at the start of every script.
pub const DEFAULT_DELIMITER: &str = ";";

/// Keyword that introduces a delimiter change.
const DELIMITER_KEYWORD: &str = "DELIMITER";

/// Errors raised while scanning. Both indicate a malformed directive and are
/// treated as configuration errors by callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("DELIMITER directive on line {line} is not followed by a line break")]
    UnterminatedDirective { line: usize },

    #[error("DELIMITER directive on line {line} does not name a delimiter")]
    EmptyDelimiter { line: usize },
}

/// One recovered statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Verbatim statement text, without its delimiter.
    pub text: String,
    /// 1-based line of the first non-whitespace character.
    pub line: usize,
}

/// Ordered statements recovered from one script. Insertion order is
/// execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuffer {
    statements: Vec<Statement>,
}

impl CommandBuffer {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split `script` into statements.
///
/// Fails only when a `DELIMITER` directive is malformed (see [`ScanError`]).
/// Scanning the same text twice always yields the same buffer.
///
/// A leading byte-order mark is dropped.
pub fn scan(script: &str) -> Result<CommandBuffer, ScanError> {
    let script = script.strip_prefix('\u{FEFF}').unwrap_or(script);
    Scanner::new(script).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteKind {
    Single,
    Double,
    Backtick,
}

impl QuoteKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    fn closing(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
            Self::Backtick => '`',
        }
    }

    /// Identifiers in backticks take no backslash escapes.
    fn allows_escapes(self) -> bool {
        !matches!(self, Self::Backtick)
    }
}

struct Scanner<'a> {
    cursor: Cursor<'a>,
    delimiter: String,
    quote: Option<QuoteKind>,
    escape_next: bool,
    comment_depth: usize,
    current: String,
    /// Line of the first non-whitespace character in `current`.
    start_line: Option<usize>,
    out: CommandBuffer,
}

impl<'a> Scanner<'a> {
    fn new(script: &'a str) -> Self {
        Self {
            cursor: Cursor::new(script),
            delimiter: DEFAULT_DELIMITER.to_string(),
            quote: None,
            escape_next: false,
            comment_depth: 0,
            current: String::new(),
            start_line: None,
            out: CommandBuffer::default(),
        }
    }

    fn run(mut self) -> Result<CommandBuffer, ScanError> {
        while let Some(c) = self.cursor.peek() {
            // An escape covers exactly one character.
            let escaped = std::mem::take(&mut self.escape_next);

            if self.comment_depth > 0 {
                self.scan_comment();
                continue;
            }

            if let Some(quote) = self.quote {
                if !escaped {
                    if c == '\\' && quote.allows_escapes() {
                        self.escape_next = true;
                    } else if c == quote.closing() {
                        self.quote = None;
                    }
                }
                self.append_next();
                continue;
            }

            if escaped {
                self.append_next();
                continue;
            }

            if self.cursor.starts_with(&self.delimiter) {
                self.cursor.eat(&self.delimiter);
                self.finish_statement();
                continue;
            }

            if self.at_directive() {
                self.read_directive()?;
                continue;
            }

            if self.at_line_comment() {
                self.cursor.skip_to_line_end();
                continue;
            }

            if self.cursor.starts_with("/*") {
                self.comment_depth = 1;
                self.append_str("/*");
                continue;
            }

            if c == '\\' {
                self.escape_next = true;
            } else if let Some(quote) = QuoteKind::from_char(c) {
                self.quote = Some(quote);
            }
            self.append_next();
        }

        if !self.current.trim().is_empty() {
            self.finish_statement();
        }
        Ok(self.out)
    }

    fn scan_comment(&mut self) {
        if self.cursor.starts_with("*/") {
            self.comment_depth -= 1;
            self.append_str("*/");
        } else if self.cursor.starts_with("/*") {
            self.comment_depth += 1;
            self.append_str("/*");
        } else {
            self.append_next();
        }
    }

    /// A directive opens a line and a statement: only blanks may precede it
    /// in the accumulator.
    fn at_directive(&self) -> bool {
        self.start_line.is_none()
            && self.cursor.at_line_start()
            && self.cursor.starts_with_keyword(DELIMITER_KEYWORD)
    }

    fn at_line_comment(&self) -> bool {
        let rest = self.cursor.rest();
        ["#", "--"].iter().any(|intro| {
            rest.strip_prefix(*intro)
                .is_some_and(|after| after.starts_with([' ', '\t']))
        })
    }

    /// Consume a `DELIMITER <token>` line and make `<token>` the new
    /// delimiter. The line never reaches the output.
    fn read_directive(&mut self) -> Result<(), ScanError> {
        let line = self.cursor.line();
        let keyword = &self.cursor.rest()[..DELIMITER_KEYWORD.len()];
        self.cursor.eat(keyword);

        let token = self
            .cursor
            .take_line()
            .ok_or(ScanError::UnterminatedDirective { line })?
            .trim();
        if token.is_empty() {
            return Err(ScanError::EmptyDelimiter { line });
        }

        tracing::trace!(line, delimiter = token, "Delimiter changed");
        self.delimiter = token.to_string();
        self.current.clear();
        Ok(())
    }

    fn append_next(&mut self) {
        let line = self.cursor.line();
        if let Some(c) = self.cursor.bump() {
            if self.start_line.is_none() && !c.is_whitespace() {
                self.start_line = Some(line);
            }
            self.current.push(c);
        }
    }

    /// Append a marker (which never contains whitespace) and step over it.
    fn append_str(&mut self, marker: &str) {
        if self.start_line.is_none() {
            self.start_line = Some(self.cursor.line());
        }
        self.current.push_str(marker);
        self.cursor.eat(marker);
    }

    fn finish_statement(&mut self) {
        let line = self.start_line.take().unwrap_or_else(|| self.cursor.line());
        self.out.push(Statement {
            text: std::mem::take(&mut self.current),
            line,
        });
    }
}
