//! Character scanner for navigating input with save points

use crate::error::Pos;

/// Saved scanner position, handed back to [`Scanner::restore`] to backtrack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark(Pos);

impl Mark {
    pub const fn offset(self) -> usize {
        self.0.offset
    }

    pub const fn pos(self) -> Pos {
        self.0
    }
}

/// Random-access scanner over the characters of a document
///
/// The scanner knows nothing about XML. Backtracking is done by the caller:
/// take a [`Mark`] before trying a production and [`restore`](Self::restore)
/// it when the attempt fails. Line and column are tracked as the cursor
/// moves, so reading the position is constant time.
#[derive(Clone, Debug)]
pub struct Scanner {
    input: Vec<char>,
    cursor: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    /// Create scanner over a string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            cursor: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current character, `None` past the end of input
    pub fn current(&self) -> Option<char> {
        self.input.get(self.cursor).copied()
    }

    /// Peek at character ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<char> {
        self.input.get(self.cursor.saturating_add(ahead)).copied()
    }

    /// Check whether the current character equals `expected`
    pub fn test(&self, expected: char) -> bool {
        self.current() == Some(expected)
    }

    /// Check whether the current character satisfies `pred`
    pub fn test_with(&self, pred: impl Fn(char) -> bool) -> bool {
        self.current().is_some_and(pred)
    }

    /// Check whether the input at the cursor starts with `literal`
    pub fn test_str(&self, literal: &str) -> bool {
        let Some(rest) = self.input.get(self.cursor..) else {
            return false;
        };
        let mut rest = rest.iter();
        literal.chars().all(|c| rest.next() == Some(&c))
    }

    /// Advance cursor by one character
    pub fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.cursor += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Advance cursor by `n` characters, stopping at the end of input
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            if self.is_eof() {
                break;
            }
            self.advance();
        }
    }

    /// Consume character if it matches
    pub fn consume(&mut self, expected: char) -> bool {
        if self.test(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the input at the cursor starts with it
    pub fn consume_str(&mut self, literal: &str) -> bool {
        if self.test_str(literal) {
            self.advance_by(literal.chars().count());
            true
        } else {
            false
        }
    }

    /// Skip characters while `pred` holds
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.test_with(&pred) {
            self.advance();
        }
    }

    /// Save the current position
    pub const fn mark(&self) -> Mark {
        Mark(self.position())
    }

    /// Return to a previously saved position
    pub fn restore(&mut self, mark: Mark) {
        self.cursor = mark.0.offset;
        self.line = mark.0.line;
        self.col = mark.0.col;
    }

    /// Get current cursor index
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if at end of input
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.input.len()
    }

    /// Collect the characters between `start` and the cursor
    pub fn slice_from(&self, start: Mark) -> String {
        self.input
            .get(start.offset()..self.cursor)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Get position of the cursor
    pub const fn position(&self) -> Pos {
        Pos::new(self.cursor, self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_basic() {
        let mut scanner = Scanner::new(" aあ");
        assert_eq!(scanner.current(), Some(' '));
        assert_eq!(scanner.peek(2), Some('あ'));
        scanner.advance();
        assert!(scanner.test('a'));
        scanner.advance();
        assert!(scanner.test('あ'));
        scanner.advance();
        assert!(scanner.is_eof());
        assert_eq!(scanner.current(), None);
    }

    #[test]
    fn test_scanner_advance_stops_at_end() {
        let mut scanner = Scanner::new("ab");
        scanner.advance_by(10);
        assert_eq!(scanner.cursor(), 2);
        scanner.advance();
        assert_eq!(scanner.cursor(), 2);
    }

    #[test]
    fn test_scanner_test_str() {
        let scanner = Scanner::new("<!DOCTYPE");
        assert!(scanner.test_str("<!DOC"));
        assert!(scanner.test_str("<!DOCTYPE"));
        assert!(!scanner.test_str("<!DOCTYPE html"));
        assert!(!scanner.test_str("<?"));
        assert!(scanner.test_str(""));
    }

    #[test]
    fn test_scanner_consume() {
        let mut scanner = Scanner::new("EMPTY>");
        assert!(!scanner.consume_str("ANY"));
        assert!(scanner.consume_str("EMPTY"));
        assert!(!scanner.consume('x'));
        assert!(scanner.consume('>'));
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_scanner_mark_restore() {
        let mut scanner = Scanner::new("hello world");
        scanner.advance_by(2);
        let mark = scanner.mark();
        scanner.advance_by(4);
        assert_eq!(scanner.slice_from(mark), "llo ");
        scanner.restore(mark);
        assert_eq!(scanner.cursor(), 2);
        assert_eq!(mark.offset(), 2);
    }

    #[test]
    fn test_scanner_position() {
        let mut scanner = Scanner::new("ab\ncd\n\nef");
        assert_eq!(scanner.position(), Pos::new(0, 1, 1));
        scanner.advance_by(4);
        assert_eq!(scanner.position(), Pos::new(4, 2, 2));
        let mark = scanner.mark();
        scanner.advance_by(3);
        assert_eq!(scanner.position(), Pos::new(7, 4, 1));
        scanner.restore(mark);
        assert_eq!(scanner.position(), Pos::new(4, 2, 2));
        assert_eq!(mark.pos(), Pos::new(4, 2, 2));
    }
}
