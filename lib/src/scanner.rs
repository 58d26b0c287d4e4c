//! Line-buffered tokenizer for N-Triples with the `?variable` and bare `a`
//! extensions.
//!
//! The scanner pulls one line at a time from a `BufRead` and hands out one
//! token per [`Scanner::scan`] call. Escape sequences are only decoded when a
//! backslash was seen while scanning a token.

use crate::consts::TYPE;
use std::fmt;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,
    Eol,
    Uri,
    BNode,
    Literal,
    LangTag,
    TypeMarker,
    Dot,
    Variable,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "Illegal",
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "EOL",
            TokenKind::Uri => "URI",
            TokenKind::BNode => "BNode",
            TokenKind::Literal => "Literal",
            TokenKind::LangTag => "LangTag",
            TokenKind::TypeMarker => "TypeMarker",
            TokenKind::Dot => "Dot",
            TokenKind::Variable => "Variable",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub struct Scanner<R> {
    reader: R,
    line: Vec<char>,
    pos: usize,
    // position of the next character
    row: usize,
    col: usize,
    // position where the last token started
    token_row: usize,
    token_col: usize,
    eof: bool,
    read_error: Option<String>,
    error: String,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
            row: 1,
            col: 0,
            token_row: 1,
            token_col: 1,
            eof: false,
            read_error: None,
            error: String::new(),
        }
    }

    /// 1-based row of the last scanned token.
    pub fn row(&self) -> usize {
        self.token_row
    }

    /// 1-based column of the last scanned token.
    pub fn col(&self) -> usize {
        self.token_col
    }

    /// Message describing the last `Illegal` token; empty otherwise.
    pub fn error(&self) -> &str {
        &self.error
    }

    fn fill(&mut self) -> bool {
        if self.pos < self.line.len() {
            return true;
        }
        if self.eof {
            return false;
        }
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => {
                self.eof = true;
                false
            }
            Ok(_) => {
                self.line = buf.chars().collect();
                self.pos = 0;
                true
            }
            Err(e) => {
                self.eof = true;
                self.read_error = Some(format!("read error: {}", e));
                false
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        if self.fill() {
            Some(self.line[self.pos])
        } else {
            None
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.row += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn illegal(&mut self, message: &str, text: impl Into<String>) -> Token {
        self.error = message.to_string();
        Token::new(TokenKind::Illegal, text)
    }

    /// Discards everything up to and including the next line break.
    pub fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    pub fn scan(&mut self) -> Token {
        self.error.clear();
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
        self.token_row = self.row;
        self.token_col = self.col + 1;

        let c = match self.peek() {
            Some(c) => c,
            None => {
                return match self.read_error.take() {
                    Some(msg) => self.illegal(&msg, ""),
                    None => Token::new(TokenKind::Eof, ""),
                }
            }
        };
        match c {
            '\n' => {
                self.advance();
                Token::new(TokenKind::Eol, "")
            }
            '#' => {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        return Token::new(TokenKind::Eol, "");
                    }
                }
                Token::new(TokenKind::Eof, "")
            }
            '<' => self.scan_uri(),
            '"' => self.scan_literal(),
            '@' => self.scan_lang_tag(),
            '^' => {
                self.advance();
                if self.peek() == Some('^') {
                    self.advance();
                    Token::new(TokenKind::TypeMarker, "^^")
                } else {
                    self.scan_illegal(String::from("^"))
                }
            }
            '_' => {
                self.advance();
                if self.peek() == Some(':') {
                    self.advance();
                    self.scan_blank_node()
                } else {
                    self.scan_illegal(String::from("_"))
                }
            }
            '?' => {
                self.advance();
                let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
                if name.is_empty() {
                    self.illegal("invalid variable name", "?")
                } else {
                    Token::new(TokenKind::Variable, name)
                }
            }
            '.' => {
                self.advance();
                Token::new(TokenKind::Dot, ".")
            }
            'a' => {
                self.advance();
                match self.peek() {
                    Some(' ' | '\t' | '\r' | '\n') => Token::new(TokenKind::Uri, TYPE.as_str()),
                    _ => self.scan_illegal(String::from("a")),
                }
            }
            _ => {
                self.advance();
                self.scan_illegal(c.to_string())
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.advance();
        }
        out
    }

    // Consumes up to the next token boundary so the caller can resynchronize.
    fn scan_illegal(&mut self, mut text: String) -> Token {
        text.push_str(&self.take_while(|c| {
            !matches!(c, '<' | '"' | '.' | ';' | ',' | '\n' | ' ' | '\t' | '_')
        }));
        self.illegal("unexpected token", text)
    }

    fn scan_uri(&mut self) -> Token {
        self.advance();
        let mut text = String::new();
        let mut saw_backslash = false;
        loop {
            match self.peek() {
                None | Some('\n') => return self.illegal("unterminated URI", text),
                Some('>') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    saw_backslash |= c == '\\';
                    text.push(c);
                    self.advance();
                }
            }
        }
        if saw_backslash {
            match unescape(&text) {
                Some(s) => text = s,
                None => return self.illegal("illegal escape sequence", text),
            }
        }
        Token::new(TokenKind::Uri, text)
    }

    fn scan_literal(&mut self) -> Token {
        self.advance();
        let mut text = String::new();
        let mut escaped = false;
        let mut saw_backslash = false;
        loop {
            let c = match self.peek() {
                None | Some('\n') => return self.illegal("unterminated Literal", text),
                Some(c) => c,
            };
            self.advance();
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
                saw_backslash = true;
            } else if c == '"' {
                break;
            }
            text.push(c);
        }
        if saw_backslash {
            match unescape(&text) {
                Some(s) => text = s,
                None => return self.illegal("illegal escape sequence", text),
            }
        }
        Token::new(TokenKind::Literal, text)
    }

    fn scan_lang_tag(&mut self) -> Token {
        self.advance();
        let tag = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
        if !crate::node::is_valid_language_tag(&tag) {
            return self.illegal("invalid language tag", tag);
        }
        Token::new(TokenKind::LangTag, tag)
    }

    fn scan_blank_node(&mut self) -> Token {
        let mut label = self.take_while(|c| {
            !(c.is_whitespace() || matches!(c, '<' | '"' | ';' | ','))
        });
        // a trailing dot terminates the statement, it is not part of the label
        while label.ends_with('.') {
            label.pop();
            self.pos -= 1;
            self.col -= 1;
        }
        if label.is_empty() {
            return self.illegal("invalid blank node label", "_:");
        }
        Token::new(TokenKind::BNode, label)
    }
}

/// Decodes `\t \b \n \r \f \" \' \\ \uXXXX \UXXXXXXXX`. Returns `None` on any
/// other escape or an invalid code point.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            't' => '\t',
            'b' => '\u{08}',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{0C}',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, len: usize) -> Option<char> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len {
        return None;
    }
    char::from_u32(u32::from_str_radix(&digits, 16).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        let mut s = Scanner::new(Cursor::new(input));
        let mut out = Vec::new();
        loop {
            let t = s.scan();
            let done = t.kind == TokenKind::Eof;
            out.push((t.kind, t.text));
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_statement_tokens() {
        let toks = kinds("<http://ex.org/s> a _:b1 .\n");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Uri, "http://ex.org/s".to_string()),
                (TokenKind::Uri, TYPE.as_str().to_string()),
                (TokenKind::BNode, "b1".to_string()),
                (TokenKind::Dot, ".".to_string()),
                (TokenKind::Eol, String::new()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_literal_tokens() {
        let toks = kinds(r#""hei"@nb-NO "1"^^<http://ex.org/int> ?x"#);
        assert_eq!(toks[0], (TokenKind::Literal, "hei".to_string()));
        assert_eq!(toks[1], (TokenKind::LangTag, "nb-NO".to_string()));
        assert_eq!(toks[2], (TokenKind::Literal, "1".to_string()));
        assert_eq!(toks[3].0, TokenKind::TypeMarker);
        assert_eq!(toks[4], (TokenKind::Uri, "http://ex.org/int".to_string()));
        assert_eq!(toks[5], (TokenKind::Variable, "x".to_string()));
    }

    #[test]
    fn test_escapes() {
        let toks = kinds(r#""a\tb\n\"q\" \u00E6\U0001F600 \\""#);
        assert_eq!(toks[0].1, "a\tb\n\"q\" æ😀 \\");

        // a doubled backslash before the quote closes the literal
        let toks = kinds(r#""x\\" ."#);
        assert_eq!(toks[0], (TokenKind::Literal, "x\\".to_string()));
        assert_eq!(toks[1].0, TokenKind::Dot);

        // four backslashes then a quote still closes
        let toks = kinds(r#""x\\\\" ."#);
        assert_eq!(toks[0], (TokenKind::Literal, "x\\\\".to_string()));

        // an escaped quote does not
        let toks = kinds(r#""x\" ."#);
        assert_eq!(toks[0].0, TokenKind::Illegal);
    }

    #[test]
    fn test_errors() {
        let mut s = Scanner::new(Cursor::new("<http://unterminated\n"));
        assert_eq!(s.scan().kind, TokenKind::Illegal);
        assert_eq!(s.error(), "unterminated URI");
        assert_eq!(s.scan().kind, TokenKind::Eol);
        assert_eq!(s.error(), "");

        let mut s = Scanner::new(Cursor::new("\"open\n"));
        assert_eq!(s.scan().kind, TokenKind::Illegal);
        assert_eq!(s.error(), "unterminated Literal");

        let mut s = Scanner::new(Cursor::new("\"bad \\q\""));
        assert_eq!(s.scan().kind, TokenKind::Illegal);
        assert_eq!(s.error(), "illegal escape sequence");

        let mut s = Scanner::new(Cursor::new("\"x\"@ ."));
        s.scan();
        assert_eq!(s.scan().kind, TokenKind::Illegal);
        assert_eq!(s.error(), "invalid language tag");

        let mut s = Scanner::new(Cursor::new("garbage<http://ex.org/a>"));
        let t = s.scan();
        assert_eq!(t.kind, TokenKind::Illegal);
        assert_eq!(t.text, "garbage");
        assert_eq!(s.error(), "unexpected token");
        assert_eq!(s.scan().kind, TokenKind::Uri);
    }

    #[test]
    fn test_comments_and_positions() {
        let mut s = Scanner::new(Cursor::new("# header\n\n  <a> <b> <c> . # trailing"));
        assert_eq!(s.scan().kind, TokenKind::Eol);
        assert_eq!(s.scan().kind, TokenKind::Eol);
        let t = s.scan();
        assert_eq!(t.kind, TokenKind::Uri);
        assert_eq!((s.row(), s.col()), (3, 3));
        s.scan();
        s.scan();
        assert_eq!(s.scan().kind, TokenKind::Dot);
        assert_eq!(s.scan().kind, TokenKind::Eof);
    }

    #[test]
    fn test_stray_punctuation_is_consumed() {
        let toks = kinds("; <http://ex.org/a> , .");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Illegal, ";".to_string()),
                (TokenKind::Uri, "http://ex.org/a".to_string()),
                (TokenKind::Illegal, ",".to_string()),
                (TokenKind::Dot, ".".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_tab_ends_illegal_token() {
        let toks = kinds("garbage\tfoo");
        assert_eq!(toks[0], (TokenKind::Illegal, "garbage".to_string()));
        assert_eq!(toks[1], (TokenKind::Illegal, "foo".to_string()));
        assert_eq!(toks[2].0, TokenKind::Eof);
    }

    #[test]
    fn test_blank_node_before_dot() {
        let toks = kinds("_:x.");
        assert_eq!(toks[0], (TokenKind::BNode, "x".to_string()));
        assert_eq!(toks[1].0, TokenKind::Dot);
    }
}
