//! Tokenizer for the `.net` format.
//!
//! The scanner never fails: malformed input produces a [`TokenKind::Illegal`] token
//! carrying the offending text, and the parser turns it into an error.

use std::iter::Peekable;
use std::str::Chars;

use super::{MULTIPLIERS, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Tr,
    Pl,
    Net,
    Pr,
    Nt,
    /// `->`
    Arrow,
    Ident,
    /// A timing interval, normalized to `"[ a b ]"`.
    Interval,
    /// The weight of an inhibitor arc, `?-w`.
    Inhibitor,
    /// The weight of a read arc, `?w`.
    Read,
    /// The weight of a normal arc, `*w`.
    Star,
    Label,
    /// The initial marking of a place, `(m)`.
    Marking,
    Gt,
    Lt,
    Int,
    Illegal,
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Reserved words, matched case-insensitively against bare identifiers.
const KEYWORDS: [(&str, TokenKind); 5] = [
    ("tr", TokenKind::Tr),
    ("pl", TokenKind::Pl),
    ("net", TokenKind::Net),
    ("pr", TokenKind::Pr),
    ("nt", TokenKind::Nt),
];

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '\'' | '.')
}

pub(crate) struct Scanner<'i> {
    chars: Peekable<Chars<'i>>,
    line: usize,
    column: usize,
}

impl<'i> Scanner<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
    }

    /// Skips whitespace and `#` line comments.
    fn consume_trivia(&mut self) {
        loop {
            self.consume_whitespace();
            if self.peek() != Some('#') {
                return;
            }
            while self.peek().is_some_and(|ch| ch != '\n' && ch != '\r') {
                self.bump();
            }
        }
    }

    /// Appends a run of digits and an optional multiplier suffix to *buffer*.
    fn consume_number(&mut self, buffer: &mut String) {
        let start = buffer.len();
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            buffer.push(ch);
            self.bump();
        }
        if buffer.len() > start {
            if let Some(suffix) = self
                .peek()
                .filter(|ch| MULTIPLIERS.iter().any(|(letter, _)| letter == ch))
            {
                buffer.push(suffix);
                self.bump();
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.consume_trivia();
        let position = self.position();
        let Some(ch) = self.bump() else {
            return Token::new(TokenKind::Eof, "EOF", position);
        };
        match ch {
            ch if ch.is_ascii_alphabetic() => self.scan_ident(ch, position),
            '{' => self.scan_escaped(TokenKind::Ident, position),
            ch if ch.is_ascii_digit() => {
                let mut text = ch.to_string();
                self.consume_number(&mut text);
                Token::new(TokenKind::Int, text, position)
            }
            ':' => self.scan_label(),
            '?' => self.scan_test_arc(position),
            '*' => self.scan_weight(TokenKind::Star, "*", position),
            '-' => {
                if self.peek() == Some('>') {
                    self.bump();
                    Token::new(TokenKind::Arrow, "->", position)
                } else {
                    Token::new(TokenKind::Illegal, "-", position)
                }
            }
            '(' => self.scan_marking(position),
            '[' | ']' => self.scan_interval(ch, position),
            '>' => Token::new(TokenKind::Gt, ">", position),
            '<' => Token::new(TokenKind::Lt, "<", position),
            ch => Token::new(TokenKind::Illegal, ch, position),
        }
    }

    fn scan_ident(&mut self, first: char, position: Position) -> Token {
        let mut text = first.to_string();
        while let Some(ch) = self.peek().filter(|ch| is_ident_char(*ch)) {
            text.push(ch);
            self.bump();
        }
        let kind = KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(&text))
            .map(|(keyword, kind)| {
                text = (*keyword).to_owned();
                *kind
            })
            .unwrap_or(TokenKind::Ident);
        Token::new(kind, text, position)
    }

    /// Scans a brace-delimited name after its opening `{`.
    ///
    /// The text of the token keeps the braces and escapes, so that it can be written
    /// back verbatim.
    fn scan_escaped(&mut self, kind: TokenKind, position: Position) -> Token {
        let mut text = String::from("{");
        loop {
            match self.bump() {
                None | Some('\n') | Some('\r') | Some('{') => {
                    return Token::new(TokenKind::Illegal, text, position);
                }
                Some('}') => {
                    text.push('}');
                    return Token::new(kind, text, position);
                }
                Some('\\') => {
                    text.push('\\');
                    match self.bump() {
                        Some(ch @ ('{' | '}' | '\\')) => text.push(ch),
                        other => {
                            text.extend(other);
                            return Token::new(TokenKind::Illegal, text, position);
                        }
                    }
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    fn scan_label(&mut self) -> Token {
        self.consume_whitespace();
        let position = self.position();
        match self.bump() {
            None => Token::new(TokenKind::Illegal, "EOF", position),
            Some(ch @ ('}' | '\\')) => Token::new(TokenKind::Illegal, ch, position),
            Some('{') => self.scan_escaped(TokenKind::Label, position),
            Some(first) => {
                let mut text = first.to_string();
                // A bare label is terminated by whitespace, not by the end of input.
                loop {
                    match self.peek() {
                        None => return Token::new(TokenKind::Illegal, "EOF", position),
                        Some(ch) if is_whitespace(ch) => {
                            return Token::new(TokenKind::Label, text, position);
                        }
                        Some(ch) => {
                            text.push(ch);
                            self.bump();
                        }
                    }
                }
            }
        }
    }

    /// Scans `?w` (read arc) or `?-w` (inhibitor arc) after the `?`.
    fn scan_test_arc(&mut self, position: Position) -> Token {
        if self.peek() == Some('-') {
            self.bump();
            self.scan_weight(TokenKind::Inhibitor, "?-", position)
        } else {
            self.scan_weight(TokenKind::Read, "?", position)
        }
    }

    /// Scans the mandatory weight of an arc decoration; *prefix* is only used to
    /// report illegal decorations.
    fn scan_weight(&mut self, kind: TokenKind, prefix: &str, position: Position) -> Token {
        let mut text = String::new();
        self.consume_number(&mut text);
        if text.is_empty() {
            let mut illegal = prefix.to_owned();
            illegal.extend(self.bump());
            return Token::new(TokenKind::Illegal, illegal, position);
        }
        Token::new(kind, text, position)
    }

    fn scan_marking(&mut self, position: Position) -> Token {
        let mut text = String::new();
        self.consume_number(&mut text);
        match self.bump() {
            Some(')') if !text.is_empty() => Token::new(TokenKind::Marking, text, position),
            other => {
                let mut illegal = format!("({text}");
                illegal.extend(other);
                Token::new(TokenKind::Illegal, illegal, position)
            }
        }
    }

    /// Collects a timing interval up to its closing bracket as a whitespace separated
    /// list: opening bracket, left value, right value (or `w`), closing bracket.
    fn scan_interval(&mut self, open: char, position: Position) -> Token {
        let mut text = format!("{open} ");
        loop {
            match self.bump() {
                Some(close @ ('[' | ']')) => {
                    text.push(' ');
                    text.push(close);
                    return Token::new(TokenKind::Interval, text, position);
                }
                Some(',') => text.push(' '),
                Some(ch) if ch.is_ascii_digit() || ch == 'w' => text.push(ch),
                Some(ch) if is_whitespace(ch) => {}
                other => {
                    text.extend(other);
                    return Token::new(TokenKind::Illegal, text, position);
                }
            }
        }
    }
}
