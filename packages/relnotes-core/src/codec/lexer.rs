use crate::types::errors::{Error, Result};

const TRIPLE_QUOTE: &str = "\"\"\"";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Newline,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(ident) => format!("`{ident}`"),
            TokenKind::Str(s) => format!("string {s:?}"),
            TokenKind::Int(i) => format!("int {i}"),
            TokenKind::Float(x) => format!("float {x:?}"),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub(crate) fn parse_error(line: usize, column: usize, msg: impl Into<String>) -> Error {
    Error::Parse {
        line,
        column,
        msg: msg.into(),
    }
}

/// Splits CUE source into tokens. Line comments and horizontal whitespace are
/// dropped, line breaks are kept since they separate fields.
pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = vec![];
        loop {
            self.skip_blanks();
            let (line, column) = (self.line, self.column);

            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
                return Ok(tokens);
            };

            let kind = match c {
                '\n' => self.single(TokenKind::Newline),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ':' => self.single(TokenKind::Colon),
                ',' => self.single(TokenKind::Comma),
                '"' if self.starts_with(TRIPLE_QUOTE) => self.multiline_string()?,
                '"' => self.string()?,
                '-' | '0'..='9' => self.number()?,
                c if is_ident_start(c) => self.ident(),
                other => {
                    return Err(parse_error(
                        line,
                        column,
                        format!("unexpected character `{other}`"),
                    ))
                }
            };

            tokens.push(Token { kind, line, column });
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(offset, c)| self.chars.get(self.pos + offset) == Some(&c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn skip_blanks(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.bump();
                }
                Some('/') if self.starts_with("//") => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn ident(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            ident.push(c);
            self.bump();
        }

        TokenKind::Ident(ident)
    }

    fn number(&mut self) -> Result<TokenKind> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if text.ends_with(['e', 'E']) => {}
                _ => break,
            }
            text.push(c);
            self.bump();
        }

        let invalid = || parse_error(line, column, format!("invalid number `{text}`"));
        if is_float {
            text.parse().map(TokenKind::Float).map_err(|_| invalid())
        } else {
            text.parse().map(TokenKind::Int).map_err(|_| invalid())
        }
    }

    fn string(&mut self) -> Result<TokenKind> {
        let (line, column) = (self.line, self.column);
        let unterminated = || parse_error(line, column, "unterminated string");
        self.bump();

        let mut raw = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(unterminated()),
                Some('"') => break,
                Some('\\') => {
                    raw.push('\\');
                    match self.bump() {
                        Some(c) if c != '\n' => raw.push(c),
                        _ => return Err(unterminated()),
                    }
                }
                Some(c) => raw.push(c),
            }
        }

        unescape(&raw)
            .map(TokenKind::Str)
            .map_err(|msg| parse_error(line, column, msg))
    }

    /// The body starts on the line after the opening quotes. Whatever
    /// whitespace precedes the closing quotes is removed from every line.
    fn multiline_string(&mut self) -> Result<TokenKind> {
        let (line, column) = (self.line, self.column);
        self.bump_n(TRIPLE_QUOTE.len());

        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
        if self.bump() != Some('\n') {
            return Err(parse_error(
                line,
                column,
                "multi-line string must start on a new line",
            ));
        }

        let mut lines = vec![];
        loop {
            if self.peek().is_none() {
                return Err(parse_error(line, column, "unterminated multi-line string"));
            }

            let mut current = String::new();
            while let Some(c) = self.peek().filter(|c| matches!(c, ' ' | '\t')) {
                current.push(c);
                self.bump();
            }

            if self.starts_with(TRIPLE_QUOTE) {
                self.bump_n(TRIPLE_QUOTE.len());
                let raw = dedent(&lines, &current)
                    .map_err(|msg| parse_error(line, column, msg))?;

                return unescape(&raw)
                    .map(TokenKind::Str)
                    .map_err(|msg| parse_error(line, column, msg));
            }

            while let Some(c) = self.peek().filter(|c| *c != '\n') {
                current.push(c);
                self.bump();
            }
            self.bump();
            if current.ends_with('\r') {
                current.pop();
            }
            lines.push(current);
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '#')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#')
}

fn dedent(lines: &[String], indent: &str) -> std::result::Result<String, String> {
    let stripped = lines
        .iter()
        .map(|line| match line.strip_prefix(indent) {
            Some(rest) => Ok(rest),
            None if line.trim().is_empty() => Ok(""),
            None => Err(format!(
                "line {line:?} is not indented like the closing quotes"
            )),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(stripped.join("\n"))
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape `\\u{hex}`"))?;
                out.push(decoded);
            }
            Some(other) => return Err(format!("unknown escape sequence `\\{other}`")),
            None => return Err("dangling `\\` at end of string".to_string()),
        }
    }

    Ok(out)
}
