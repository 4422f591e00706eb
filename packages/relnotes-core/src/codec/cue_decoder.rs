use serde::{Deserialize, Serialize};

use crate::{
    codec::{
        lexer::{parse_error, Lexer, Token, TokenKind},
        utils::CounterWithLimit,
    },
    types::{
        errors::{error, Error, Result},
        Fields, Value,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of structs and lists.
    pub max_depth: usize,
    /// Maximum number of values in one document.
    pub max_elements: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_elements: 100_000,
        }
    }
}

/// Decodes CUE documents made of concrete values into a `Value` tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct CueDecoder {
    config: DecoderConfig,
}

impl CueDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Parses one file into its root struct.
    ///
    /// A label declared more than once in the same struct is unified, so
    ///
    /// ```
    /// use relnotes_core::codec::CueDecoder;
    ///
    /// let root = CueDecoder::default()
    ///     .decode_document("a: b: 1\na: c: 2\n")
    ///     .unwrap();
    /// let a = root.as_struct().unwrap().get("a").unwrap();
    ///
    /// assert_eq!(a.as_struct().unwrap().len(), 2);
    /// ```
    pub fn decode_document(&self, text: &str) -> Result<Value> {
        let tokens = Lexer::new(text).tokenize()?;

        Parser::new(tokens, self.config).document()
    }
}

/// Unifies two values: structs merge field by field, equal scalars collapse,
/// anything else is a conflict.
pub fn unify(left: Value, right: Value) -> Result<Value> {
    unify_at(left, right, "")
}

fn unify_at(left: Value, right: Value, path: &str) -> Result<Value> {
    match (left, right) {
        (Value::Struct(mut fields), Value::Struct(other)) => {
            for (label, value) in other {
                merge_field(&mut fields, label, value, path)?;
            }
            Ok(Value::Struct(fields))
        }
        (left, right) if left == right => Ok(left),
        (left, right) => Err(error!(
            Unification,
            "conflicting values at `{}`: {} and {}",
            if path.is_empty() { "<root>" } else { path },
            left,
            right
        )),
    }
}

fn merge_field(fields: &mut Fields, label: String, value: Value, path: &str) -> Result<()> {
    let child_path = join_path(path, &label);
    if let Some(existing) = fields.get_mut(&label) {
        let current = std::mem::replace(existing, Value::Null);
        *existing = unify_at(current, value, &child_path)?;
    } else {
        fields.insert(label, value);
    }

    Ok(())
}

pub(crate) fn join_path(path: &str, label: &str) -> String {
    let segment = if is_identifier(label) {
        label.to_string()
    } else {
        format!("{label:?}")
    };

    if path.is_empty() {
        segment
    } else {
        format!("{path}.{segment}")
    }
}

pub(crate) fn is_identifier(label: &str) -> bool {
    let mut chars = label.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '#'))
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth_tracker: CounterWithLimit,
    element_tracker: CounterWithLimit,
}

impl Parser {
    fn new(tokens: Vec<Token>, config: DecoderConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            depth_tracker: CounterWithLimit::new(config.max_depth, "depth"),
            element_tracker: CounterWithLimit::new(config.max_elements, "element"),
        }
    }

    fn document(mut self) -> Result<Value> {
        self.skip_newlines();

        let is_package_clause = matches!(&self.peek().kind, TokenKind::Ident(word) if word == "package")
            && matches!(self.peek_kind_at(1), TokenKind::Ident(_));
        if is_package_clause {
            self.advance();
            self.advance();
            self.end_of_field(&TokenKind::Eof)?;
        }

        let fields = self.fields(&TokenKind::Eof)?;

        Ok(Value::Struct(fields))
    }

    fn peek(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }

        token
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Comma) {
            self.advance();
        }
    }

    fn unexpected(token: &Token, expected: &str) -> Error {
        parse_error(
            token.line,
            token.column,
            format!("expected {expected}, found {}", token.kind.describe()),
        )
    }

    fn with_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth_tracker.increase()?;
        let res = f(self);
        self.depth_tracker.decrease();

        res
    }

    fn fields(&mut self, end: &TokenKind) -> Result<Fields> {
        let mut fields = Fields::new();
        loop {
            self.skip_separators();

            let token = self.peek();
            if &token.kind == end {
                return Ok(fields);
            }
            if token.kind == TokenKind::Eof {
                return Err(parse_error(token.line, token.column, "unclosed `{`"));
            }

            let (label, value) = self.field()?;
            merge_field(&mut fields, label, value, "")?;

            self.end_of_field(end)?;
        }
    }

    fn end_of_field(&self, end: &TokenKind) -> Result<()> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Newline | TokenKind::Comma => Ok(()),
            kind if kind == end => Ok(()),
            _ => Err(Self::unexpected(token, "`,` or a new line")),
        }
    }

    fn at_label(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_) | TokenKind::Str(_))
            && *self.peek_kind_at(1) == TokenKind::Colon
    }

    fn field(&mut self) -> Result<(String, Value)> {
        let label = self.label()?;

        let colon = self.advance();
        if colon.kind != TokenKind::Colon {
            return Err(Self::unexpected(&colon, "`:`"));
        }

        // `a: b: value` is shorthand for `a: { b: value }`.
        let value = if self.at_label() {
            self.with_depth(|parser| {
                let (inner_label, inner_value) = parser.field()?;
                Ok(Value::Struct(Fields::new().with(inner_label, inner_value)))
            })?
        } else {
            self.value()?
        };

        Ok((label, value))
    }

    fn label(&mut self) -> Result<String> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(label) | TokenKind::Str(label) => Ok(label),
            _ => Err(Self::unexpected(&token, "a field label")),
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.element_tracker.increase()?;

        let token = self.advance();
        match &token.kind {
            TokenKind::Str(s) => Ok(Value::String(s.clone())),
            TokenKind::Int(i) => Ok(Value::Int(*i)),
            TokenKind::Float(x) => Ok(Value::Float(*x)),
            TokenKind::Ident(word) if word == "true" => Ok(Value::Bool(true)),
            TokenKind::Ident(word) if word == "false" => Ok(Value::Bool(false)),
            TokenKind::Ident(word) if word == "null" => Ok(Value::Null),
            TokenKind::LBrace => self.with_depth(|parser| {
                let fields = parser.fields(&TokenKind::RBrace)?;
                parser.advance();
                Ok(Value::Struct(fields))
            }),
            TokenKind::LBracket => self.with_depth(|parser| parser.list(&token)),
            _ => Err(Self::unexpected(&token, "a value")),
        }
    }

    fn list(&mut self, open: &Token) -> Result<Value> {
        let mut items = vec![];
        loop {
            self.skip_separators();

            match self.peek().kind {
                TokenKind::RBracket => {
                    self.advance();
                    return Ok(Value::List(items));
                }
                TokenKind::Eof => {
                    return Err(parse_error(open.line, open.column, "unclosed `[`"));
                }
                _ => {}
            }

            items.push(self.value()?);

            let token = self.peek();
            if !matches!(
                token.kind,
                TokenKind::Comma | TokenKind::Newline | TokenKind::RBracket
            ) {
                return Err(Self::unexpected(token, "`,` or `]`"));
            }
        }
    }
}
