//! Reference expression service over anchored path expressions.
//!
//! Understands enough of an expression language to infer result columns:
//!
//! ```text
//! columns := expr (',' expr)*
//! expr    := or
//! or      := and ('or' and)*
//! and     := not ('and' not)*
//! not     := 'not' not | cmp
//! cmp     := sum (('=' | '!=' | '<' | '<=' | '>' | '>=') sum)?
//! sum     := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := literal | '(' expr ')' | ident '(' expr ')' | path
//! path    := root ('.' ident)*
//! root    := ident | ident '::' ident
//! ```
//!
//! A root is an anchor (`self`) or a concept name, optionally prefixed by a
//! module or import alias (`lib::Tag`).

use schemalink_foundation::Name;
use schemalink_schema::{BUILTIN_MODULE, Prototype, PrototypeKind};

use super::{ExprContext, ExprError, ExprTree, ExpressionService, ResultColumn};

/// The default [`ExpressionService`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PathExpressionService;

impl PathExpressionService {
    /// Creates the service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionService for PathExpressionService {
    fn normalize(&self, expr: &str, ctx: &ExprContext<'_>) -> Result<ExprTree, ExprError> {
        let tokens = Lexer::new(expr).tokenize()?;
        let columns = Parser::new(tokens, expr.len()).parse_columns()?;

        let mut typer = Typer {
            ctx,
            references: Vec::new(),
        };
        let mut texts = Vec::with_capacity(columns.len());
        let mut result = Vec::with_capacity(columns.len());
        for column in &columns {
            let (text, types) = typer.infer(column)?;
            texts.push(text);
            result.push(ResultColumn { types });
        }
        Ok(ExprTree {
            text: texts.join(", "),
            columns: result,
            references: typer.references,
        })
    }
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Punct(&'static str),
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

const PUNCTS: &[&str] = &[
    "::", "!=", "<=", ">=", ".", ",", "(", ")", "+", "-", "*", "/", "=", "<", ">",
];

struct Lexer<'src> {
    source: &'src str,
    position: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> ExprError {
        ExprError::Syntax {
            message: message.into(),
            offset,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        loop {
            while self.peek_char().is_some_and(char::is_whitespace) {
                self.advance();
            }
            let offset = self.position;
            let Some(c) = self.peek_char() else {
                return Ok(tokens);
            };
            let kind = if c.is_ascii_digit() {
                self.scan_number()?
            } else if c == '_' || c.is_alphabetic() {
                self.scan_ident()
            } else if c == '\'' || c == '"' {
                self.scan_string(c)?
            } else if let Some(p) = PUNCTS.iter().find(|p| self.rest().starts_with(**p)) {
                self.position += p.len();
                TokenKind::Punct(p)
            } else {
                return Err(self.error(format!("unexpected character `{c}`"), offset));
            };
            tokens.push(Token { kind, offset });
        }
    }

    fn scan_ident(&mut self) -> TokenKind {
        let start = self.position;
        while self
            .peek_char()
            .is_some_and(|c| c == '_' || c.is_alphanumeric())
        {
            self.advance();
        }
        TokenKind::Ident(self.source[start..self.position].to_string())
    }

    fn scan_number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.position;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let mut rest = self.rest().chars();
        let is_float = rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.source[start..self.position];
        if is_float {
            text.parse()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("invalid number `{text}`"), start))
        } else {
            text.parse()
                .map(TokenKind::Int)
                .map_err(|_| self.error(format!("integer `{text}` out of range"), start))
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<TokenKind, ExprError> {
        let start = self.position;
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated string", start)),
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string", start)),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

// =============================================================================
// Parser
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Literal(Literal),
    Path {
        module: Option<String>,
        root: String,
        steps: Vec<String>,
    },
    Call {
        function: String,
        argument: Box<Expr>,
    },
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: &'static str,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

fn precedence(op: &str) -> u8 {
    match op {
        "or" => 1,
        "and" => 2,
        "=" | "!=" | "<" | "<=" | ">" | ">=" => 4,
        "+" | "-" => 5,
        _ => 6,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.offset)
    }

    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError::Syntax {
            message: message.into(),
            offset: self.offset(),
        }
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), Some(TokenKind::Punct(p)) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(TokenKind::Ident(i)) if i == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: &str) -> Result<(), ExprError> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{punct}`")))
        }
    }

    fn ident(&mut self) -> Result<String, ExprError> {
        match self.peek() {
            Some(TokenKind::Ident(i)) => {
                let i = i.clone();
                self.pos += 1;
                Ok(i)
            }
            _ => Err(self.error("expected a name")),
        }
    }

    fn parse_columns(mut self) -> Result<Vec<Expr>, ExprError> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }
        let mut columns = vec![self.parse_or()?];
        while self.eat_punct(",") {
            columns.push(self.parse_or()?);
        }
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(columns)
    }

    fn binary(op: &'static str, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            left = Self::binary("or", left, self.parse_and()?);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("and") {
            left = Self::binary("and", left, self.parse_not()?);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ExprError> {
        if self.eat_keyword("not") {
            return Ok(Expr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let left = self.parse_sum()?;
        for op in ["=", "!=", "<", "<=", ">", ">="] {
            if self.eat_punct(op) {
                return Ok(Self::binary(op, left, self.parse_sum()?));
            }
        }
        Ok(left)
    }

    fn parse_sum(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.eat_punct("+") {
                "+"
            } else if self.eat_punct("-") {
                "-"
            } else {
                return Ok(left);
            };
            left = Self::binary(op, left, self.parse_term()?);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.eat_punct("*") {
                "*"
            } else if self.eat_punct("/") {
                "/"
            } else {
                return Ok(left);
            };
            left = Self::binary(op, left, self.parse_unary()?);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat_punct("-") {
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let literal = match self.peek() {
            Some(TokenKind::Int(i)) => Some(Literal::Int(*i)),
            Some(TokenKind::Float(f)) => Some(Literal::Float(*f)),
            Some(TokenKind::Str(s)) => Some(Literal::Str(s.clone())),
            Some(TokenKind::Ident(i)) if i == "true" => Some(Literal::Bool(true)),
            Some(TokenKind::Ident(i)) if i == "false" => Some(Literal::Bool(false)),
            _ => None,
        };
        if let Some(literal) = literal {
            self.pos += 1;
            return Ok(Expr::Literal(literal));
        }
        if self.eat_punct("(") {
            let inner = self.parse_or()?;
            self.expect_punct(")")?;
            return Ok(inner);
        }

        let first = self.ident()?;
        if self.eat_punct("(") {
            let argument = self.parse_or()?;
            self.expect_punct(")")?;
            return Ok(Expr::Call {
                function: first,
                argument: Box::new(argument),
            });
        }
        let (module, root) = if self.eat_punct("::") {
            (Some(first), self.ident()?)
        } else {
            (None, first)
        };
        let mut steps = Vec::new();
        while self.eat_punct(".") {
            steps.push(self.ident()?);
        }
        Ok(Expr::Path {
            module,
            root,
            steps,
        })
    }
}

// =============================================================================
// Type inference
// =============================================================================

fn builtin(name: &str) -> Name {
    Name::new(BUILTIN_MODULE, name)
}

struct Typer<'c, 'a> {
    ctx: &'c ExprContext<'a>,
    references: Vec<Name>,
}

impl Typer<'_, '_> {
    /// Returns the canonical text and candidate types of `expr`.
    fn infer(&mut self, expr: &Expr) -> Result<(String, Vec<Name>), ExprError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(i) => (i.to_string(), vec![builtin("int64")]),
                Literal::Float(f) => (format!("{f:?}"), vec![builtin("float64")]),
                Literal::Str(s) => (
                    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
                    vec![builtin("str")],
                ),
                Literal::Bool(b) => (b.to_string(), vec![builtin("bool")]),
            }),
            Expr::Path {
                module,
                root,
                steps,
            } => self.path(module.as_deref(), root, steps),
            Expr::Call { function, argument } => {
                let (text, types) = self.infer(argument)?;
                let result = match function.as_str() {
                    "count" | "len" => vec![builtin("int64")],
                    "exists" => vec![builtin("bool")],
                    "lower" | "upper" | "trim" => vec![builtin("str")],
                    "sum" | "min" | "max" => types,
                    other => {
                        return Err(ExprError::Unresolved(format!("unknown function {other}")));
                    }
                };
                Ok((format!("{function}({text})"), result))
            }
            Expr::Not(inner) => {
                let (text, _) = self.infer(inner)?;
                Ok((format!("not {}", wrap(inner, &text, 3)), vec![builtin("bool")]))
            }
            Expr::Neg(inner) => {
                let (text, types) = self.infer(inner)?;
                Ok((format!("-{}", wrap(inner, &text, 7)), types))
            }
            Expr::Binary { op, left, right } => {
                let prec = precedence(op);
                let (lt, ltypes) = self.infer(left)?;
                let (rt, rtypes) = self.infer(right)?;
                let text = format!("{} {op} {}", wrap(left, &lt, prec), wrap(right, &rt, prec + 1));
                let types = match *op {
                    "+" | "-" | "*" | "/" => {
                        let float = builtin("float64");
                        if ltypes.contains(&float) || rtypes.contains(&float) {
                            vec![float]
                        } else {
                            ltypes
                        }
                    }
                    _ => vec![builtin("bool")],
                };
                Ok((text, types))
            }
        }
    }

    fn path(
        &mut self,
        module: Option<&str>,
        root: &str,
        steps: &[String],
    ) -> Result<(String, Vec<Name>), ExprError> {
        let (mut text, mut types) = match (module, self.ctx.anchors.get(root)) {
            (None, Some(source)) => (root.to_string(), vec![source.clone()]),
            _ => {
                let written = module.map_or_else(|| root.to_string(), |m| format!("{m}.{root}"));
                let name = self
                    .ctx
                    .namespace
                    .resolve_opt(self.ctx.index, &written, &[PrototypeKind::Concept])
                    .ok_or_else(|| ExprError::Unresolved(format!("unknown concept {written}")))?;
                (format!("{}::{}", name.module(), name.name()), vec![name])
            }
        };

        if steps.is_empty() {
            self.references.extend(types.iter().cloned());
        }
        for step in steps {
            self.references.extend(types.iter().cloned());
            types = self.step(&types, step)?;
            text.push('.');
            text.push_str(step);
        }
        Ok((text, types))
    }

    fn step(&self, sources: &[Name], step: &str) -> Result<Vec<Name>, ExprError> {
        let index = self.ctx.index;
        let mut out: Vec<Name> = Vec::new();
        let mut found = false;
        for source in sources {
            let pointers = match index.get(source) {
                Some(Prototype::Concept(c)) => &c.pointers,
                Some(Prototype::Link(l)) => &l.pointers,
                Some(Prototype::Atom(_)) => {
                    return Err(ExprError::Unresolved(format!(
                        "atom {source} has no pointer {step}"
                    )));
                }
                _ => continue,
            };
            let preferred = self.ctx.namespace.resolve_opt(
                index,
                step,
                &[PrototypeKind::Link, PrototypeKind::LinkProperty],
            );
            let key = preferred
                .filter(|p| pointers.contains_key(p))
                .or_else(|| pointers.keys().find(|k| k.name() == step).cloned());
            let Some(key) = key else {
                continue;
            };
            found = true;
            for decl in pointers.get(&key).into_iter().flatten() {
                let target = match index.get(decl) {
                    Some(Prototype::Link(l)) => l.target.clone(),
                    Some(Prototype::LinkProperty(p)) => p.target.clone(),
                    Some(Prototype::Computable(c)) => match &c.target {
                        Some(t) => Some(t.clone()),
                        None => return Err(ExprError::Pending(c.name.clone())),
                    },
                    _ => None,
                };
                if let Some(target) = target {
                    if !out.contains(&target) {
                        out.push(target);
                    }
                }
            }
        }
        if found {
            Ok(out)
        } else {
            let names: Vec<String> = sources.iter().map(ToString::to_string).collect();
            Err(ExprError::Unresolved(format!(
                "{} has no pointer {step}",
                names.join(" | ")
            )))
        }
    }
}

/// Parenthesizes a binary operand that binds looser than `min`.
fn wrap(expr: &Expr, text: &str, min: u8) -> String {
    let inner = match expr {
        Expr::Binary { op, .. } => precedence(op),
        Expr::Not(_) => 3,
        _ => u8::MAX,
    };
    if inner < min {
        format!("({text})")
    } else {
        text.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
