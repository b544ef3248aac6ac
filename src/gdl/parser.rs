//! GDL recursive descent parser.
//!
//! Lowers a token stream into the loader's event stream. Supports:
//! - graphs: `g:Label {props} [ path, path ]`, anonymous `[ ... ]`
//! - paths: `(a)-[e:knows]->(b)<-[:likes]-(c)`
//! - edge length bounds: `-[e:knows*1..5]->`
//! - per-path filters: `... WHERE a.age > 42 AND NOT b.name = 'x'`
//!
//! Elements at the top level are separated by `,` or `;` (both optional).

use crate::model::{EdgeLength, PropertyMap, Value};
use crate::predicate::{Comparator, Comparison, Operand, Predicate};
use crate::{Error, Result};

use super::ast::*;
use super::lexer::{Token, TokenKind};
use super::{ErrorStrategy, Recovery};

/// Parser state — wraps a token slice with cursor.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        let tok = self.peek();
        if tok.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {:?}, got {:?} '{}'", kind, tok.kind, tok.text)))
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, msg: String) -> Error {
        Error::SyntaxError {
            position: self.peek().span.start,
            message: msg,
        }
    }

    /// Skip tokens until a top-level element boundary: a `,`/`;` at
    /// bracket depth zero, or EOF. Used for error recovery.
    fn resync(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                TokenKind::Comma | TokenKind::Semicolon if depth <= 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }
}

/// Parse a complete GDL script into an event stream, consulting the given
/// strategy on syntax errors. A failed element leaves no events behind.
pub fn parse_events(tokens: &[Token], strategy: &dyn ErrorStrategy) -> Result<Vec<GdlEvent>> {
    let mut p = Parser::new(tokens);
    let mut events = Vec::new();

    while !p.at(TokenKind::Eof) {
        let checkpoint = events.len();
        match parse_element(&mut p, &mut events) {
            Ok(()) => {
                // Optional separator between elements
                p.eat(TokenKind::Comma);
                p.eat(TokenKind::Semicolon);
            }
            Err(err) => match strategy.on_syntax_error(&err) {
                Recovery::Abort => return Err(err),
                Recovery::SkipElement => {
                    events.truncate(checkpoint);
                    p.resync();
                }
            },
        }
    }

    Ok(events)
}

// ============================================================================
// Element parsers
// ============================================================================

fn parse_element(p: &mut Parser, events: &mut Vec<GdlEvent>) -> Result<()> {
    match p.peek_kind() {
        // `(a)...` — an ungrouped path
        TokenKind::LParen => parse_path(p, events),
        // `g[...]`, `g:Label[...]`, `:Label[...]`, `{..}[...]`, `[...]`
        TokenKind::Identifier | TokenKind::Colon | TokenKind::LBrace | TokenKind::LBracket => {
            parse_graph(p, events)
        }
        kind => Err(p.error(format!("Unexpected token {:?} at start of element", kind))),
    }
}

fn parse_graph(p: &mut Parser, events: &mut Vec<GdlEvent>) -> Result<()> {
    let mut decl = GraphDecl::default();

    if p.at(TokenKind::Identifier) {
        decl.variable = Some(p.advance().text.clone());
    }
    if p.eat(TokenKind::Colon) {
        decl.label = Some(p.expect(TokenKind::Identifier)?.text.clone());
    }
    if p.at(TokenKind::LBrace) {
        decl.properties = parse_properties(p)?;
    }

    p.expect(TokenKind::LBracket)?;
    events.push(GdlEvent::GraphStart(decl));

    if !p.at(TokenKind::RBracket) {
        parse_path(p, events)?;
        while p.eat(TokenKind::Comma) {
            parse_path(p, events)?;
        }
    }
    p.expect(TokenKind::RBracket)?;
    events.push(GdlEvent::GraphEnd);
    Ok(())
}

fn parse_path(p: &mut Parser, events: &mut Vec<GdlEvent>) -> Result<()> {
    parse_vertex(p, events)?;

    while p.at(TokenKind::Dash) || p.at(TokenKind::LeftArrow) {
        parse_edge(p, events)?;
        parse_vertex(p, events)?;
    }

    if p.eat(TokenKind::Where) {
        let predicate = parse_expr(p)?;
        events.push(GdlEvent::Where(predicate));
    }
    Ok(())
}

fn parse_vertex(p: &mut Parser, events: &mut Vec<GdlEvent>) -> Result<()> {
    p.expect(TokenKind::LParen)?;

    let mut decl = VertexDecl::default();
    if p.at(TokenKind::Identifier) {
        decl.variable = Some(p.advance().text.clone());
    }
    if p.eat(TokenKind::Colon) {
        decl.label = Some(p.expect(TokenKind::Identifier)?.text.clone());
    }
    if p.at(TokenKind::LBrace) {
        decl.properties = parse_properties(p)?;
    }

    p.expect(TokenKind::RParen)?;
    events.push(GdlEvent::Vertex(decl));
    Ok(())
}

fn parse_edge(p: &mut Parser, events: &mut Vec<GdlEvent>) -> Result<()> {
    let mut decl = EdgeDecl::default();

    // `<-[...]-` or `-[...]->`
    let incoming = p.eat(TokenKind::LeftArrow);
    if !incoming {
        p.expect(TokenKind::Dash)?;
    }

    if p.eat(TokenKind::LBracket) {
        if p.at(TokenKind::Identifier) {
            decl.variable = Some(p.advance().text.clone());
        }
        if p.eat(TokenKind::Colon) {
            decl.label = Some(p.expect(TokenKind::Identifier)?.text.clone());
        }
        if p.eat(TokenKind::Star) {
            decl.length = Some(parse_length(p)?);
        }
        if p.at(TokenKind::LBrace) {
            decl.properties = parse_properties(p)?;
        }
        p.expect(TokenKind::RBracket)?;
    }

    if incoming {
        p.expect(TokenKind::Dash)?;
        decl.direction = Direction::RightToLeft;
    } else {
        p.expect(TokenKind::Arrow)?;
        decl.direction = Direction::LeftToRight;
    }

    events.push(GdlEvent::Edge(decl));
    Ok(())
}

/// Length bounds after `*`: `*`, `*2`, `*2..5`, `*..5`.
fn parse_length(p: &mut Parser) -> Result<EdgeLength> {
    let lower = if p.at(TokenKind::Integer) {
        Some(parse_u32(p)?)
    } else {
        None
    };
    if p.eat(TokenKind::DotDot) {
        let upper = if p.at(TokenKind::Integer) {
            Some(parse_u32(p)?)
        } else {
            None
        };
        Ok(EdgeLength { lower, upper })
    } else {
        // `*n` means exactly n hops
        Ok(EdgeLength { lower, upper: lower })
    }
}

fn parse_u32(p: &mut Parser) -> Result<u32> {
    let tok = p.advance();
    tok.text.parse::<u32>().map_err(|_| Error::SyntaxError {
        position: tok.span.start,
        message: "Invalid length bound".into(),
    })
}

// ============================================================================
// Properties
// ============================================================================

fn parse_properties(p: &mut Parser) -> Result<PropertyMap> {
    p.expect(TokenKind::LBrace)?;
    let mut map = PropertyMap::new();
    if !p.at(TokenKind::RBrace) {
        let (key, value) = parse_property(p)?;
        map.insert(key, value);
        while p.eat(TokenKind::Comma) {
            let (key, value) = parse_property(p)?;
            map.insert(key, value);
        }
    }
    p.expect(TokenKind::RBrace)?;
    Ok(map)
}

fn parse_property(p: &mut Parser) -> Result<(String, Value)> {
    let key = p.expect(TokenKind::Identifier)?.text.clone();
    p.expect(TokenKind::Colon)?;
    let value = parse_literal(p)?;
    Ok((key, value))
}

fn parse_literal(p: &mut Parser) -> Result<Value> {
    let negate = p.eat(TokenKind::Dash);
    match p.peek_kind() {
        TokenKind::Integer => {
            let tok = p.advance();
            let val = tok.text.parse::<i64>().map_err(|_| Error::SyntaxError {
                position: tok.span.start,
                message: "Invalid integer".into(),
            })?;
            Ok(Value::Int(if negate { -val } else { val }))
        }
        TokenKind::Float => {
            let tok = p.advance();
            let val = tok.text.parse::<f64>().map_err(|_| Error::SyntaxError {
                position: tok.span.start,
                message: "Invalid float".into(),
            })?;
            Ok(Value::Float(if negate { -val } else { val }))
        }
        _ if negate => Err(p.error("Expected number after '-'".into())),
        TokenKind::StringLiteral => {
            let tok = p.advance();
            Ok(Value::String(tok.text.clone()))
        }
        TokenKind::True => {
            p.advance();
            Ok(Value::Bool(true))
        }
        TokenKind::False => {
            p.advance();
            Ok(Value::Bool(false))
        }
        TokenKind::Null => {
            p.advance();
            Ok(Value::Null)
        }
        kind => Err(p.error(format!("Expected literal, got {:?}", kind))),
    }
}

// ============================================================================
// Filter expressions (precedence climbing: OR < AND < NOT < comparison)
// ============================================================================

fn parse_expr(p: &mut Parser) -> Result<Predicate> {
    parse_or_expr(p)
}

fn parse_or_expr(p: &mut Parser) -> Result<Predicate> {
    let mut left = parse_and_expr(p)?;
    while p.eat(TokenKind::Or) {
        let right = parse_and_expr(p)?;
        left = Predicate::or(left, right);
    }
    Ok(left)
}

fn parse_and_expr(p: &mut Parser) -> Result<Predicate> {
    let mut left = parse_not_expr(p)?;
    while p.eat(TokenKind::And) {
        let right = parse_not_expr(p)?;
        left = Predicate::and(left, right);
    }
    Ok(left)
}

fn parse_not_expr(p: &mut Parser) -> Result<Predicate> {
    if p.eat(TokenKind::Not) {
        let inner = parse_not_expr(p)?;
        Ok(Predicate::not(inner))
    } else {
        parse_primary_expr(p)
    }
}

fn parse_primary_expr(p: &mut Parser) -> Result<Predicate> {
    if p.eat(TokenKind::LParen) {
        let inner = parse_expr(p)?;
        p.expect(TokenKind::RParen)?;
        return Ok(inner);
    }
    parse_comparison(p)
}

fn parse_comparison(p: &mut Parser) -> Result<Predicate> {
    let left = parse_operand(p)?;

    let comparator = match p.peek_kind() {
        TokenKind::Eq => Comparator::Eq,
        TokenKind::Neq => Comparator::Neq,
        TokenKind::Lt => Comparator::Lt,
        TokenKind::Lte => Comparator::Lte,
        TokenKind::Gt => Comparator::Gt,
        TokenKind::Gte => Comparator::Gte,
        kind => return Err(p.error(format!("Expected comparator, got {:?}", kind))),
    };
    p.advance();

    let right = parse_operand(p)?;
    Ok(Predicate::Comparison(Comparison { left, comparator, right }))
}

fn parse_operand(p: &mut Parser) -> Result<Operand> {
    if p.at(TokenKind::Identifier) {
        let variable = p.advance().text.clone();
        if p.eat(TokenKind::Dot) {
            let key = p.expect(TokenKind::Identifier)?.text.clone();
            Ok(Operand::Property { variable, key })
        } else {
            Ok(Operand::Variable(variable))
        }
    } else {
        Ok(Operand::Literal(parse_literal(p)?))
    }
}

// ============================================================================
// Tests
// ============================================================================
