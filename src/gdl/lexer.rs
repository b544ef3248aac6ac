//! GDL lexer — tokenizes a pattern script.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Source text, except for string literals (unescaped content) and
    /// numbers (type suffix stripped).
    pub text: String,
}

/// Source span, byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords (case-insensitive)
    Where, And, Or, Not, True, False, Null,

    // Literals
    Integer, Float, StringLiteral,

    // Identifiers (variables, labels, property keys)
    Identifier,

    // Punctuation
    LParen, RParen, LBracket, RBracket, LBrace, RBrace,
    Dot, Comma, Colon, Semicolon, Star,
    Arrow,      // ->
    LeftArrow,  // <-
    Dash,       // -
    DotDot,     // ..

    // Comparators
    Eq, Neq, Lt, Lte, Gt, Gte,

    // EOF
    Eof,
}

/// Tokenize a GDL script.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });
    Ok(tokens)
}

/// Byte-cursor lexer state.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn err(&self, position: usize, message: impl Into<String>) -> Error {
        Error::SyntaxError { position, message: message.into() }
    }

    /// Skip whitespace, `// line` and `/* block */` comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let open = self.pos;
                    self.bump();
                    self.bump();
                    match self.input[self.pos..].find("*/") {
                        Some(offset) => self.pos += offset + 2,
                        None => return Err(self.err(open, "Unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '(' => { self.bump(); TokenKind::LParen }
            ')' => { self.bump(); TokenKind::RParen }
            '[' => { self.bump(); TokenKind::LBracket }
            ']' => { self.bump(); TokenKind::RBracket }
            '{' => { self.bump(); TokenKind::LBrace }
            '}' => { self.bump(); TokenKind::RBrace }
            ',' => { self.bump(); TokenKind::Comma }
            ':' => { self.bump(); TokenKind::Colon }
            ';' => { self.bump(); TokenKind::Semicolon }
            '*' => { self.bump(); TokenKind::Star }
            '=' => { self.bump(); TokenKind::Eq }
            '.' => {
                self.bump();
                if self.eat('.') { TokenKind::DotDot } else { TokenKind::Dot }
            }
            '-' => {
                self.bump();
                if self.eat('>') { TokenKind::Arrow } else { TokenKind::Dash }
            }
            '>' => {
                self.bump();
                if self.eat('=') { TokenKind::Gte } else { TokenKind::Gt }
            }
            '<' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::Lte
                } else if self.eat('-') {
                    TokenKind::LeftArrow
                } else if self.eat('>') {
                    TokenKind::Neq
                } else {
                    TokenKind::Lt
                }
            }
            '!' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::Neq
                } else {
                    return Err(self.err(start, "expected '=' after '!'"));
                }
            }
            '\'' | '"' => return self.string_literal().map(Some),
            c if c.is_ascii_digit() => return self.number().map(Some),
            c if c.is_alphabetic() || c == '_' => return Ok(Some(self.word())),
            other => {
                return Err(self.err(start, format!("Unexpected character: '{other}'")));
            }
        };

        Ok(Some(self.spanned(kind, start)))
    }

    /// A token whose text is exactly its source slice.
    fn spanned(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span { start, end: self.pos },
            text: self.input[start..self.pos].to_owned(),
        }
    }

    /// Single- or double-quoted string. Escapes: `\n`, `\t`, `\\`, and the
    /// active quote character; any other escape is kept verbatim.
    fn string_literal(&mut self) -> Result<Token> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\\') => text.push('\\'),
                    Some(c) if c == quote => text.push(c),
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => return Err(self.err(start, "Unterminated string literal")),
                },
                Some(c) if c == quote => {
                    return Ok(Token {
                        kind: TokenKind::StringLiteral,
                        span: Span { start, end: self.pos },
                        text,
                    });
                }
                Some(c) => text.push(c),
                None => return Err(self.err(start, "Unterminated string literal")),
            }
        }
    }

    /// Integer or float, with the GDL type suffixes: `10L`, `3.14f`, `2.5d`.
    /// The suffix selects the kind but is excluded from the token text.
    fn number(&mut self) -> Result<Token> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let digits_end = self.pos;
        match self.peek() {
            Some('f' | 'F' | 'd' | 'D') => {
                is_float = true;
                self.bump();
            }
            Some('l' | 'L') if !is_float => {
                self.bump();
            }
            _ => {}
        }
        Ok(Token {
            kind: if is_float { TokenKind::Float } else { TokenKind::Integer },
            span: Span { start, end: self.pos },
            text: self.input[start..digits_end].to_owned(),
        })
    }

    /// Identifier or keyword.
    fn word(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.spanned(kind, start)
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    const KEYWORDS: [(&str, TokenKind); 7] = [
        ("WHERE", TokenKind::Where),
        ("AND", TokenKind::And),
        ("OR", TokenKind::Or),
        ("NOT", TokenKind::Not),
        ("TRUE", TokenKind::True),
        ("FALSE", TokenKind::False),
        ("NULL", TokenKind::Null),
    ];
    KEYWORDS
        .iter()
        .find(|(k, _)| word.eq_ignore_ascii_case(k))
        .map(|&(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_vertex_pattern() {
        assert_eq!(kinds("(alice:Person)"), vec![
            TokenKind::LParen,
            TokenKind::Identifier, // alice
            TokenKind::Colon,
            TokenKind::Identifier, // Person
            TokenKind::RParen,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_edge_pattern() {
        assert_eq!(kinds("(a)-[:knows]->(b)"), vec![
            TokenKind::LParen,
            TokenKind::Identifier, // a
            TokenKind::RParen,
            TokenKind::Dash,
            TokenKind::LBracket,
            TokenKind::Colon,
            TokenKind::Identifier, // knows
            TokenKind::RBracket,
            TokenKind::Arrow,
            TokenKind::LParen,
            TokenKind::Identifier, // b
            TokenKind::RParen,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_incoming_edge() {
        let tokens = tokenize("(a)<-[e]-(b)").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::LeftArrow));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Dash));
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize("'hello world'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "hello world");
        assert_eq!(tokens[0].span, Span { start: 0, end: 13 });
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""say \"hi\"\n""#).unwrap();
        assert_eq!(tokens[0].text, "say \"hi\"\n");
    }

    #[test]
    fn test_number_suffixes() {
        let tokens = tokenize("{a: 10L, b: 3.14f, c: 2d}").unwrap();
        let nums: Vec<_> = tokens.iter()
            .filter(|t| matches!(t.kind, TokenKind::Integer | TokenKind::Float))
            .collect();
        assert_eq!(nums[0].kind, TokenKind::Integer);
        assert_eq!(nums[0].text, "10");
        assert_eq!(nums[1].kind, TokenKind::Float);
        assert_eq!(nums[1].text, "3.14");
        assert_eq!(nums[2].kind, TokenKind::Float);
        assert_eq!(nums[2].text, "2");
    }

    #[test]
    fn test_length_range_does_not_eat_dots_as_float() {
        assert_eq!(kinds("*1..5"), vec![
            TokenKind::Star,
            TokenKind::Integer,
            TokenKind::DotDot,
            TokenKind::Integer,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(kinds("where AND oR nOt"), vec![
            TokenKind::Where, TokenKind::And, TokenKind::Or, TokenKind::Not,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_comparators() {
        assert_eq!(kinds("= <> != < <= > >="), vec![
            TokenKind::Eq, TokenKind::Neq, TokenKind::Neq, TokenKind::Lt,
            TokenKind::Lte, TokenKind::Gt, TokenKind::Gte,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize("(a) // trailing\n/* block\ncomment */ (b)").unwrap();
        let idents: Vec<_> = tokens.iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["a", "b"]);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(tokenize("(a {name: 'oops").is_err());
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(tokenize("(a) /* unterminated").is_err());
    }

    #[test]
    fn test_bare_bang_rejected() {
        assert!(tokenize("a ! b").is_err());
    }
}
