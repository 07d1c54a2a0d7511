use super::ParseError;

/// Token categories produced by [`tokenize`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Keyword, label, language, title kind or function name.
    Ident(String),
    /// Quoted string literal with escapes resolved.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `+`
    Plus,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `!`
    Bang,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// End of input.
    Eof,
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token category and payload.
    pub kind: TokenKind,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
}

/// Split script text into tokens. The last token is always [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        src: source,
        index: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    loop {
        lexer.skip_trivia()?;
        let (line, column) = (lexer.line, lexer.column);
        let Some(ch) = lexer.current() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                line,
                column,
            });
            return Ok(tokens);
        };
        let kind = match ch {
            '(' => lexer.single(TokenKind::LParen),
            ')' => lexer.single(TokenKind::RParen),
            '{' => lexer.single(TokenKind::LBrace),
            '}' => lexer.single(TokenKind::RBrace),
            ',' => lexer.single(TokenKind::Comma),
            ';' => lexer.single(TokenKind::Semicolon),
            '+' => lexer.single(TokenKind::Plus),
            '=' => lexer.pair('=', TokenKind::EqEq, "expected '=='")?,
            '&' => lexer.pair('&', TokenKind::AndAnd, "expected '&&'")?,
            '|' => lexer.pair('|', TokenKind::OrOr, "expected '||'")?,
            '!' => lexer.maybe_pair('=', TokenKind::NotEq, TokenKind::Bang),
            '<' => lexer.maybe_pair('=', TokenKind::Le, TokenKind::Lt),
            '>' => lexer.maybe_pair('=', TokenKind::Ge, TokenKind::Gt),
            '\'' | '"' => lexer.string(ch)?,
            '-' | '0'..='9' => lexer.number()?,
            c if is_ident_start(c) => lexer.ident(),
            other => return Err(lexer.error(format!("unexpected character '{}'", other))),
        };
        tokens.push(Token { kind, line, column });
    }
}

struct Lexer<'a> {
    src: &'a str,
    index: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn remaining(&self) -> &'a str {
        &self.src[self.index..]
    }

    fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current() {
            self.index += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line, self.column)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            while let Some(ch) = self.current() {
                if ch.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.remaining().starts_with("//") {
                while let Some(ch) = self.current() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }
            if self.remaining().starts_with("/*") {
                let (line, column) = (self.line, self.column);
                self.advance();
                self.advance();
                loop {
                    if self.remaining().starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.current().is_none() {
                        return Err(ParseError::new("unterminated block comment", line, column));
                    }
                    self.advance();
                }
                continue;
            }
            return Ok(());
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn pair(&mut self, second: char, kind: TokenKind, message: &str) -> Result<TokenKind, ParseError> {
        if self.peek() == Some(second) {
            self.advance();
            self.advance();
            Ok(kind)
        } else {
            Err(self.error(message))
        }
    }

    fn maybe_pair(&mut self, second: char, long: TokenKind, short: TokenKind) -> TokenKind {
        self.advance();
        if self.current() == Some(second) {
            self.advance();
            long
        } else {
            short
        }
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        let mut buf = String::new();
        while let Some(ch) = self.current() {
            self.advance();
            match ch {
                c if c == quote => return Ok(TokenKind::Str(buf)),
                '\\' => {
                    let escaped = self
                        .current()
                        .ok_or_else(|| self.error("incomplete escape"))?;
                    match escaped {
                        '\'' | '"' | '\\' => buf.push(escaped),
                        'n' => buf.push('\n'),
                        't' => buf.push('\t'),
                        // unknown escapes stay literal, e.g. `D:\Anime`
                        other => {
                            buf.push('\\');
                            buf.push(other);
                        }
                    }
                    self.advance();
                }
                _ => buf.push(ch),
            }
        }
        Err(ParseError::new("unterminated string literal", line, column))
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.index;
        if self.current() == Some('-') {
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("unexpected character '-'"));
            }
            self.advance();
        }
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.src[start..self.index];
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| self.error(format!("integer literal out of range: {}", text)))
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.index;
        while self.current().is_some_and(is_ident_continue) {
            self.advance();
        }
        TokenKind::Ident(self.src[start..self.index].to_string())
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
