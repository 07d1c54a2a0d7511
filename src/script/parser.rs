use crate::metadata::{Language, TitleKind};

use super::ast::{
    BoolExpr, CollExpr, CompareOp, ConditionalArm, Expr, HasFilter, NumExpr, ScriptTree, Statement,
    StrExpr, Target,
};
use super::labels::Label;
use super::lexer::{Token, TokenKind, tokenize};
use super::ParseError;

/// Words with a fixed meaning in the grammar. `true`/`false` are literals, not keywords.
const KEYWORDS: &[&str] = &[
    "if",
    "else",
    "and",
    "or",
    "not",
    "has",
    "set",
    "add",
    "replace",
    "skip",
    "cancel",
    "filename",
    "destination",
    "subfolder",
];

/// Parse script text into a [`ScriptTree`].
pub fn parse_script(source: &str) -> Result<ScriptTree, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, index: 0 };
    let mut statements = Vec::new();
    loop {
        parser.skip_semicolons();
        if parser.at_eof() {
            break;
        }
        statements.push(parser.parse_statement()?);
    }
    Ok(ScriptTree { statements })
}

type ParseResult<T> = std::result::Result<T, ParseError>;

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.index + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn at_word(&self, word: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(name) if name == word)
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> ParseResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}, found {}", what, describe(&self.current().kind))))
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(&TokenKind::Semicolon) {}
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.current();
        ParseError::new(message, token.line, token.column)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.starts_operand() {
            // bare operands append to the filename
            let statement = self.parse_bare_add(Target::DefaultFilename)?;
            self.skip_semicolons();
            return Ok(statement);
        }
        let name = match &self.current().kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error(format!("expected statement, found {}", describe(other))));
            }
        };
        let statement = match name.as_str() {
            "if" => return self.parse_conditional(),
            "filename" | "destination" | "subfolder" => {
                self.advance();
                let target = match name.as_str() {
                    "filename" => Target::Filename,
                    "destination" => Target::Destination,
                    _ => Target::Subfolder,
                };
                if self.at_word("set") || self.at_word("add") || self.at_word("replace") {
                    self.parse_action(target)?
                } else if self.starts_operand() {
                    self.parse_bare_add(target)?
                } else {
                    return Err(self.error(format!(
                        "expected set, add, replace or a value after '{}', found {}",
                        name,
                        describe(&self.current().kind)
                    )));
                }
            }
            "set" | "add" | "replace" => self.parse_action(Target::DefaultFilename)?,
            "skip" => {
                self.advance();
                Statement::Skip
            }
            "cancel" => {
                self.advance();
                Statement::Cancel(self.parse_operands(0)?)
            }
            _ => return Err(self.error(format!("expected statement, found '{}'", name))),
        };
        self.skip_semicolons();
        Ok(statement)
    }

    fn parse_action(&mut self, target: Target) -> ParseResult<Statement> {
        let verb = self.advance();
        match verb.kind {
            TokenKind::Ident(ref word) if word == "replace" => {
                let from = self.parse_operand()?;
                let to = self.parse_operand()?;
                Ok(Statement::Replace { target, from, to })
            }
            TokenKind::Ident(ref word) if word == "set" => Ok(Statement::Set {
                target,
                parts: self.parse_operands(1)?,
            }),
            _ => Ok(Statement::Add {
                target,
                parts: self.parse_operands(1)?,
            }),
        }
    }

    fn parse_bare_add(&mut self, target: Target) -> ParseResult<Statement> {
        Ok(Statement::Add {
            target,
            parts: self.parse_operands(1)?,
        })
    }

    fn parse_conditional(&mut self) -> ParseResult<Statement> {
        let mut arms = Vec::new();
        let mut otherwise = None;
        self.advance(); // `if`
        arms.push(self.parse_arm()?);
        while self.eat_word("else") {
            if self.eat_word("if") {
                arms.push(self.parse_arm()?);
            } else {
                otherwise = Some(self.parse_body()?);
                break;
            }
        }
        Ok(Statement::Conditional { arms, otherwise })
    }

    fn parse_arm(&mut self) -> ParseResult<ConditionalArm> {
        self.expect(&TokenKind::LParen, "'(' after 'if'")?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')' after condition")?;
        let body = self.parse_body()?;
        Ok(ConditionalArm { condition, body })
    }

    fn parse_body(&mut self) -> ParseResult<Vec<Statement>> {
        if !self.eat(&TokenKind::LBrace) {
            return Ok(vec![self.parse_statement()?]);
        }
        let mut body = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(&TokenKind::RBrace) {
                return Ok(body);
            }
            if self.at_eof() {
                return Err(self.error("unterminated block, expected '}'"));
            }
            body.push(self.parse_statement()?);
        }
    }

    fn parse_operands(&mut self, min: usize) -> ParseResult<Vec<Expr>> {
        let mut parts = Vec::new();
        while self.starts_operand() {
            parts.push(self.parse_operand()?);
        }
        if parts.len() < min {
            return Err(self.error(format!("expected a value, found {}", describe(&self.current().kind))));
        }
        Ok(parts)
    }

    fn starts_operand(&self) -> bool {
        match &self.current().kind {
            TokenKind::Str(_) | TokenKind::Int(_) | TokenKind::LParen => true,
            TokenKind::Ident(name) => !KEYWORDS.contains(&name.as_str()),
            _ => false,
        }
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        if !self.starts_operand() {
            return Err(self.error(format!("expected a value, found {}", describe(&self.current().kind))));
        }
        self.parse_sum()
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat_word("or") || self.eat(&TokenKind::OrOr) {
            let rhs = self.parse_and()?;
            lhs = Expr::Bool(BoolExpr::Or(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_not()?;
        while self.eat_word("and") || self.eat(&TokenKind::AndAnd) {
            let rhs = self.parse_not()?;
            lhs = Expr::Bool(BoolExpr::And(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.eat_word("not") || self.eat(&TokenKind::Bang) {
            let inner = self.parse_not()?;
            return Ok(Expr::Bool(BoolExpr::Not(Box::new(inner))));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_sum()?;
        let op = match self.current().kind {
            TokenKind::EqEq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::Ne,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Le => CompareOp::Le,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Ge => CompareOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_sum()?;
        Ok(Expr::Bool(BoolExpr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    fn parse_sum(&mut self) -> ParseResult<Expr> {
        let first = self.parse_postfix()?;
        if self.current().kind != TokenKind::Plus {
            return Ok(first);
        }
        let mut parts = vec![first];
        while self.eat(&TokenKind::Plus) {
            parts.push(self.parse_postfix()?);
        }
        Ok(Expr::Str(StrExpr::Concat(parts)))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat_word("has") {
            let mut filters = vec![self.parse_filter()?];
            // `X has English and Main` keeps filtering while the word after `and` is a filter keyword
            while self.continues_filter_chain() {
                self.advance();
                filters.push(self.parse_filter()?);
            }
            expr = Expr::Coll(CollExpr::Has {
                source: Box::new(expr),
                filters,
            });
        }
        Ok(expr)
    }

    fn continues_filter_chain(&self) -> bool {
        let is_and = match self.peek_kind(0) {
            TokenKind::AndAnd => true,
            TokenKind::Ident(word) => word == "and",
            _ => false,
        };
        is_and && matches!(self.peek_kind(1), TokenKind::Ident(name) if filter_keyword(name).is_some())
    }

    fn parse_filter(&mut self) -> ParseResult<HasFilter> {
        if let TokenKind::Ident(name) = &self.current().kind {
            if let Some(filter) = filter_keyword(name) {
                self.advance();
                return Ok(filter);
            }
        }
        Ok(HasFilter::Text(self.parse_primary()?))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Str(text) => {
                self.advance();
                Ok(Expr::Str(StrExpr::Literal(text)))
            }
            TokenKind::Int(num) => {
                self.advance();
                Ok(Expr::Num(NumExpr::Literal(num)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if name == "true" || name == "false" {
                    self.advance();
                    return Ok(Expr::Bool(BoolExpr::Literal(name == "true")));
                }
                if self.peek_kind(1) == &TokenKind::LParen && is_function(&name) {
                    return self.parse_call(&name);
                }
                if let Some(label) = Label::from_name(&name) {
                    self.advance();
                    return Ok(Expr::label(label));
                }
                if filter_keyword(&name).is_some() {
                    return Err(self.error(format!("'{}' can only be used after 'has'", name)));
                }
                if KEYWORDS.contains(&name.as_str()) {
                    return Err(self.error(format!("expected a value, found '{}'", name)));
                }
                Err(self.error(format!("unknown label '{}'", name)))
            }
            other => Err(self.error(format!("expected a value, found {}", describe(&other)))),
        }
    }

    fn parse_call(&mut self, name: &str) -> ParseResult<Expr> {
        let (line, column) = (self.current().line, self.current().column);
        self.advance(); // name
        self.advance(); // `(`
        let mut args = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if self.eat(&TokenKind::RParen) {
                    break;
                }
                self.expect(&TokenKind::Comma, "',' or ')' in argument list")?;
            }
        }

        let arity = |min: usize, max: usize| -> ParseResult<()> {
            if args.len() < min || args.len() > max {
                let expected = if min == max {
                    min.to_string()
                } else {
                    format!("{} to {}", min, max)
                };
                Err(ParseError::new(
                    format!("{}() takes {} argument(s), found {}", name, expected, args.len()),
                    line,
                    column,
                ))
            } else {
                Ok(())
            }
        };

        let expr = match name {
            "first" => {
                arity(1, 1)?;
                let mut args = args.into_iter().map(Box::new);
                StrExpr::First(next_arg(&mut args))
            }
            "substr" => {
                arity(2, 3)?;
                let mut args = args.into_iter().map(Box::new);
                StrExpr::Substr {
                    text: next_arg(&mut args),
                    start: next_arg(&mut args),
                    len: args.next(),
                }
            }
            "trunc" => {
                arity(2, 2)?;
                let mut args = args.into_iter().map(Box::new);
                StrExpr::Trunc {
                    text: next_arg(&mut args),
                    len: next_arg(&mut args),
                }
            }
            "trim" | "upper" | "lower" => {
                arity(1, 1)?;
                let mut args = args.into_iter().map(Box::new);
                let inner = next_arg(&mut args);
                match name {
                    "trim" => StrExpr::Trim(inner),
                    "upper" => StrExpr::Upper(inner),
                    _ => StrExpr::Lower(inner),
                }
            }
            "pad" => {
                arity(2, 2)?;
                let mut args = args.into_iter().map(Box::new);
                StrExpr::Pad {
                    value: next_arg(&mut args),
                    width: next_arg(&mut args),
                }
            }
            "episodes" => {
                arity(0, 1)?;
                let width = args
                    .into_iter()
                    .next()
                    .unwrap_or(Expr::Num(NumExpr::Literal(0)));
                StrExpr::EpisodeRanges {
                    width: Box::new(width),
                }
            }
            _ => {
                arity(1, 1)?;
                let mut args = args.into_iter().map(Box::new);
                return Ok(Expr::Num(NumExpr::Len(next_arg(&mut args))));
            }
        };
        Ok(Expr::Str(expr))
    }
}

// Arity has been checked by the caller; the fallback is never observed.
fn next_arg(args: &mut impl Iterator<Item = Box<Expr>>) -> Box<Expr> {
    args.next()
        .unwrap_or_else(|| Box::new(Expr::Str(StrExpr::Literal(String::new()))))
}

fn is_function(name: &str) -> bool {
    matches!(
        name,
        "first" | "substr" | "trunc" | "trim" | "upper" | "lower" | "len" | "pad" | "episodes"
    )
}

fn filter_keyword(name: &str) -> Option<HasFilter> {
    Language::from_name(name)
        .map(HasFilter::Language)
        .or_else(|| TitleKind::from_name(name).map(HasFilter::TitleKind))
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("'{}'", name),
        TokenKind::Str(text) => format!("string '{}'", text),
        TokenKind::Int(num) => format!("number {}", num),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::LBrace => "'{'".to_string(),
        TokenKind::RBrace => "'}'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Semicolon => "';'".to_string(),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::EqEq => "'=='".to_string(),
        TokenKind::NotEq => "'!='".to_string(),
        TokenKind::Lt => "'<'".to_string(),
        TokenKind::Le => "'<='".to_string(),
        TokenKind::Gt => "'>'".to_string(),
        TokenKind::Ge => "'>='".to_string(),
        TokenKind::Bang => "'!'".to_string(),
        TokenKind::AndAnd => "'&&'".to_string(),
        TokenKind::OrOr => "'||'".to_string(),
        TokenKind::Eof => "end of script".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::labels::{BoolLabel, CollectionLabel, NumberLabel, StringLabel};

    fn parse(src: &str) -> Vec<Statement> {
        parse_script(src).expect("parse").statements
    }

    #[test]
    fn parses_targets_and_default_filename() {
        let stmts = parse("set AnimeTitleRomaji ' - ' EpisodeNumber; destination set 'Anime'");
        assert_eq!(
            stmts[0],
            Statement::Set {
                target: Target::DefaultFilename,
                parts: vec![
                    Expr::Str(StrExpr::Label(StringLabel::AnimeTitleRomaji)),
                    Expr::Str(StrExpr::Literal(" - ".into())),
                    Expr::Num(NumExpr::Label(NumberLabel::EpisodeNumber)),
                ],
            }
        );
        assert_eq!(
            stmts[1],
            Statement::Set {
                target: Target::Destination,
                parts: vec![Expr::Str(StrExpr::Literal("Anime".into()))],
            }
        );
    }

    #[test]
    fn statements_need_no_separators() {
        let stmts = parse("filename set 'a' subfolder add 'b' 'c' skip cancel");
        assert_eq!(stmts.len(), 4);
        assert_eq!(stmts[3], Statement::Cancel(vec![]));
    }

    #[test]
    fn bare_operands_append() {
        let stmts = parse("'abc' AnimeTitleRomaji; filename 'x' subfolder AnimeTitleRomaji '/' 'y'");
        assert_eq!(
            stmts[0],
            Statement::Add {
                target: Target::DefaultFilename,
                parts: vec![
                    Expr::Str(StrExpr::Literal("abc".into())),
                    Expr::Str(StrExpr::Label(StringLabel::AnimeTitleRomaji)),
                ],
            }
        );
        assert_eq!(
            stmts[1],
            Statement::Add {
                target: Target::Filename,
                parts: vec![Expr::Str(StrExpr::Literal("x".into()))],
            }
        );
        assert!(matches!(
            &stmts[2],
            Statement::Add { target: Target::Subfolder, parts } if parts.len() == 3
        ));
        assert_eq!(stmts.len(), 3);
    }

    #[test]
    fn bare_operands_inside_conditionals() {
        let stmts = parse("if (Restricted) 'r' else { destination 'Library' }");
        let Statement::Conditional { arms, otherwise } = &stmts[0] else {
            panic!("expected conditional");
        };
        assert!(matches!(&arms[0].body[0], Statement::Add { target: Target::DefaultFilename, .. }));
        assert!(matches!(
            otherwise.as_deref(),
            Some([Statement::Add { target: Target::Destination, .. }])
        ));
    }

    #[test]
    fn else_if_chains_flatten_into_arms() {
        let stmts = parse(
            "if (Restricted) set 'a' else if (Censored) { set 'b' } else { add 'c' add 'd' }",
        );
        match &stmts[0] {
            Statement::Conditional { arms, otherwise } => {
                assert_eq!(arms.len(), 2);
                assert_eq!(arms[1].condition, Expr::Bool(BoolExpr::Label(BoolLabel::Censored)));
                assert_eq!(otherwise.as_ref().map(Vec::len), Some(2));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn has_chains_filters_through_and() {
        let stmts = parse("if (AnimeTitles has English and Main and Restricted) skip");
        let Statement::Conditional { arms, .. } = &stmts[0] else {
            panic!("expected conditional");
        };
        let Expr::Bool(BoolExpr::And(lhs, rhs)) = &arms[0].condition else {
            panic!("expected and, got {:?}", arms[0].condition);
        };
        assert_eq!(
            **lhs,
            Expr::Coll(CollExpr::Has {
                source: Box::new(Expr::Coll(CollExpr::Label(CollectionLabel::AnimeTitles))),
                filters: vec![
                    HasFilter::Language(Language::English),
                    HasFilter::TitleKind(TitleKind::Main),
                ],
            })
        );
        assert_eq!(**rhs, Expr::Bool(BoolExpr::Label(BoolLabel::Restricted)));
    }

    #[test]
    fn precedence_of_not_and_or() {
        let stmts = parse("if (not Restricted or Censored && Chaptered) skip");
        let Statement::Conditional { arms, .. } = &stmts[0] else {
            panic!("expected conditional");
        };
        assert!(matches!(&arms[0].condition, Expr::Bool(BoolExpr::Or(lhs, rhs))
            if matches!(**lhs, Expr::Bool(BoolExpr::Not(_)))
            && matches!(**rhs, Expr::Bool(BoolExpr::And(_, _)))));
    }

    #[test]
    fn function_calls_check_arity() {
        parse("set substr(AnimeTitleEnglish, 0, 10) trunc('abc', 2) pad(EpisodeNumber, 3) episodes()");
        let err = parse_script("set trunc('abc')").unwrap_err();
        assert!(err.message.contains("trunc() takes 2"), "{}", err.message);
        assert_eq!((err.line, err.column), (1, 5));
    }

    #[test]
    fn concatenation_builds_single_operand() {
        let stmts = parse("add 'S' + pad(EpisodeNumber, 2) 'x'");
        let Statement::Add { parts, .. } = &stmts[0] else {
            panic!("expected add");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Expr::Str(StrExpr::Concat(items)) if items.len() == 2));
    }

    #[test]
    fn rejects_unknown_labels_and_misplaced_keywords() {
        let err = parse_script("set AnimeTitle").unwrap_err();
        assert!(err.message.contains("unknown label 'AnimeTitle'"));
        let err = parse_script("if (English) skip").unwrap_err();
        assert!(err.message.contains("only be used after 'has'"));
        let err = parse_script("filename skip").unwrap_err();
        assert!(err.message.contains("expected set, add, replace or a value"), "{}", err.message);
        assert!(parse_script("set").is_err());
        assert!(parse_script("if (Restricted) { skip").is_err());
    }
}
