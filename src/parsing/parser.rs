//! The parser takes tokens from the lexer and builds the query AST.
//!
//! It only ensures the syntax is well-formed; whether a plugin or symbol
//! exists is decided at evaluation time against the scope.

use super::ast::{
    Arg, BinaryOp, Expression, FunctionCall, LetStatement, Literal, PluginCall, SelectItem,
    SelectStatement, Statement,
};
use super::lexer::{Keyword, Lexer, Token};
use crate::error::{Error, Result};

/// Operator precedence.
type Precedence = u8;

/// Prefix operators.
enum PrefixOperator {
    Minus, // - a
    Not,   // NOT a
}

impl PrefixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Not => 3,
            Self::Minus => 10,
        }
    }

    fn into_expression(self, rhs: Expression) -> Expression {
        let rhs = Box::new(rhs);
        match self {
            Self::Minus => Expression::Negate(rhs),
            Self::Not => Expression::Not(rhs),
        }
    }
}

/// Infix operators, all left-associative.
enum InfixOperator {
    Add,                // a + b
    And,                // a AND b
    Divide,             // a / b
    Equal,              // a = b
    GreaterThan,        // a > b
    GreaterThanOrEqual, // a >= b
    In,                 // a IN b
    LessThan,           // a < b
    LessThanOrEqual,    // a <= b
    Multiply,           // a * b
    NotEqual,           // a != b
    Or,                 // a OR b
    Regex,              // a =~ b
    Subtract,           // a - b
}

impl InfixOperator {
    /// OR binds loosest; NOT sits between AND and the comparisons.
    fn precedence(&self) -> Precedence {
        match self {
            Self::Or => 1,
            Self::And => 2,
            // prefix NOT => 3
            Self::Equal
            | Self::NotEqual
            | Self::LessThan
            | Self::LessThanOrEqual
            | Self::GreaterThan
            | Self::GreaterThanOrEqual => 4,
            Self::In => 5,
            Self::Regex => 6,
            Self::Add | Self::Subtract => 7,
            Self::Multiply | Self::Divide => 8,
        }
    }

    fn into_expression(self, lhs: Expression, rhs: Expression) -> Expression {
        let op = match self {
            Self::Add => BinaryOp::Add,
            Self::And => BinaryOp::And,
            Self::Divide => BinaryOp::Divide,
            Self::Equal => BinaryOp::Equal,
            Self::GreaterThan => BinaryOp::GreaterThan,
            Self::GreaterThanOrEqual => BinaryOp::GreaterThanOrEqual,
            Self::In => BinaryOp::In,
            Self::LessThan => BinaryOp::LessThan,
            Self::LessThanOrEqual => BinaryOp::LessThanOrEqual,
            Self::Multiply => BinaryOp::Multiply,
            Self::NotEqual => BinaryOp::NotEqual,
            Self::Or => BinaryOp::Or,
            Self::Regex => BinaryOp::Regex,
            Self::Subtract => BinaryOp::Subtract,
        };
        Expression::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl Parser<'_> {
    /// Parses the input string into a single statement AST. The entire
    /// string must be consumed.
    pub fn parse(statement: &str) -> Result<Statement> {
        let mut parser = Parser::new(statement);
        let statement = parser.parse_statement()?;
        if let Some(token) = parser.try_next()? {
            return Err(parser.error(format!("unexpected token {}", token)));
        }
        Ok(statement)
    }

    /// Parses the input string as a single expression.
    pub fn parse_expr(expr: &str) -> Result<Expression> {
        let mut parser = Parser::new(expr);
        let expression = parser.parse_comma_expression()?;
        if let Some(token) = parser.try_next()? {
            return Err(parser.error(format!("unexpected token {}", token)));
        }
        Ok(expression)
    }

    fn new(input: &str) -> Parser<'_> {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let (line, column) = self.lexer.position();
        Error::parse(message, line, column)
    }

    /// Fetches the next token, or None at end of input.
    fn try_next(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }
        self.lexer.next().transpose()
    }

    /// Fetches the next token, or errors if none is found.
    fn next(&mut self) -> Result<Token> {
        self.try_next()?
            .ok_or_else(|| self.error("unexpected end of input"))
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next().transpose()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Consumes the next token if it matches.
    fn next_is(&mut self, token: Token) -> Result<bool> {
        if self.peek()? == Some(&token) {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let token = self.next()?;
        if token != expected {
            return Err(self.error(format!("expected {}, got {}", expected, token)));
        }
        Ok(())
    }

    /// Returns the next identifier, or errors if not found.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => Err(self.error(format!("expected identifier, got {}", token))),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek()? {
            Some(Token::Keyword(Keyword::Select)) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            Some(Token::Keyword(Keyword::Let)) => Ok(Statement::Let(self.parse_let_statement()?)),
            Some(token) => {
                let msg = format!("unexpected token {}", token);
                Err(self.error(msg))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_let_statement(&mut self) -> Result<LetStatement> {
        self.expect(Token::Keyword(Keyword::Let))?;
        let name = self.next_ident()?;
        let materialize = match self.next()? {
            Token::Equal => false,
            Token::LessThanOrEqual => true,
            token => return Err(self.error(format!("expected = or <=, got {}", token))),
        };
        let query = self.parse_select_statement()?;
        Ok(LetStatement {
            name,
            materialize,
            query,
        })
    }

    fn parse_select_statement(&mut self) -> Result<SelectStatement> {
        self.expect(Token::Keyword(Keyword::Select))?;

        let mut select = Vec::new();
        loop {
            select.push(self.parse_select_item()?);
            if !self.next_is(Token::Comma)? {
                break;
            }
        }

        self.expect(Token::Keyword(Keyword::From))?;
        let from = self.parse_plugin_call()?;

        let where_clause = if self.next_is(Token::Keyword(Keyword::Where))? {
            Some(self.parse_comma_expression()?)
        } else {
            None
        };

        let group_by = if self.next_is(Token::Keyword(Keyword::Group))? {
            self.expect(Token::Keyword(Keyword::By))?;
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let (order_by, desc) = if self.next_is(Token::Keyword(Keyword::Order))? {
            self.expect(Token::Keyword(Keyword::By))?;
            let column = self.next_ident()?;
            let desc = self.next_is(Token::Keyword(Keyword::Desc))?;
            (Some(column), desc)
        } else {
            (None, false)
        };

        let limit = if self.next_is(Token::Keyword(Keyword::Limit))? {
            match self.parse_number_token()? {
                Literal::Int(n) => Some(n),
                literal => {
                    return Err(self.error(format!("expected integer limit, got {}", literal)));
                }
            }
        } else {
            None
        };

        Ok(SelectStatement {
            select,
            from,
            where_clause,
            group_by,
            order_by,
            desc,
            limit,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.next_is(Token::Asterisk)? {
            return Ok(SelectItem::Wildcard);
        }
        let expr = self.parse_expression(0)?;
        let alias = if self.next_is(Token::Keyword(Keyword::As))? {
            Some(self.next_ident()?)
        } else {
            None
        };
        Ok(SelectItem::Expr { expr, alias })
    }

    /// A FROM source: a dotted plugin name, with an optional argument
    /// list. Without parentheses the name is a stored query reference.
    fn parse_plugin_call(&mut self) -> Result<PluginCall> {
        let mut name = self.next_ident()?;
        while self.next_is(Token::Period)? {
            name.push('.');
            name.push_str(&self.next_ident()?);
        }
        let (args, call) = if self.peek()? == Some(&Token::OpenParen) {
            (self.parse_args()?, true)
        } else {
            (Vec::new(), false)
        };
        Ok(PluginCall { name, args, call })
    }

    /// A parenthesized, possibly empty list of named arguments.
    fn parse_args(&mut self) -> Result<Vec<Arg>> {
        self.expect(Token::OpenParen)?;
        let mut args = Vec::new();
        if self.next_is(Token::CloseParen)? {
            return Ok(args);
        }
        loop {
            let name = self.next_ident()?;
            self.expect(Token::Equal)?;
            let value = self.parse_expression(0)?;
            args.push(Arg { name, value });
            if !self.next_is(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(args)
    }

    /// A bare comma at the top of an expression context builds a list
    /// literal without parentheses, e.g. `WHERE foo.bar, foo.baz`.
    fn parse_comma_expression(&mut self) -> Result<Expression> {
        let first = self.parse_expression(0)?;
        if self.peek()? != Some(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.next_is(Token::Comma)? {
            items.push(self.parse_expression(0)?);
        }
        Ok(Expression::List(items))
    }

    /// Parses an expression at or above the given minimum precedence,
    /// via precedence climbing.
    fn parse_expression(&mut self, min_precedence: Precedence) -> Result<Expression> {
        let mut lhs = if let Some(prefix) = self.next_if_prefix(min_precedence)? {
            // Prefix operators are right-associative.
            let rhs = self.parse_expression(prefix.precedence())?;
            prefix.into_expression(rhs)
        } else {
            self.parse_atom()?
        };
        loop {
            // Postfix access binds tightest, so it always applies.
            match self.peek()? {
                Some(Token::Period) => {
                    self.next()?;
                    let field = self.next_ident()?;
                    lhs = Expression::Member(Box::new(lhs), field);
                    continue;
                }
                Some(Token::OpenBracket) => {
                    self.next()?;
                    let index = self.parse_expression(0)?;
                    self.expect(Token::CloseBracket)?;
                    lhs = Expression::Index(Box::new(lhs), Box::new(index));
                    continue;
                }
                _ => {}
            }
            let Some(infix) = self.next_if_infix(min_precedence)? else {
                return Ok(lhs);
            };
            // Left-associative: the right side binds one step tighter.
            let rhs = self.parse_expression(infix.precedence() + 1)?;
            lhs = infix.into_expression(lhs, rhs);
        }
    }

    fn next_if_prefix(&mut self, min_precedence: Precedence) -> Result<Option<PrefixOperator>> {
        let operator = match self.peek()? {
            Some(Token::Keyword(Keyword::Not)) => PrefixOperator::Not,
            Some(Token::Minus) => PrefixOperator::Minus,
            _ => return Ok(None),
        };
        if operator.precedence() < min_precedence {
            return Ok(None);
        }
        self.next()?;
        Ok(Some(operator))
    }

    fn next_if_infix(&mut self, min_precedence: Precedence) -> Result<Option<InfixOperator>> {
        let operator = match self.peek()? {
            Some(Token::Plus) => InfixOperator::Add,
            Some(Token::Minus) => InfixOperator::Subtract,
            Some(Token::Asterisk) => InfixOperator::Multiply,
            Some(Token::Slash) => InfixOperator::Divide,
            Some(Token::Equal) => InfixOperator::Equal,
            Some(Token::NotEqual) => InfixOperator::NotEqual,
            Some(Token::LessThan) => InfixOperator::LessThan,
            Some(Token::LessThanOrEqual) => InfixOperator::LessThanOrEqual,
            Some(Token::GreaterThan) => InfixOperator::GreaterThan,
            Some(Token::GreaterThanOrEqual) => InfixOperator::GreaterThanOrEqual,
            Some(Token::RegexMatch) => InfixOperator::Regex,
            Some(Token::Keyword(Keyword::And)) => InfixOperator::And,
            Some(Token::Keyword(Keyword::Or)) => InfixOperator::Or,
            Some(Token::Keyword(Keyword::In)) => InfixOperator::In,
            _ => return Ok(None),
        };
        if operator.precedence() < min_precedence {
            return Ok(None);
        }
        self.next()?;
        Ok(Some(operator))
    }

    fn parse_atom(&mut self) -> Result<Expression> {
        match self.next()? {
            Token::Number(text) => Ok(Expression::Literal(self.convert_number(&text)?)),
            Token::String(s) => Ok(Expression::Literal(Literal::String(s))),
            Token::Keyword(Keyword::True) => Ok(Expression::Literal(Literal::Bool(true))),
            Token::Keyword(Keyword::False) => Ok(Expression::Literal(Literal::Bool(false))),
            Token::Keyword(Keyword::Null) => Ok(Expression::Literal(Literal::Null)),
            Token::Ident(name) => {
                if self.peek()? == Some(&Token::OpenParen) {
                    let args = self.parse_args()?;
                    Ok(Expression::Call(FunctionCall { name, args }))
                } else {
                    Ok(Expression::Symbol(name))
                }
            }
            // A parenthesized expression is grouping; a comma makes it a
            // list literal.
            Token::OpenParen => {
                let first = self.parse_expression(0)?;
                if self.next_is(Token::Comma)? {
                    let mut items = vec![first];
                    loop {
                        items.push(self.parse_expression(0)?);
                        if !self.next_is(Token::Comma)? {
                            break;
                        }
                    }
                    self.expect(Token::CloseParen)?;
                    Ok(Expression::List(items))
                } else {
                    self.expect(Token::CloseParen)?;
                    Ok(first)
                }
            }
            Token::OpenBracket => {
                let mut items = Vec::new();
                if self.next_is(Token::CloseBracket)? {
                    return Ok(Expression::List(items));
                }
                loop {
                    items.push(self.parse_expression(0)?);
                    if !self.next_is(Token::Comma)? {
                        break;
                    }
                }
                self.expect(Token::CloseBracket)?;
                Ok(Expression::List(items))
            }
            Token::OpenBrace => {
                let query = self.parse_select_statement()?;
                self.expect(Token::CloseBrace)?;
                Ok(Expression::Subquery(Box::new(query)))
            }
            token => Err(self.error(format!("unexpected token {}", token))),
        }
    }

    fn parse_number_token(&mut self) -> Result<Literal> {
        match self.next()? {
            Token::Number(text) => self.convert_number(&text),
            token => Err(self.error(format!("expected number, got {}", token))),
        }
    }

    /// Converts numeric literal text: decimal, `0x` hex and leading-zero
    /// octal integers, and decimal floats.
    fn convert_number(&self, text: &str) -> Result<Literal> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let magnitude = if let Some(hex) = digits.strip_prefix("0x").or(digits.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
                .map_err(|err| self.error(format!("invalid hex literal '{}': {}", text, err)))?
        } else if digits.contains('.') {
            let value: f64 = digits
                .parse()
                .map_err(|err| self.error(format!("invalid float literal '{}': {}", text, err)))?;
            return Ok(Literal::Float(if negative { -value } else { value }));
        } else if digits.len() > 1 && digits.starts_with('0') {
            i64::from_str_radix(&digits[1..], 8)
                .map_err(|err| self.error(format!("invalid octal literal '{}': {}", text, err)))?
        } else {
            digits
                .parse()
                .map_err(|err| self.error(format!("invalid integer literal '{}': {}", text, err)))?
        };
        Ok(Literal::Int(if negative { -magnitude } else { magnitude }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> Expression {
        Parser::parse_expr(input).unwrap()
    }

    #[test]
    fn precedence_follows_the_ladder() {
        // 1 + 2 * 4 groups the multiplication first.
        assert_eq!(
            expr("1 + 2 * 4"),
            Expression::Binary(
                BinaryOp::Add,
                Box::new(Expression::Literal(Literal::Int(1))),
                Box::new(Expression::Binary(
                    BinaryOp::Multiply,
                    Box::new(Expression::Literal(Literal::Int(2))),
                    Box::new(Expression::Literal(Literal::Int(4))),
                )),
            )
        );
        // AND binds tighter than OR.
        assert_eq!(
            expr("FALSE AND 5 OR 4"),
            Expression::Binary(
                BinaryOp::Or,
                Box::new(Expression::Binary(
                    BinaryOp::And,
                    Box::new(Expression::Literal(Literal::Bool(false))),
                    Box::new(Expression::Literal(Literal::Int(5))),
                )),
                Box::new(Expression::Literal(Literal::Int(4))),
            )
        );
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        assert_eq!(
            expr("NOT foo = 2"),
            Expression::Not(Box::new(Expression::Binary(
                BinaryOp::Equal,
                Box::new(Expression::Symbol("foo".to_string())),
                Box::new(Expression::Literal(Literal::Int(2))),
            )))
        );
    }

    #[test]
    fn integer_literal_radixes() {
        assert_eq!(expr("0x10"), Expression::Literal(Literal::Int(16)));
        assert_eq!(expr("0X20"), Expression::Literal(Literal::Int(32)));
        assert_eq!(expr("070"), Expression::Literal(Literal::Int(56)));
        assert_eq!(expr("-4"), Expression::Literal(Literal::Int(-4)));
        assert_eq!(expr("1.5"), Expression::Literal(Literal::Float(1.5)));
    }

    #[test]
    fn string_followed_by_number_is_an_error() {
        assert!(Parser::parse_expr("'-' 2").is_err());
    }

    #[test]
    fn parens_group_and_commas_make_lists() {
        assert_eq!(expr("(4)"), Expression::Literal(Literal::Int(4)));
        assert_eq!(
            expr("(1, 2)"),
            Expression::List(vec![
                Expression::Literal(Literal::Int(1)),
                Expression::Literal(Literal::Int(2)),
            ])
        );
        assert_eq!(
            expr("[2, 3]"),
            Expression::List(vec![
                Expression::Literal(Literal::Int(2)),
                Expression::Literal(Literal::Int(3)),
            ])
        );
    }

    #[test]
    fn postfix_access_chains() {
        assert_eq!(
            expr("my_list_obj.my_list[2]"),
            Expression::Index(
                Box::new(Expression::Member(
                    Box::new(Expression::Symbol("my_list_obj".to_string())),
                    "my_list".to_string(),
                )),
                Box::new(Expression::Literal(Literal::Int(2))),
            )
        );
    }

    #[test]
    fn named_arguments_only() {
        assert_eq!(
            expr("func_foo(return=1)"),
            Expression::Call(FunctionCall {
                name: "func_foo".to_string(),
                args: vec![Arg {
                    name: "return".to_string(),
                    value: Expression::Literal(Literal::Int(1)),
                }],
            })
        );
        assert!(Parser::parse_expr("func_foo(1)").is_err());
    }

    #[test]
    fn select_with_all_clauses() {
        let statement = Parser::parse(
            "select foo as F, * from test(a=1) where foo > 1 group by bar order by F desc limit 3",
        )
        .unwrap();
        let Statement::Select(select) = statement else {
            panic!("expected select");
        };
        assert_eq!(select.select.len(), 2);
        assert_eq!(select.from.name, "test");
        assert!(select.from.call);
        assert!(select.where_clause.is_some());
        assert!(select.group_by.is_some());
        assert_eq!(select.order_by.as_deref(), Some("F"));
        assert!(select.desc);
        assert_eq!(select.limit, Some(3));
    }

    #[test]
    fn let_statement_forms() {
        let stored = Parser::parse("let result = select * from test()").unwrap();
        let Statement::Let(stored) = stored else {
            panic!("expected let");
        };
        assert!(!stored.materialize);

        let materialized = Parser::parse("LET result <= SELECT * FROM test()").unwrap();
        let Statement::Let(materialized) = materialized else {
            panic!("expected let");
        };
        assert!(materialized.materialize);
    }

    #[test]
    fn dotted_plugin_names() {
        let statement = Parser::parse("Select * from Artifact.Linux.Sys()").unwrap();
        let Statement::Select(select) = statement else {
            panic!("expected select");
        };
        assert_eq!(select.from.name, "Artifact.Linux.Sys");
    }
}
