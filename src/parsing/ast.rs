//! The abstract syntax tree.
//!
//! Every node renders back to query text through `Display`, and the
//! rendered text re-parses to a structurally equal tree. Rendering is
//! normalized: keywords become uppercase and binary expressions are
//! parenthesized explicitly, which keeps the round-trip independent of
//! operator precedence.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Let(LetStatement),
}

/// `LET name = q` stores the query AST for re-evaluation on every
/// reference; `LET name <= q` materializes the rows once at binding time.
#[derive(Clone, Debug, PartialEq)]
pub struct LetStatement {
    pub name: String,
    pub materialize: bool,
    pub query: SelectStatement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectStatement {
    pub select: Vec<SelectItem>,
    pub from: PluginCall,
    pub where_clause: Option<Expression>,
    pub group_by: Option<Expression>,
    pub order_by: Option<String>,
    pub desc: bool,
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectItem {
    /// `*`: expanded against the column set of each arriving row.
    Wildcard,
    Expr {
        expr: Expression,
        alias: Option<String>,
    },
}

/// A FROM source: a plugin invocation, or a bare reference to a stored or
/// materialized query (`call` is false and `args` empty).
#[derive(Clone, Debug, PartialEq)]
pub struct PluginCall {
    /// Plugin names may be dotted paths, e.g. `Artifact.Linux.Sys`.
    pub name: String,
    pub args: Vec<Arg>,
    pub call: bool,
}

/// A named call argument. Calls take named arguments only.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub name: String,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Symbol(String),
    Call(FunctionCall),
    /// `{ SELECT ... }`: a query as a first-class value.
    Subquery(Box<SelectStatement>),
    /// `(a, b, ...)` or `[a, b, ...]`.
    List(Vec<Expression>),
    Not(Box<Expression>),
    Negate(Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    /// `base.field`
    Member(Box<Expression>, String),
    /// `base[index]`
    Index(Box<Expression>, Box<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    In,
    Regex,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::In => "IN",
            Self::Regex => "=~",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Structural equality by value, with floats compared by bit pattern so
/// that round-trip tests can compare trees containing NaN or negative
/// zero.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Int(l), Self::Int(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => l.to_bits() == r.to_bits(),
            (Self::String(l), Self::String(r)) => l == r,
            (_, _) => false,
        }
    }
}

impl Expression {
    /// The implicit output column name for an unaliased select item: the
    /// source text, with the normalizing parentheses of a top-level
    /// binary stripped.
    pub fn column_name(&self) -> String {
        match self {
            Expression::Binary(op, lhs, rhs) => format!("{} {} {}", lhs, op.symbol(), rhs),
            _ => self.to_string(),
        }
    }
}

impl SelectStatement {
    /// The output column names, without evaluating the query: the alias
    /// where present, the expression source text otherwise. A wildcard
    /// contributes `*` since its expansion depends on the arriving rows.
    pub fn columns(&self) -> Vec<String> {
        self.select
            .iter()
            .map(|item| match item {
                SelectItem::Wildcard => "*".to_string(),
                SelectItem::Expr { expr, alias } => match alias {
                    Some(alias) => alias.clone(),
                    None => expr.column_name(),
                },
            })
            .collect()
    }
}

fn quote_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Int(i) => write!(f, "{}", i),
            // Debug formatting keeps a fraction part, so the text
            // re-parses as a float.
            Self::Float(v) => write!(f, "{:?}", v),
            Self::String(s) => write!(f, "{}", quote_string(s)),
        }
    }
}

// Prefix operands and access bases re-wrap in parens when they would
// otherwise re-parse at the wrong precedence. Binary expressions are
// always printed parenthesized, so they never need extra wrapping.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal),
            Expression::Symbol(name) => write!(f, "{}", name),
            Expression::Call(call) => write!(f, "{}", call),
            Expression::Subquery(query) => write!(f, "{{ {} }}", query),
            Expression::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expression::Not(operand) => write!(f, "NOT {}", operand),
            Expression::Negate(operand) => write!(f, "- {}", operand),
            Expression::Binary(op, lhs, rhs) => {
                write!(f, "({} {} {})", lhs, op.symbol(), rhs)
            }
            Expression::Member(base, field) => match base.as_ref() {
                Expression::Not(_) | Expression::Negate(_) => {
                    write!(f, "({}).{}", base, field)
                }
                _ => write!(f, "{}.{}", base, field),
            },
            Expression::Index(base, index) => match base.as_ref() {
                Expression::Not(_) | Expression::Negate(_) => {
                    write!(f, "({})[{}]", base, index)
                }
                _ => write!(f, "{}[{}]", base, index),
            },
        }
    }
}

fn fmt_args(f: &mut fmt::Formatter<'_>, args: &[Arg]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", arg.name, arg.value)?;
    }
    Ok(())
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        fmt_args(f, &self.args)?;
        write!(f, ")")
    }
}

impl fmt::Display for PluginCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.call {
            write!(f, "(")?;
            fmt_args(f, &self.args)?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::Expr { expr, alias } => {
                write!(f, "{}", expr)?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", alias)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, " FROM {}", self.from)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " GROUP BY {}", group_by)?;
        }
        if let Some(order_by) = &self.order_by {
            write!(f, " ORDER BY {}", order_by)?;
            if self.desc {
                write!(f, " DESC")?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        Ok(())
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.materialize { "<=" } else { "=" };
        write!(f, "LET {} {} {}", self.name, op, self.query)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{}", select),
            Self::Let(binding) => write!(f, "{}", binding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_literals_requote() {
        let literal = Literal::String("foo's quote".to_string());
        assert_eq!(literal.to_string(), r"'foo\'s quote'");
    }

    #[test]
    fn float_literals_keep_fraction() {
        assert_eq!(Literal::Float(3.0).to_string(), "3.0");
        assert_eq!(Literal::Float(2.2).to_string(), "2.2");
    }

    #[test]
    fn columns_prefer_aliases() {
        let stmt = SelectStatement {
            select: vec![
                SelectItem::Wildcard,
                SelectItem::Expr {
                    expr: Expression::Symbol("foo".to_string()),
                    alias: Some("FooColumn".to_string()),
                },
                SelectItem::Expr {
                    expr: Expression::Symbol("bar".to_string()),
                    alias: None,
                },
            ],
            from: PluginCall {
                name: "test".to_string(),
                args: vec![],
                call: true,
            },
            where_clause: None,
            group_by: None,
            order_by: None,
            desc: false,
            limit: None,
        };
        assert_eq!(stmt.columns(), vec!["*", "FooColumn", "bar"]);
    }
}
