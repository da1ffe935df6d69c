//! collections::statement — sandboxed conditional statements.
//!
//! Purpose
//! -------
//! Parse user-supplied predicates such as `"a > 25 and a % 5 == 0"` into a
//! small expression tree and evaluate it against collection values. There
//! is no general interpreter behind this: the grammar is closed and every
//! identifier must be one of the bound variables.
//!
//! Grammar
//! -------
//! ```text
//! expr       := and_expr ("or" and_expr)*
//! and_expr   := not_expr ("and" not_expr)*
//! not_expr   := "not" not_expr | comparison
//! comparison := arith (("<" | "<=" | ">" | ">=" | "==" | "!=") arith)*
//! arith      := term (("+" | "-") term)*
//! term       := unary (("*" | "/" | "//" | "%") unary)*
//! unary      := ("-" | "+") unary | power
//! power      := atom ("**" unary)?
//! atom       := number | "True" | "False" | variable | "(" expr ")"
//! ```
//!
//! Conventions
//! -----------
//! - Variables are bound positionally: one collection binds `a`, two bind
//!   `a` and `b`, and so on. Identifiers are case-insensitive.
//! - Comparisons chain (`0 < a < 10`); `and` / `or` short-circuit and
//!   return an operand; booleans take part in arithmetic as 0 / 1.
//! - `%` and `//` follow floored division. Division by zero yields IEEE
//!   `inf` / `NaN`, which compare false.

use crate::collections::errors::{CollectionError, CollectionResult};

const MAX_VARIABLES: usize = 26;
const MAX_NESTING: usize = 64;

/// Statement — a validated predicate over `num_variables` bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    source: String,
    num_variables: usize,
    expr: Expr,
}

impl Statement {
    /// Tokenize, parse and validate `source` for `num_variables` variables.
    ///
    /// Errors
    /// ------
    /// - `InvalidStatement` for an unknown character, a disallowed
    ///   identifier, a variable outside the bound set or malformed syntax.
    /// - `InvalidStatement` when parentheses, `not` or unary signs nest more
    ///   than 64 levels deep.
    pub fn parse(source: &str, num_variables: usize) -> CollectionResult<Statement> {
        let invalid = |reason: String| CollectionError::InvalidStatement {
            statement: source.to_string(),
            reason,
        };
        if num_variables == 0 || num_variables > MAX_VARIABLES {
            return Err(invalid(format!(
                "statements bind between 1 and {MAX_VARIABLES} variables. Got {num_variables}"
            )));
        }
        let tokens = tokenize(source).map_err(&invalid)?;
        let mut parser = Parser { tokens, pos: 0, depth: 0, num_variables };
        let expr = parser.expr().map_err(&invalid)?;
        if let Some(tok) = parser.peek() {
            return Err(invalid(format!("unexpected token {tok:?}")));
        }
        Ok(Statement { source: source.to_string(), num_variables, expr })
    }

    /// Names of the variables bound for `num_variables` collections.
    pub fn variable_names(num_variables: usize) -> Vec<char> {
        ('a'..='z').take(num_variables).collect()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Truth value of the statement for one tuple of bound values.
    ///
    /// `vars[i]` binds the i-th variable; missing values read as NaN.
    pub fn evaluate(&self, vars: &[f64]) -> bool {
        self.expr.eval(vars).truthy()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Val {
    Num(f64),
    Bool(bool),
}

impl Val {
    fn num(self) -> f64 {
        match self {
            Val::Num(x) => x,
            Val::Bool(b) => f64::from(u8::from(b)),
        }
    }

    fn truthy(self) -> bool {
        match self {
            Val::Num(x) => x != 0.0 && !x.is_nan(),
            Val::Bool(b) => b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    Bool(bool),
    Var(usize),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, vars: &[f64]) -> Val {
        match self {
            Expr::Num(x) => Val::Num(*x),
            Expr::Bool(b) => Val::Bool(*b),
            Expr::Var(i) => Val::Num(vars.get(*i).copied().unwrap_or(f64::NAN)),
            Expr::Neg(e) => Val::Num(-e.eval(vars).num()),
            Expr::Not(e) => Val::Bool(!e.eval(vars).truthy()),
            Expr::Bin(op, l, r) => {
                let (x, y) = (l.eval(vars).num(), r.eval(vars).num());
                Val::Num(match op {
                    BinOp::Add => x + y,
                    BinOp::Sub => x - y,
                    BinOp::Mul => x * y,
                    BinOp::Div => x / y,
                    BinOp::FloorDiv => (x / y).floor(),
                    BinOp::Mod => x - y * (x / y).floor(),
                    BinOp::Pow => x.powf(y),
                })
            }
            Expr::Compare(first, rest) => {
                let mut left = first.eval(vars).num();
                for (op, rhs) in rest {
                    let right = rhs.eval(vars).num();
                    let holds = match op {
                        CmpOp::Lt => left < right,
                        CmpOp::Le => left <= right,
                        CmpOp::Gt => left > right,
                        CmpOp::Ge => left >= right,
                        CmpOp::Eq => left == right,
                        CmpOp::Ne => left != right,
                    };
                    if !holds {
                        return Val::Bool(false);
                    }
                    left = right;
                }
                Val::Bool(true)
            }
            Expr::And(l, r) => {
                let lv = l.eval(vars);
                if lv.truthy() { r.eval(vars) } else { lv }
            }
            Expr::Or(l, r) => {
                let lv = l.eval(vars);
                if lv.truthy() { lv } else { r.eval(vars) }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
}

const OPERATORS: [&str; 13] =
    ["**", "//", "<=", ">=", "==", "!=", "<", ">", "+", "-", "*", "/", "%"];

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' {
            tokens.push(Token::LParen);
            i += 1;
        } else if c == ')' {
            tokens.push(Token::RParen);
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text.parse::<f64>().map_err(|_| format!("invalid number {text:?}"))?;
            tokens.push(Token::Num(value));
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else {
            let rest: String = chars[i..chars.len().min(i + 2)].iter().collect();
            let op = OPERATORS
                .iter()
                .find(|op| rest.starts_with(**op))
                .ok_or_else(|| format!("character {c:?} is not allowed"))?;
            tokens.push(Token::Op(op));
            i += op.len();
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    num_variables: usize,
}

impl Parser {
    fn nested(&mut self, rule: fn(&mut Self) -> Result<Expr, String>) -> Result<Expr, String> {
        if self.depth >= MAX_NESTING {
            return Err(format!("statement nests deeper than {MAX_NESTING} levels"));
        }
        self.depth += 1;
        let out = rule(self);
        self.depth -= 1;
        out
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat_op(&mut self, ops: &[&'static str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expr(&mut self) -> Result<Expr, String> {
        let mut left = self.and_expr()?;
        while self.eat_keyword("or") {
            left = Expr::Or(Box::new(left), Box::new(self.and_expr()?));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, String> {
        let mut left = self.not_expr()?;
        while self.eat_keyword("and") {
            left = Expr::And(Box::new(left), Box::new(self.not_expr()?));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expr, String> {
        if self.eat_keyword("not") {
            return Ok(Expr::Not(Box::new(self.nested(Self::not_expr)?)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, String> {
        let first = self.arith()?;
        let mut rest = Vec::new();
        while let Some(op) = self.eat_op(&["<", "<=", ">", ">=", "==", "!="]) {
            let cmp = match op {
                "<" => CmpOp::Lt,
                "<=" => CmpOp::Le,
                ">" => CmpOp::Gt,
                ">=" => CmpOp::Ge,
                "==" => CmpOp::Eq,
                _ => CmpOp::Ne,
            };
            rest.push((cmp, self.arith()?));
        }
        if rest.is_empty() { Ok(first) } else { Ok(Expr::Compare(Box::new(first), rest)) }
    }

    fn arith(&mut self) -> Result<Expr, String> {
        let mut left = self.term()?;
        while let Some(op) = self.eat_op(&["+", "-"]) {
            let op = if op == "+" { BinOp::Add } else { BinOp::Sub };
            left = Expr::Bin(op, Box::new(left), Box::new(self.term()?));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut left = self.unary()?;
        while let Some(op) = self.eat_op(&["*", "/", "//", "%"]) {
            let op = match op {
                "*" => BinOp::Mul,
                "/" => BinOp::Div,
                "//" => BinOp::FloorDiv,
                _ => BinOp::Mod,
            };
            left = Expr::Bin(op, Box::new(left), Box::new(self.unary()?));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        match self.eat_op(&["-", "+"]) {
            Some("-") => Ok(Expr::Neg(Box::new(self.nested(Self::unary)?))),
            Some(_) => self.nested(Self::unary),
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, String> {
        let base = self.atom()?;
        if self.eat_op(&["**"]).is_some() {
            let exponent = self.nested(Self::unary)?;
            return Ok(Expr::Bin(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Num(x)) => Ok(Expr::Num(x)),
            Some(Token::LParen) => {
                let inner = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("missing closing parenthesis".to_string()),
                }
            }
            Some(Token::Ident(word)) => self.identifier(&word),
            Some(tok) => Err(format!("unexpected token {tok:?}")),
            None => Err("unexpected end of statement".to_string()),
        }
    }

    fn identifier(&self, word: &str) -> Result<Expr, String> {
        if word == "True" {
            return Ok(Expr::Bool(true));
        }
        if word == "False" {
            return Ok(Expr::Bool(false));
        }
        let allowed = Statement::variable_names(self.num_variables);
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let c = c.to_ascii_lowercase();
            if let Some(i) = allowed.iter().position(|&v| v == c) {
                return Ok(Expr::Var(i));
            }
        }
        let names: Vec<String> = allowed.iter().map(char::to_string).collect();
        Err(format!(
            "identifier {word:?} is not allowed. Variables should be named as follows: {}",
            names.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Operator precedence, chaining and floored arithmetic.
    // - Positional binding of several variables.
    // - Rejection of identifiers and characters outside the grammar.
    // - The nesting cap on parentheses, `not` and unary signs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The canonical filter statement behaves like its Python reading.
    //
    // Given
    // -----
    // - "a > 25 and a % 5 == 0" evaluated at 30, 27 and 20.
    //
    // Expect
    // ------
    // - true, false, false.
    fn evaluates_boolean_combination() {
        let stmt = Statement::parse("a > 25 and a % 5 == 0", 1).unwrap();
        assert!(stmt.evaluate(&[30.0]));
        assert!(!stmt.evaluate(&[27.0]));
        assert!(!stmt.evaluate(&[20.0]));
    }

    #[test]
    // Purpose
    // -------
    // Precedence, chaining, unary minus and floored operators.
    //
    // Given
    // -----
    // - "-2 ** 2 == -4", "0 < a <= 10", "-7 // 2 == -4", "-7 % 3 == 2",
    //   "not (a < 0 or False)".
    //
    // Expect
    // ------
    // - All hold for a = 3.
    fn precedence_and_python_arithmetic() {
        for src in
            ["-2 ** 2 == -4", "0 < a <= 10", "-7 // 2 == -4", "-7 % 3 == 2", "not (a < 0 or False)"]
        {
            let stmt = Statement::parse(src, 1).unwrap();
            assert!(stmt.evaluate(&[3.0]), "{src}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Several variables bind positionally.
    //
    // Given
    // -----
    // - "a > b and c == 1.5e0" over three variables.
    //
    // Expect
    // ------
    // - true for (2, 1, 1.5) and false for (1, 2, 1.5).
    fn binds_variables_positionally() {
        let stmt = Statement::parse("a > b and c == 1.5e0", 3).unwrap();
        assert!(stmt.evaluate(&[2.0, 1.0, 1.5]));
        assert!(!stmt.evaluate(&[1.0, 2.0, 1.5]));
        assert_eq!(Statement::variable_names(3), vec!['a', 'b', 'c']);
    }

    #[test]
    // Purpose
    // -------
    // Anything outside the grammar is rejected before evaluation.
    //
    // Given
    // -----
    // - A foreign identifier, an unbound variable, a function call, an
    //   attribute access and a dangling operator.
    //
    // Expect
    // ------
    // - `InvalidStatement` for each.
    fn rejects_disallowed_input() {
        for (src, n) in [
            ("x > 2", 1),
            ("b > 2", 1),
            ("__import__('os')", 1),
            ("a.real > 0", 1),
            ("a >", 1),
        ] {
            assert!(
                matches!(Statement::parse(src, n), Err(CollectionError::InvalidStatement { .. })),
                "{src}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Deeply nested input fails with an error instead of exhausting the stack.
    //
    // Given
    // -----
    // - 1000 nested parentheses around `a`, 1000 chained `not`, 1000 unary
    //   minus signs and a right-nested power tower of 1000 operands.
    // - 64 nested parentheses, the deepest accepted level.
    //
    // Expect
    // ------
    // - `InvalidStatement` naming the nesting limit for the deep inputs.
    // - The 64-level statement parses and evaluates like `a > 1`.
    fn caps_nesting_depth() {
        let deep = [
            format!("{}a{} > 1", "(".repeat(1000), ")".repeat(1000)),
            format!("{}a > 1", "not ".repeat(1000)),
            format!("{}a > 1", "-".repeat(1000)),
            format!("a{} > 1", " ** a".repeat(1000)),
        ];
        for src in &deep {
            match Statement::parse(src, 1) {
                Err(CollectionError::InvalidStatement { reason, .. }) => {
                    assert!(reason.contains("nests deeper than 64"), "{reason}")
                }
                other => panic!("expected a nesting error, got {other:?}"),
            }
        }

        let limit = format!("{}a{} > 1", "(".repeat(64), ")".repeat(64));
        let stmt = Statement::parse(&limit, 1).unwrap();
        assert!(stmt.evaluate(&[2.0]));
        assert!(!stmt.evaluate(&[0.5]));
    }
}
