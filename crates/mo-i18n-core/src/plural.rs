//! Plural-rule expressions.
//!
//! Catalogs declare which plural form applies to a count `n` with a
//! C-like integer expression in their `Plural-Forms` header, e.g.
//! `n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 ? 1 : 2`. The
//! declaration comes from the catalog file itself, which may be an
//! untrusted translation source, so it is parsed into an AST and
//! reduced by a pure evaluator — never handed to an interpreter.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{CoreError, CoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// A parsed plural rule over the single variable `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluralExpr {
    Number(i64),
    Var,
    Unary(UnaryOp, Box<PluralExpr>),
    Binary(BinaryOp, Box<PluralExpr>, Box<PluralExpr>),
    Ternary(Box<PluralExpr>, Box<PluralExpr>, Box<PluralExpr>),
}

impl PluralExpr {
    /// The universal two-form rule `n != 1`: index 0 for one, 1 for
    /// everything else.
    pub fn default_rule() -> Self {
        PluralExpr::Binary(
            BinaryOp::Ne,
            Box::new(PluralExpr::Var),
            Box::new(PluralExpr::Number(1)),
        )
    }

    pub fn parse(src: &str) -> CoreResult<Self> {
        let tokens = tokenize(src)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.ternary()?;
        if parser.pos != parser.tokens.len() {
            return Err(CoreError::BadPluralRule("trailing input"));
        }
        Ok(expr)
    }

    /// Reduces the expression with `n` substituted for the variable,
    /// returning the selected plural-form index. Comparisons and
    /// logical operators yield 0 or 1; `&&` and `||` short-circuit.
    pub fn eval(&self, n: i64) -> CoreResult<i64> {
        match self {
            PluralExpr::Number(value) => Ok(*value),
            PluralExpr::Var => Ok(n),
            PluralExpr::Unary(op, inner) => {
                let value = inner.eval(n)?;
                Ok(match op {
                    UnaryOp::Neg => value.wrapping_neg(),
                    UnaryOp::Not => i64::from(value == 0),
                })
            }
            PluralExpr::Binary(op, lhs, rhs) => {
                // Short-circuit before touching the right side.
                match op {
                    BinaryOp::And => {
                        if lhs.eval(n)? == 0 {
                            return Ok(0);
                        }
                        return Ok(i64::from(rhs.eval(n)? != 0));
                    }
                    BinaryOp::Or => {
                        if lhs.eval(n)? != 0 {
                            return Ok(1);
                        }
                        return Ok(i64::from(rhs.eval(n)? != 0));
                    }
                    _ => {}
                }
                let left = lhs.eval(n)?;
                let right = rhs.eval(n)?;
                match op {
                    BinaryOp::Add => Ok(left.wrapping_add(right)),
                    BinaryOp::Sub => Ok(left.wrapping_sub(right)),
                    BinaryOp::Mul => Ok(left.wrapping_mul(right)),
                    BinaryOp::Div => {
                        if right == 0 {
                            Err(CoreError::DivisionByZero)
                        } else {
                            Ok(left.wrapping_div(right))
                        }
                    }
                    BinaryOp::Rem => {
                        if right == 0 {
                            Err(CoreError::DivisionByZero)
                        } else {
                            Ok(left.wrapping_rem(right))
                        }
                    }
                    BinaryOp::Eq => Ok(i64::from(left == right)),
                    BinaryOp::Ne => Ok(i64::from(left != right)),
                    BinaryOp::Lt => Ok(i64::from(left < right)),
                    BinaryOp::Le => Ok(i64::from(left <= right)),
                    BinaryOp::Gt => Ok(i64::from(left > right)),
                    BinaryOp::Ge => Ok(i64::from(left >= right)),
                    BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
                }
            }
            PluralExpr::Ternary(cond, then, other) => {
                if cond.eval(n)? != 0 {
                    then.eval(n)
                } else {
                    other.eval(n)
                }
            }
        }
    }
}

/// Extracts and parses the expression after `plural=` (up to `;` or end
/// of string) in a `Plural-Forms` header value.
pub fn parse_plural_forms(value: &str) -> CoreResult<PluralExpr> {
    let start = value
        .find("plural=")
        .ok_or(CoreError::BadPluralRule("missing plural= declaration"))?;
    let rest = &value[start + "plural=".len()..];
    let expr = match rest.find(';') {
        Some(end) => &rest[..end],
        None => rest,
    };
    PluralExpr::parse(expr)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Num(i64),
    Var,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Not,
    Question,
    Colon,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> CoreResult<Vec<Token>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    while pos < bytes.len() {
        let byte = bytes[pos];
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            b'0'..=b'9' => {
                let start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                let text = &src[start..pos];
                let value = text
                    .parse::<i64>()
                    .map_err(|_| CoreError::BadPluralRule("integer literal too large"))?;
                tokens.push(Token::Num(value));
            }
            b'n' => {
                if pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_alphanumeric() {
                    return Err(CoreError::BadPluralRule("unknown identifier"));
                }
                tokens.push(Token::Var);
                pos += 1;
            }
            b'+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            b'%' => {
                tokens.push(Token::Percent);
                pos += 1;
            }
            b'?' => {
                tokens.push(Token::Question);
                pos += 1;
            }
            b':' => {
                tokens.push(Token::Colon);
                pos += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            b'=' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::EqEq);
                    pos += 2;
                } else {
                    return Err(CoreError::BadPluralRule("assignment is not allowed"));
                }
            }
            b'!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::NotEq);
                    pos += 2;
                } else {
                    tokens.push(Token::Not);
                    pos += 1;
                }
            }
            b'<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::Le);
                    pos += 2;
                } else {
                    tokens.push(Token::Lt);
                    pos += 1;
                }
            }
            b'>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::Ge);
                    pos += 2;
                } else {
                    tokens.push(Token::Gt);
                    pos += 1;
                }
            }
            b'&' => {
                if bytes.get(pos + 1) == Some(&b'&') {
                    tokens.push(Token::AndAnd);
                    pos += 2;
                } else {
                    return Err(CoreError::BadPluralRule("single & is not allowed"));
                }
            }
            b'|' => {
                if bytes.get(pos + 1) == Some(&b'|') {
                    tokens.push(Token::OrOr);
                    pos += 2;
                } else {
                    return Err(CoreError::BadPluralRule("single | is not allowed"));
                }
            }
            _ => return Err(CoreError::BadPluralRule("unexpected character")),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser with C precedence. Each level consumes its
/// operators left-to-right; the ternary alone associates to the right.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: Token, message: &'static str) -> CoreResult<()> {
        if self.bump() == Some(token) {
            Ok(())
        } else {
            Err(CoreError::BadPluralRule(message))
        }
    }

    fn ternary(&mut self) -> CoreResult<PluralExpr> {
        let cond = self.logical_or()?;
        if self.peek() == Some(Token::Question) {
            self.pos += 1;
            let then = self.ternary()?;
            self.expect(Token::Colon, "expected : in ternary")?;
            let other = self.ternary()?;
            return Ok(PluralExpr::Ternary(
                Box::new(cond),
                Box::new(then),
                Box::new(other),
            ));
        }
        Ok(cond)
    }

    fn logical_or(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.logical_and()?;
        while self.peek() == Some(Token::OrOr) {
            self.pos += 1;
            let rhs = self.logical_and()?;
            expr = PluralExpr::Binary(BinaryOp::Or, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn logical_and(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.equality()?;
        while self.peek() == Some(Token::AndAnd) {
            self.pos += 1;
            let rhs = self.equality()?;
            expr = PluralExpr::Binary(BinaryOp::And, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn equality(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.relational()?;
            expr = PluralExpr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn relational(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.additive()?;
            expr = PluralExpr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn additive(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            expr = PluralExpr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> CoreResult<PluralExpr> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            expr = PluralExpr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> CoreResult<PluralExpr> {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                let inner = self.unary()?;
                Ok(PluralExpr::Unary(UnaryOp::Not, Box::new(inner)))
            }
            Some(Token::Minus) => {
                self.pos += 1;
                let inner = self.unary()?;
                Ok(PluralExpr::Unary(UnaryOp::Neg, Box::new(inner)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> CoreResult<PluralExpr> {
        match self.bump() {
            Some(Token::Num(value)) => Ok(PluralExpr::Number(value)),
            Some(Token::Var) => Ok(PluralExpr::Var),
            Some(Token::LParen) => {
                let expr = self.ternary()?;
                self.expect(Token::RParen, "expected closing parenthesis")?;
                Ok(expr)
            }
            _ => Err(CoreError::BadPluralRule("expected operand")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PluralExpr, parse_plural_forms};
    use crate::CoreError;

    #[test]
    fn default_rule_is_two_form() {
        let rule = PluralExpr::default_rule();
        assert_eq!(rule.eval(1).expect("eval"), 0);
        assert_eq!(rule.eval(0).expect("eval"), 1);
        assert_eq!(rule.eval(5).expect("eval"), 1);
    }

    #[test]
    fn parses_plural_forms_header() {
        let rule = parse_plural_forms("nplurals=2; plural=(n != 1);").expect("rule");
        assert_eq!(rule.eval(1).expect("eval"), 0);
        assert_eq!(rule.eval(2).expect("eval"), 1);
    }

    #[test]
    fn missing_declaration_is_rejected() {
        assert_eq!(
            parse_plural_forms("nplurals=2;"),
            Err(CoreError::BadPluralRule("missing plural= declaration"))
        );
    }

    #[test]
    fn evaluates_two_branch_rule() {
        // A real two-form rule that keeps 21, 31, ... singular.
        let rule = PluralExpr::parse("n % 10 == 1 && n % 100 != 11 ? 0 : 1").expect("rule");
        assert_eq!(rule.eval(21).expect("eval"), 0);
        assert_eq!(rule.eval(11).expect("eval"), 1);
        assert_eq!(rule.eval(1).expect("eval"), 0);
        assert_eq!(rule.eval(2).expect("eval"), 1);
    }

    #[test]
    fn evaluates_russian_three_form_rule() {
        let rule = PluralExpr::parse(
            "n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2",
        )
        .expect("rule");
        assert_eq!(rule.eval(1).expect("eval"), 0);
        assert_eq!(rule.eval(3).expect("eval"), 1);
        assert_eq!(rule.eval(5).expect("eval"), 2);
        assert_eq!(rule.eval(11).expect("eval"), 2);
        assert_eq!(rule.eval(21).expect("eval"), 0);
        assert_eq!(rule.eval(22).expect("eval"), 1);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let rule = PluralExpr::parse("2 + 3 * 4 == 14").expect("rule");
        assert_eq!(rule.eval(0).expect("eval"), 1);
    }

    #[test]
    fn unary_operators_apply() {
        let rule = PluralExpr::parse("!n").expect("rule");
        assert_eq!(rule.eval(0).expect("eval"), 1);
        assert_eq!(rule.eval(7).expect("eval"), 0);

        let neg = PluralExpr::parse("-n + 3").expect("rule");
        assert_eq!(neg.eval(1).expect("eval"), 2);
    }

    #[test]
    fn logical_operators_short_circuit_division() {
        // The right side would divide by zero; && must not reach it.
        let rule = PluralExpr::parse("0 && 1 / 0").expect("rule");
        assert_eq!(rule.eval(0).expect("eval"), 0);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let rule = PluralExpr::parse("n / 0").expect("rule");
        assert_eq!(rule.eval(4), Err(CoreError::DivisionByZero));
        let rem = PluralExpr::parse("n % (n - n)").expect("rule");
        assert_eq!(rem.eval(4), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn rejects_non_grammar_tokens() {
        assert!(PluralExpr::parse("system('rm -rf /')").is_err());
        assert!(PluralExpr::parse("n = 1").is_err());
        assert!(PluralExpr::parse("n & 1").is_err());
        assert!(PluralExpr::parse("name").is_err());
    }

    #[test]
    fn rejects_trailing_input() {
        assert_eq!(
            PluralExpr::parse("n != 1 n"),
            Err(CoreError::BadPluralRule("trailing input"))
        );
    }

    #[test]
    fn rejects_dangling_operator() {
        assert_eq!(
            PluralExpr::parse("n %"),
            Err(CoreError::BadPluralRule("expected operand"))
        );
    }

    #[test]
    fn ternary_associates_right() {
        let rule = PluralExpr::parse("n == 1 ? 0 : n == 2 ? 1 : 2").expect("rule");
        assert_eq!(rule.eval(1).expect("eval"), 0);
        assert_eq!(rule.eval(2).expect("eval"), 1);
        assert_eq!(rule.eval(3).expect("eval"), 2);
    }
}
