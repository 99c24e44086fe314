//! Plural-selection expressions.
//!
//! Catalogs ship their pluralization rule as a gettext-style expression
//! over a single free variable `n`, like `n != 1` or
//! `(n%10==1 && n%100!=11) ? 0 : 2`. The expression is parsed once when
//! the catalog is installed and evaluated to a form index on every
//! plural lookup. It is never turned into executable code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralError {
    SyntaxError(usize, usize, String),
    UnexpectedEndOfExpr,
}

pub type PluralResult<T> = std::result::Result<T, PluralError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Num(usize, usize, u64),
    Var(usize),
    LParent(usize),
    RParent(usize),
    Question(usize),
    Colon(usize),
    Not(usize),
    Op(usize, usize, BinOp),
}

impl Token {
    fn get_pos(&self) -> (usize, usize) {
        match *self {
            Token::Num(b, l, _) | Token::Op(b, l, _) => (b, l),
            Token::Var(b)
            | Token::LParent(b)
            | Token::RParent(b)
            | Token::Question(b)
            | Token::Colon(b)
            | Token::Not(b) => (b, 1),
        }
    }

    fn get_error<T>(&self, expected: &str) -> PluralResult<T> {
        let (b, l) = self.get_pos();
        let message = format!(
            "Syntax Error: Expected {}, got {}",
            expected,
            self.to_string()
        );
        Err(PluralError::SyntaxError(b, l, message))
    }
}

impl ToString for Token {
    fn to_string(&self) -> String {
        match self {
            Token::Num(_, _, v) => format!("'{}'", v),
            Token::Var(_) => "'n'".to_string(),
            Token::LParent(_) => "'('".to_string(),
            Token::RParent(_) => "')'".to_string(),
            Token::Question(_) => "'?'".to_string(),
            Token::Colon(_) => "':'".to_string(),
            Token::Not(_) => "'!'".to_string(),
            Token::Op(_, _, op) => format!("'{}'", op.symbol()),
        }
    }
}

fn lex(stream: &str) -> PluralResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = stream.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '(' => tokens.push(Token::LParent(i)),
            ')' => tokens.push(Token::RParent(i)),
            '?' => tokens.push(Token::Question(i)),
            ':' => tokens.push(Token::Colon(i)),
            'n' => tokens.push(Token::Var(i)),
            '+' => tokens.push(Token::Op(i, 1, BinOp::Add)),
            '-' => tokens.push(Token::Op(i, 1, BinOp::Sub)),
            '*' => tokens.push(Token::Op(i, 1, BinOp::Mul)),
            '/' => tokens.push(Token::Op(i, 1, BinOp::Div)),
            '%' => tokens.push(Token::Op(i, 1, BinOp::Rem)),
            '|' => match chars.peek() {
                Some(&(_, '|')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::Or));
                }
                _ => {
                    return Err(PluralError::SyntaxError(
                        i,
                        1,
                        "Syntax Error: Expected '||'".to_string(),
                    ))
                }
            },
            '&' => match chars.peek() {
                Some(&(_, '&')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::And));
                }
                _ => {
                    return Err(PluralError::SyntaxError(
                        i,
                        1,
                        "Syntax Error: Expected '&&'".to_string(),
                    ))
                }
            },
            '=' => match chars.peek() {
                Some(&(_, '=')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::Eq));
                }
                _ => {
                    return Err(PluralError::SyntaxError(
                        i,
                        1,
                        "Syntax Error: Expected '=='".to_string(),
                    ))
                }
            },
            '!' => match chars.peek() {
                Some(&(_, '=')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::Ne));
                }
                _ => tokens.push(Token::Not(i)),
            },
            '<' => match chars.peek() {
                Some(&(_, '=')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::Le));
                }
                _ => tokens.push(Token::Op(i, 1, BinOp::Lt)),
            },
            '>' => match chars.peek() {
                Some(&(_, '=')) => {
                    chars.next();
                    tokens.push(Token::Op(i, 2, BinOp::Ge));
                }
                _ => tokens.push(Token::Op(i, 1, BinOp::Gt)),
            },
            '0'..='9' => {
                let mut value = u64::from(c.to_digit(10).unwrap());
                let mut len = 1;
                while let Some(&(_, d)) = chars.peek() {
                    match d.to_digit(10) {
                        Some(digit) => {
                            value = value
                                .checked_mul(10)
                                .and_then(|v| v.checked_add(u64::from(digit)))
                                .ok_or_else(|| {
                                    PluralError::SyntaxError(
                                        i,
                                        len + 1,
                                        "Syntax Error: Number too large".to_string(),
                                    )
                                })?;
                            len += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                tokens.push(Token::Num(i, len, value));
            }
            _ => {
                return Err(PluralError::SyntaxError(
                    i,
                    c.len_utf8(),
                    format!("Syntax Error: Unexpected character '{}'", c),
                ))
            }
        }
    }

    Ok(tokens)
}

/// Private internals of PluralExpr
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Var,
    Num(u64),
}

impl Expr {
    fn eval(&self, n: u64) -> u64 {
        match self {
            Expr::Cond(cond, then, otherwise) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
            Expr::Not(inner) => (inner.eval(n) == 0) as u64,
            Expr::Var => n,
            Expr::Num(value) => *value,
            Expr::Binary(op, l, r) => {
                let (l, r) = (l.eval(n), r.eval(n));
                match op {
                    BinOp::Or => (l != 0 || r != 0) as u64,
                    BinOp::And => (l != 0 && r != 0) as u64,
                    BinOp::Eq => (l == r) as u64,
                    BinOp::Ne => (l != r) as u64,
                    BinOp::Lt => (l < r) as u64,
                    BinOp::Gt => (l > r) as u64,
                    BinOp::Le => (l <= r) as u64,
                    BinOp::Ge => (l >= r) as u64,
                    BinOp::Add => l.wrapping_add(r),
                    // counts are unsigned, clamp instead of wrapping around
                    BinOp::Sub => l.saturating_sub(r),
                    BinOp::Mul => l.wrapping_mul(r),
                    BinOp::Div => l.checked_div(r).unwrap_or(0),
                    BinOp::Rem => l.checked_rem(r).unwrap_or(0),
                }
            }
        }
    }
}

macro_rules! gen_binary_parser {
    ($name:ident, $next:ident; $($op:ident),+) => {
        fn $name(stream: &[Token]) -> PluralResult<(&[Token], Expr)> {
            let (mut left, mut res) = $next(stream)?;
            while let Some(&Token::Op(_, _, op @ ($(BinOp::$op)|+))) = left.get(0) {
                let (l, right) = $next(&left[1..])?;
                left = l;
                res = Expr::Binary(op, Box::new(res), Box::new(right));
            }
            Ok((left, res))
        }
    };
}

gen_binary_parser!(parse_o, parse_a; Or);
gen_binary_parser!(parse_a, parse_r; And);
gen_binary_parser!(parse_r, parse_t; Eq, Ne, Lt, Gt, Le, Ge);
gen_binary_parser!(parse_t, parse_f; Add, Sub);
gen_binary_parser!(parse_f, parse_u; Mul, Div, Rem);

// conditional := or ('?' conditional ':' conditional)?
fn parse_c(stream: &[Token]) -> PluralResult<(&[Token], Expr)> {
    let (left, cond) = parse_o(stream)?;
    match left.get(0) {
        Some(Token::Question(_)) => {
            let (left, then) = parse_c(&left[1..])?;
            match left.get(0) {
                Some(Token::Colon(_)) => {
                    let (left, otherwise) = parse_c(&left[1..])?;
                    Ok((
                        left,
                        Expr::Cond(Box::new(cond), Box::new(then), Box::new(otherwise)),
                    ))
                }
                Some(t) => t.get_error("':'"),
                None => Err(PluralError::UnexpectedEndOfExpr),
            }
        }
        _ => Ok((left, cond)),
    }
}

fn parse_u(stream: &[Token]) -> PluralResult<(&[Token], Expr)> {
    match stream.get(0).ok_or(PluralError::UnexpectedEndOfExpr)? {
        Token::Not(_) => {
            let (left, inner) = parse_u(&stream[1..])?;
            Ok((left, Expr::Not(Box::new(inner))))
        }
        Token::LParent(_) => {
            let (left, inner) = parse_c(&stream[1..])?;
            match left.get(0) {
                Some(Token::RParent(_)) => Ok((&left[1..], inner)),
                Some(t) => t.get_error("')'"),
                None => Err(PluralError::UnexpectedEndOfExpr),
            }
        }
        Token::Var(_) => Ok((&stream[1..], Expr::Var)),
        Token::Num(_, _, value) => Ok((&stream[1..], Expr::Num(*value))),
        t => t.get_error("one of '!', '(', 'n' or a number"),
    }
}

/// A compiled plural-selection rule: maps a count to the index of the
/// plural form to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralExpr(Expr);

impl PluralExpr {
    pub fn parse(expr: &str) -> PluralResult<PluralExpr> {
        parse_c(&lex(expr)?)
            .and_then(|(left, res)| {
                if left.is_empty() {
                    Ok(res)
                } else {
                    left[0].get_error("end of expression")
                }
            })
            .map(PluralExpr)
    }

    pub fn index(&self, n: u64) -> usize {
        self.0.eval(n) as usize
    }
}

impl Default for PluralExpr {
    /// English-style two-form rule: `n != 1`.
    fn default() -> PluralExpr {
        PluralExpr(Expr::Binary(
            BinOp::Ne,
            Box::new(Expr::Var),
            Box::new(Expr::Num(1)),
        ))
    }
}
