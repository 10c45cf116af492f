use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    /// Truncated subtraction: never goes below zero.
    Minus,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Plus => f.write_str("+"),
            BinaryOperator::Minus => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(u64),
    Identifier(String),
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `count` is evaluated once, before the first iteration.
    Loop {
        count: Box<Expr>,
        body: Box<Expr>,
    },
    Assign {
        target: String,
        value: Box<Expr>,
    },
    /// `second` is `None` for a trailing `;` at the end of the input.
    Sequence {
        first: Box<Expr>,
        second: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn looped(count: Expr, body: Expr) -> Self {
        Expr::Loop {
            count: Box::new(count),
            body: Box::new(body),
        }
    }

    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Expr::Assign {
            target: target.into(),
            value: Box::new(value),
        }
    }

    pub fn sequence(first: Expr, second: Option<Expr>) -> Self {
        Expr::Sequence {
            first: Box::new(first),
            second: second.map(Box::new),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Identifier(name) => f.write_str(name),
            Expr::BinaryOp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Loop { count, body } => write!(f, "loop {} do {} end", count, body),
            Expr::Assign { target, value } => write!(f, "{} = {}", target, value),
            Expr::Sequence { .. } => {
                let mut current = self;
                loop {
                    match current {
                        Expr::Sequence { first, second } => {
                            write!(f, "{}", first)?;
                            match second {
                                Some(rest) => {
                                    f.write_str("; ")?;
                                    current = &**rest;
                                }
                                None => return f.write_str(";"),
                            }
                        }
                        last => return write!(f, "{}", last),
                    }
                }
            }
        }
    }
}

/// Long `;` chains nest one level per statement, so children are released from a work list
/// instead of through recursive drops.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Expr {
    fn is_leaf(&self) -> bool {
        matches!(self, Expr::Number(_) | Expr::Identifier(_))
    }

    /// Moves every non-leaf child into `pending`, leaving leaves in their place.
    fn detach_children(&mut self, pending: &mut Vec<Expr>) {
        let mut detach = |child: &mut Box<Expr>| {
            if !child.is_leaf() {
                pending.push(std::mem::replace(&mut **child, Expr::Number(0)));
            }
        };

        match self {
            Expr::Number(_) | Expr::Identifier(_) => {}
            Expr::BinaryOp { lhs, rhs, .. } => {
                detach(lhs);
                detach(rhs);
            }
            Expr::Loop { count, body } => {
                detach(count);
                detach(body);
            }
            Expr::Assign { value, .. } => detach(value),
            Expr::Sequence { first, second } => {
                detach(first);
                if let Some(second) = second {
                    detach(second);
                }
            }
        }
    }
}

/// One compilation unit: a function of `n` that returns the final value of `f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevel {
    pub body: Expr,
}

impl TopLevel {
    pub fn new(body: Expr) -> Self {
        Self { body }
    }
}

impl fmt::Display for TopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}
