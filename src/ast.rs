use crate::types::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An already computed value, used when the runtime hands values back
    /// through the normal argument path.
    Literal(Value),
    Number(f64),
    StringLit(String),
    Null,
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Variable(String),
    FunctionCall { name: String, args: Vec<Expr> },
    /// `target(args...)` where `target` evaluates to a lambda.
    Invoke { target: Box<Expr>, args: Vec<Expr> },
    Spread(Box<Expr>),
    Array(Vec<Expr>),
    TypeCast { expr: Box<Expr>, ty: TypeName },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Float,
    String,
    Boolean,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}
