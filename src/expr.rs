//! IR-2: the resolved program. Every identifier in here was proven bound and
//! every definition proven to sit where the language allows it.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

/// The surface form an `If` node was lowered from, named in its diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conditional {
    If,
    Cond,
    And,
    Or,
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Conditional::If => "if",
            Conditional::Cond => "cond",
            Conditional::And => "and",
            Conditional::Or => "or",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    DefineVariable {
        name: String,
        value: Box<Expr>,
    },
    DefineStructure {
        name: String,
        fields: Vec<String>,
    },
    Lambda(Rc<Lambda>),
    Identifier(String),
    Literal(Value),
    Quoted(Value),
    /// `else_branch` is absent only for the fall-through of a `cond`.
    If {
        form: Conditional,
        test: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
}

#[derive(Debug)]
pub struct Lambda {
    /// Set when the lambda is the body of a `define`.
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Expr,
}

impl Lambda {
    pub fn arity(&self) -> Arity {
        Arity::Exact(self.params.len())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("lambda")
    }
}

#[derive(Clone, Debug)]
pub struct TestCase {
    pub actual: Expr,
    pub expected: Expr,
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub forms: Vec<Expr>,
    pub tests: Vec<TestCase>,
}

impl Expr {
    pub fn boolean(b: bool) -> Expr {
        Expr::Literal(Value::boolean(b))
    }

    pub fn is_definition(&self) -> bool {
        match self {
            Expr::DefineVariable { .. } | Expr::DefineStructure { .. } => true,
            _ => false,
        }
    }
}
