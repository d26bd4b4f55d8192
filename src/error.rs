//! Diagnostics. Every variant displays as the exact line shown to the student.

use thiserror::Error;

use crate::expr::Arity;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Malformed literal, unterminated string or comment, unknown `#` form.
    #[error("{0}")]
    Scan(String),
    /// Unbalanced delimiters, keyword outside head position.
    #[error("{0}")]
    Read(String),
    #[error("{0}")]
    Resolve(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Recursion ran past the configured call depth.
    #[error("out of memory: the program recursed too deeply")]
    StackOverflow,
    /// An invariant established by resolution did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("{operator}: division by zero")]
    DivideByZero { operator: String },
    #[error("{0}")]
    Builtin(String),
    #[error("{0}")]
    Structure(String),
    #[error("{0}")]
    Condition(String),
    #[error("Actual value {actual} differs from {expected}, the expected value.")]
    TestFailure { actual: String, expected: String },
}

impl Error {
    pub fn scan<S: ToString>(message: S) -> Error {
        Error::Scan(format!("read-syntax: {}", message.to_string()))
    }

    pub fn read<S: ToString>(message: S) -> Error {
        Error::Read(message.to_string())
    }

    pub fn resolve<S: ToString>(message: S) -> Error {
        Error::Resolve(message.to_string())
    }

    pub fn builtin<S: ToString>(message: S) -> Error {
        Error::Runtime(RuntimeError::Builtin(message.to_string()))
    }

    pub fn internal<S: ToString>(message: S) -> Error {
        Error::Internal(message.to_string())
    }

    pub fn divide_by_zero(operator: &str) -> Error {
        Error::Runtime(RuntimeError::DivideByZero {
            operator: operator.to_string(),
        })
    }

    pub fn is_fatal(&self) -> bool {
        match self {
            Error::StackOverflow | Error::Internal(_) => true,
            _ => false,
        }
    }
}

/// `1 argument`, `2 arguments`.
pub fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// The arity-mismatch clause shared by user functions, structure
/// constructors, built-ins and the checked special forms.
pub fn arity_message(name: &str, arity: Arity, found: usize) -> String {
    let found_short = |found: usize| {
        if found == 0 {
            "none".to_string()
        } else {
            format!("only {}", found)
        }
    };
    match arity {
        Arity::Exact(0) => format!("{}: expects no arguments, but found {}",
            name, plural(found, "argument")),
        Arity::Exact(n) if found < n => format!("{}: expects {}, but found {}",
            name, plural(n, "argument"), found_short(found)),
        Arity::Exact(n) => format!("{}: expects only {}, but found {}", name,
            plural(n, "argument"), found),
        Arity::AtLeast(n) => format!("{}: expects at least {}, but found {}",
            name, plural(n, "argument"), found_short(found)),
    }
}

#[test]
fn test_arity_wording() {
    assert_eq!(arity_message("f", Arity::Exact(0), 1),
        "f: expects no arguments, but found 1 argument");
    assert_eq!(arity_message("f", Arity::Exact(2), 1),
        "f: expects 2 arguments, but found only 1");
    assert_eq!(arity_message("f", Arity::Exact(1), 0),
        "f: expects 1 argument, but found none");
    assert_eq!(arity_message("f", Arity::Exact(1), 3),
        "f: expects only 1 argument, but found 3");
    assert_eq!(arity_message("+", Arity::AtLeast(2), 1),
        "+: expects at least 2 arguments, but found only 1");
}

#[test]
fn test_division_message() {
    assert_eq!(Error::divide_by_zero("/").to_string(), "/: division by zero");
}
