
use std::fmt;
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};

use crate::number::Number;
use crate::runtime::Callable;

/// A user-declared structure type. Compared by identity: two declarations
/// with the same name and fields are still different types.
#[derive(Debug, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Finalize, Trace)]
pub struct Instance {
    #[unsafe_ignore_trace]
    pub kind: Rc<StructType>,
    pub fields: Vec<Value>,
}

#[derive(Debug, Finalize, Trace)]
pub struct Pair {
    pub first: Value,
    pub rest: Value,
}

#[derive(Clone, Debug, Finalize, Trace)]
pub enum Value {
    Boolean(bool),
    Number(Number),
    String(#[unsafe_ignore_trace] Rc<str>),
    Symbol(#[unsafe_ignore_trace] Rc<str>),
    Empty,
    Pair(Gc<Pair>),
    Callable(Callable),
    Structure(#[unsafe_ignore_trace] Rc<StructType>),
    Instance(Gc<Instance>),
}

impl Value {
    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = *self {
            Some(b)
        } else {
            None
        }
    }

    pub fn number(n: Number) -> Value {
        Value::Number(n)
    }

    pub fn as_number(&self) -> Option<&Number> {
        if let Value::Number(ref n) = *self {
            Some(n)
        } else {
            None
        }
    }

    pub fn string<S: Into<Rc<str>>>(s: S) -> Value {
        Value::String(s.into())
    }

    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(ref s) = *self {
            Some(s)
        } else {
            None
        }
    }

    pub fn symbol<S: Into<Rc<str>>>(s: S) -> Value {
        Value::Symbol(s.into())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        if let Value::Symbol(ref s) = *self {
            Some(s)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        if let Value::Empty = *self { true } else { false }
    }

    pub fn cons(first: Value, rest: Value) -> Value {
        Value::Pair(Gc::new(Pair { first, rest }))
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        if let Value::Pair(ref pair) = *self {
            Some((&pair.first, &pair.rest))
        } else {
            None
        }
    }

    pub fn is_list(&self) -> bool {
        let mut head = self;
        loop {
            match head.as_pair() {
                Some((_, rest)) => head = rest,
                None => return head.is_empty(),
            }
        }
    }

    pub fn list<I: IntoIterator<Item=Value>>(iter: I) -> Value
        where I::IntoIter: DoubleEndedIterator {

        let mut res = Value::Empty;
        for elem in iter.into_iter().rev() {
            res = Value::cons(elem, res);
        }
        res
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        if let Value::Callable(ref callable) = *self {
            Some(callable)
        } else {
            None
        }
    }

    pub fn instance(kind: Rc<StructType>, fields: Vec<Value>) -> Value {
        Value::Instance(Gc::new(Instance { kind, fields }))
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        if let Value::Instance(ref instance) = *self {
            Some(instance)
        } else {
            None
        }
    }
}

fn write_string(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "#true"),
            Value::Boolean(false) => write!(f, "#false"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write_string(f, s),
            Value::Symbol(s) => write!(f, "'{}", s),
            Value::Empty => write!(f, "'()"),
            Value::Pair(pair) => write!(f, "(cons {} {})", pair.first, pair.rest),
            Value::Callable(callable) => write!(f, "{}", callable),
            Value::Structure(kind) => write!(f, "#<struct-type:{}>", kind.name),
            Value::Instance(instance) => {
                write!(f, "(make-{}", instance.kind.name)?;
                for field in &instance.fields {
                    write!(f, " {}", field)?;
                }
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod test {
    use num::FromPrimitive;

    use crate::number::Number;
    use super::Value;

    fn int(n: i64) -> Value {
        Value::number(Number::from_i64(n).unwrap())
    }

    #[test]
    fn test_print_atoms() {
        assert_eq!(Value::boolean(true).to_string(), "#true");
        assert_eq!(Value::boolean(false).to_string(), "#false");
        assert_eq!(Value::symbol("apple").to_string(), "'apple");
        assert_eq!(Value::Empty.to_string(), "'()");
        assert_eq!(Value::string("say \"hi\"\n").to_string(),
            "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_print_list() {
        let list = Value::list(vec![int(1), int(2)]);
        assert!(list.is_list());
        assert_eq!(list.to_string(), "(cons 1 (cons 2 '()))");
        assert!(!Value::cons(int(1), int(2)).is_list());
    }
}
