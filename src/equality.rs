
use std::ptr;
use std::rc::Rc;

use gc::Gc;

use crate::runtime::Callable;
use crate::value::Value;

pub trait SchemeEq {
    fn eqv(&self, other: &Self) -> bool {
        self as *const _ == other as *const _
    }

    fn equal(&self, other: &Self) -> bool {
        self.eqv(other)
    }
}

impl SchemeEq for Callable {
    fn eqv(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Closure(a), Callable::Closure(b)) =>
                Rc::ptr_eq(&a.lambda, &b.lambda),
            (Callable::Builtin(a), Callable::Builtin(b)) => ptr::eq(*a, *b),
            (Callable::Constructor(a), Callable::Constructor(b))
                | (Callable::Predicate(a), Callable::Predicate(b)) =>
                Rc::ptr_eq(a, b),
            (Callable::Accessor(a, i), Callable::Accessor(b, j)) =>
                Rc::ptr_eq(a, b) && i == j,
            _ => false,
        }
    }
}

impl SchemeEq for Value {
    // Identity for heap values, content for atoms.
    fn eqv(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Empty, Value::Empty) => true,
            (Value::Pair(a), Value::Pair(b)) => Gc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => a.eqv(b),
            (Value::Structure(a), Value::Structure(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Gc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Numbers compare by value regardless of exactness.
    fn equal(&self, other: &Value) -> bool {
        if let Some(n) = self.as_number() {
            other.as_number().map_or(false, |m| n.num_eq(m))
        } else if let s@Some(_) = self.as_string() {
            s == other.as_string()
        } else if let Some((a, b)) = self.as_pair() {
            other.as_pair().map_or(false, |(x, y)| a.equal(x) && b.equal(y))
        } else if let Some(instance) = self.as_instance() {
            other.as_instance().map_or(false, |that| {
                Rc::ptr_eq(&instance.kind, &that.kind)
                    && instance.fields.iter().zip(&that.fields)
                        .all(|(a, b)| a.equal(b))
            })
        } else {
            self.eqv(other)
        }
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use num::FromPrimitive;

    use crate::number::Number;
    use crate::value::{StructType, Value};
    use super::SchemeEq;

    fn int(n: i64) -> Value {
        Value::number(Number::from_i64(n).unwrap())
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let inexact = Value::number(Number::float(2.0));
        assert!(int(2).equal(&inexact));
        assert!(!int(2).eqv(&inexact));
    }

    #[test]
    fn test_lists_compare_structurally() {
        let a = Value::list(vec![int(1), Value::string("x")]);
        let b = Value::list(vec![int(1), Value::string("x")]);
        assert!(a.equal(&b));
        assert!(!a.eqv(&b));
        assert!(!a.equal(&Value::list(vec![int(1)])));
    }

    #[test]
    fn test_instances_compare_by_type_and_fields() {
        let point = Rc::new(StructType {
            name: "point".to_string(),
            fields: vec!["x".to_string()],
        });
        let twin = Rc::new(StructType {
            name: "point".to_string(),
            fields: vec!["x".to_string()],
        });
        let p = Value::instance(point.clone(), vec![int(1)]);
        assert!(p.equal(&Value::instance(point, vec![int(1)])));
        assert!(!p.equal(&Value::instance(twin, vec![int(1)])));
    }
}
