
use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts;

use crate::equality::SchemeEq;
use crate::error::{arity_message, Error};
use crate::expr::Arity;
use crate::number::{ArithmeticError, Number, Real};
use crate::read;
use crate::runtime::{Callable, Environment};
use crate::value::Value;

/// Why a primitive rejected its arguments. `Builtin::call` attaches the
/// primitive's name.
#[derive(Debug)]
pub enum Fault {
    Expected(&'static str, Value),
    DivideByZero,
    Arity(Arity, usize),
    Message(String),
}

type Primitive = fn(Vec<Value>) -> Result<Value, Fault>;

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    primitive: Primitive,
}

impl Builtin {
    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        if !self.arity.accepts(args.len()) {
            return Err(Error::builtin(arity_message(self.name, self.arity,
                args.len())));
        }
        (self.primitive)(args).map_err(|fault| match fault {
            Fault::Expected(kind, value) => Error::builtin(format!(
                "{}: expects {}, given {}", self.name, kind, value)),
            Fault::DivideByZero => Error::divide_by_zero(self.name),
            Fault::Arity(arity, found) =>
                Error::builtin(arity_message(self.name, arity, found)),
            Fault::Message(message) =>
                Error::builtin(format!("{}: {}", self.name, message)),
        })
    }
}

fn number(value: &Value) -> Result<&Number, Fault> {
    value.as_number().ok_or_else(|| Fault::Expected("a number", value.clone()))
}

fn real(value: &Value) -> Result<&Real, Fault> {
    value.as_number().and_then(Number::as_real)
        .ok_or_else(|| Fault::Expected("a real number", value.clone()))
}

fn integer(value: &Value) -> Result<&Real, Fault> {
    match value.as_number().and_then(Number::as_real) {
        Some(r) if r.is_integer() => Ok(r),
        _ => Err(Fault::Expected("an integer", value.clone())),
    }
}

fn natural(value: &Value) -> Result<usize, Fault> {
    integer(value).ok()
        .filter(|r| r.is_exact() && !r.is_negative())
        .and_then(|r| r.to_integer())
        .and_then(|n| num::ToPrimitive::to_usize(&n))
        .ok_or_else(|| Fault::Expected("a natural number", value.clone()))
}

fn boolean(value: &Value) -> Result<bool, Fault> {
    value.as_boolean().ok_or_else(|| Fault::Expected("a boolean", value.clone()))
}

fn string(value: &Value) -> Result<&str, Fault> {
    value.as_string().ok_or_else(|| Fault::Expected("a string", value.clone()))
}

fn symbol(value: &Value) -> Result<&str, Fault> {
    value.as_symbol().ok_or_else(|| Fault::Expected("a symbol", value.clone()))
}

fn arithmetic(err: ArithmeticError, value: &Value) -> Fault {
    match err {
        ArithmeticError::DivideByZero => Fault::DivideByZero,
        ArithmeticError::NoExactRepresentation =>
            Fault::Message(format!("no exact representation for {}", value)),
    }
}

fn int(n: i64) -> Value {
    Value::number(Number::real(Real::integer(n)))
}

// Section: numbers

fn sum(args: Vec<Value>) -> Result<Value, Fault> {
    let mut total = number(&args[0])?.clone();
    for arg in &args[1..] {
        total = total.add(number(arg)?);
    }
    Ok(Value::number(total))
}

fn times(args: Vec<Value>) -> Result<Value, Fault> {
    let mut total = number(&args[0])?.clone();
    for arg in &args[1..] {
        total = total.mul(number(arg)?);
    }
    Ok(Value::number(total))
}

fn minus(args: Vec<Value>) -> Result<Value, Fault> {
    let first = number(&args[0])?;
    if args.len() == 1 {
        return Ok(Value::number(first.negate()));
    }
    let mut total = first.clone();
    for arg in &args[1..] {
        total = total.sub(number(arg)?);
    }
    Ok(Value::number(total))
}

fn divide(args: Vec<Value>) -> Result<Value, Fault> {
    let mut total = number(&args[0])?.clone();
    for arg in &args[1..] {
        total = total.div(number(arg)?).map_err(|e| arithmetic(e, arg))?;
    }
    Ok(Value::number(total))
}

fn comparison<A, Conv, Comp>(args: Vec<Value>, convert: Conv, cmp: Comp) ->
        Result<Value, Fault>
    where
        Conv: Fn(&Value) -> Result<A, Fault>,
        Comp: Fn(&A, &A) -> bool {

    let mut previous = convert(&args[0])?;
    let mut condition = true;
    for elem in &args[1..] {
        let next = convert(elem)?;
        condition = condition && cmp(&previous, &next);
        previous = next;
    }
    Ok(Value::boolean(condition))
}

fn real_comparison(args: Vec<Value>, accept: fn(Ordering) -> bool) ->
    Result<Value, Fault> {

    comparison(args, |x| real(x).map(Real::clone),
        |a, b| a.partial_cmp(b).map_or(false, accept))
}

fn num_eq(args: Vec<Value>) -> Result<Value, Fault> {
    comparison(args, |x| number(x).map(Number::clone), |a, b| a.num_eq(b))
}

fn less(args: Vec<Value>) -> Result<Value, Fault> {
    real_comparison(args, |o| o == Ordering::Less)
}

fn greater(args: Vec<Value>) -> Result<Value, Fault> {
    real_comparison(args, |o| o == Ordering::Greater)
}

fn less_equal(args: Vec<Value>) -> Result<Value, Fault> {
    real_comparison(args, |o| o != Ordering::Greater)
}

fn greater_equal(args: Vec<Value>) -> Result<Value, Fault> {
    real_comparison(args, |o| o != Ordering::Less)
}

fn add1(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(number(&args[0])?.add(&Number::real(Real::integer(1)))))
}

fn sub1(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(number(&args[0])?.sub(&Number::real(Real::integer(1)))))
}

fn abs(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(real(&args[0])?.abs())))
}

fn sqr(args: Vec<Value>) -> Result<Value, Fault> {
    let n = number(&args[0])?;
    Ok(Value::number(n.mul(n)))
}

fn sqrt(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(number(&args[0])?.sqrt()))
}

fn expt(args: Vec<Value>) -> Result<Value, Fault> {
    let base = number(&args[0])?;
    let power = number(&args[1])?;
    base.expt(power).map(Value::number).map_err(|e| arithmetic(e, &args[0]))
}

fn extremum(args: Vec<Value>, keep: Ordering) -> Result<Value, Fault> {
    let mut best = real(&args[0])?.clone();
    let mut inexact = !best.is_exact();
    for arg in &args[1..] {
        let next = real(arg)?;
        inexact = inexact || !next.is_exact();
        if next.partial_cmp(&best) == Some(keep) {
            best = next.clone();
        }
    }
    if inexact {
        best = best.to_float();
    }
    Ok(Value::number(Number::real(best)))
}

fn max(args: Vec<Value>) -> Result<Value, Fault> {
    extremum(args, Ordering::Greater)
}

fn min(args: Vec<Value>) -> Result<Value, Fault> {
    extremum(args, Ordering::Less)
}

fn integer_division(args: Vec<Value>,
    op: fn(&Real, &Real) -> Result<Real, ArithmeticError>) ->
    Result<Value, Fault> {

    let a = integer(&args[0])?;
    let b = integer(&args[1])?;
    op(a, b).map(|r| Value::number(Number::real(r)))
        .map_err(|e| arithmetic(e, &args[1]))
}

fn quotient(args: Vec<Value>) -> Result<Value, Fault> {
    integer_division(args, Real::quotient)
}

fn remainder(args: Vec<Value>) -> Result<Value, Fault> {
    integer_division(args, Real::remainder)
}

fn modulo(args: Vec<Value>) -> Result<Value, Fault> {
    integer_division(args, Real::modulo)
}

fn floor(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(real(&args[0])?.floor())))
}

fn ceiling(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(real(&args[0])?.ceiling())))
}

fn round(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(real(&args[0])?.round())))
}

fn rational(value: &Value) -> Result<&Real, Fault> {
    match value.as_number().and_then(Number::as_real) {
        Some(r) if r.to_rational().is_ok() => Ok(r),
        _ => Err(Fault::Expected("a rational number", value.clone())),
    }
}

fn numerator(args: Vec<Value>) -> Result<Value, Fault> {
    let r = rational(&args[0])?;
    r.numerator().map(|n| Value::number(Number::real(n)))
        .map_err(|e| arithmetic(e, &args[0]))
}

fn denominator(args: Vec<Value>) -> Result<Value, Fault> {
    let r = rational(&args[0])?;
    r.denominator().map(|n| Value::number(Number::real(n)))
        .map_err(|e| arithmetic(e, &args[0]))
}

fn exact_to_inexact(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(number(&args[0])?.to_inexact()))
}

fn inexact_to_exact(args: Vec<Value>) -> Result<Value, Fault> {
    number(&args[0])?.to_exact().map(Value::number)
        .map_err(|e| arithmetic(e, &args[0]))
}

fn real_part(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(number(&args[0])?.real_part())))
}

fn imag_part(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(Number::real(number(&args[0])?.imag_part())))
}

fn magnitude(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::number(number(&args[0])?.magnitude()))
}

fn is_zero(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(number(&args[0])?.is_zero()))
}

fn is_positive(args: Vec<Value>) -> Result<Value, Fault> {
    let r = real(&args[0])?;
    Ok(Value::boolean(!r.is_negative() && !r.is_zero()))
}

fn is_negative(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(real(&args[0])?.is_negative()))
}

fn is_even(args: Vec<Value>) -> Result<Value, Fault> {
    let n = integer(&args[0])?.to_integer();
    Ok(Value::boolean(n.map_or(false, |n| num::Integer::is_even(&n))))
}

fn is_odd(args: Vec<Value>) -> Result<Value, Fault> {
    let n = integer(&args[0])?.to_integer();
    Ok(Value::boolean(n.map_or(false, |n| num::Integer::is_odd(&n))))
}

fn is_number(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].as_number().is_some()))
}

fn is_integer(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(integer(&args[0]).is_ok()))
}

fn is_rational(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(rational(&args[0]).is_ok()))
}

fn is_real(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(real(&args[0]).is_ok()))
}

fn is_exact(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(number(&args[0])?.is_exact()))
}

fn is_inexact(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(number(&args[0])?.is_inexact()))
}

// Printed without the `#i` marker.
fn number_to_string(args: Vec<Value>) -> Result<Value, Fault> {
    let text = number(&args[0])?.to_string();
    Ok(Value::string(text.trim_start_matches("#i")))
}

// Section: booleans

fn not(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(!boolean(&args[0])?))
}

fn is_boolean(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].as_boolean().is_some()))
}

fn boolean_equal(args: Vec<Value>) -> Result<Value, Fault> {
    comparison(args, boolean, |a, b| a == b)
}

// Section: strings and symbols

fn is_string(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].as_string().is_some()))
}

fn string_length(args: Vec<Value>) -> Result<Value, Fault> {
    let length = string(&args[0])?.chars().count();
    Ok(int(length as i64))
}

fn string_append(args: Vec<Value>) -> Result<Value, Fault> {
    let mut result = String::new();
    for arg in &args {
        result.push_str(string(arg)?);
    }
    Ok(Value::string(result))
}

fn string_equal(args: Vec<Value>) -> Result<Value, Fault> {
    comparison(args, |x| string(x).map(str::to_string), |a, b| a == b)
}

fn string_less(args: Vec<Value>) -> Result<Value, Fault> {
    comparison(args, |x| string(x).map(str::to_string), |a, b| a < b)
}

fn substring(args: Vec<Value>) -> Result<Value, Fault> {
    if args.len() > 3 {
        return Err(Fault::Arity(Arity::Exact(3), args.len()));
    }
    let chars: Vec<char> = string(&args[0])?.chars().collect();
    let start = natural(&args[1])?;
    let end = match args.get(2) {
        Some(end) => natural(end)?,
        None => chars.len(),
    };
    if start > chars.len() {
        return Err(Fault::Message(format!(
            "starting index is out of range: {}", start)));
    }
    if end < start || end > chars.len() {
        return Err(Fault::Message(format!(
            "ending index is out of range: {}", end)));
    }
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn string_to_number(args: Vec<Value>) -> Result<Value, Fault> {
    match read::parse_number(string(&args[0])?) {
        Some(Ok(n)) => Ok(Value::number(n)),
        _ => Ok(Value::boolean(false)),
    }
}

fn string_to_symbol(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::symbol(string(&args[0])?))
}

fn symbol_to_string(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::string(symbol(&args[0])?))
}

fn is_symbol(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].as_symbol().is_some()))
}

fn symbol_equal(args: Vec<Value>) -> Result<Value, Fault> {
    comparison(args, |x| symbol(x).map(str::to_string), |a, b| a == b)
}

fn string_upcase(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::string(string(&args[0])?.to_uppercase()))
}

fn string_downcase(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::string(string(&args[0])?.to_lowercase()))
}

// Section: lists

fn cons(args: Vec<Value>) -> Result<Value, Fault> {
    if !args[1].is_list() {
        return Err(Fault::Message(format!(
            "second argument must be a list, but received {} and {}",
            args[0], args[1])));
    }
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

fn non_empty(value: &Value) -> Result<(&Value, &Value), Fault> {
    value.as_pair()
        .ok_or_else(|| Fault::Expected("a non-empty list", value.clone()))
}

fn first(args: Vec<Value>) -> Result<Value, Fault> {
    non_empty(&args[0]).map(|(first, _)| first.clone())
}

fn rest(args: Vec<Value>) -> Result<Value, Fault> {
    non_empty(&args[0]).map(|(_, rest)| rest.clone())
}

fn is_empty(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].is_empty()))
}

fn is_cons(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].as_pair().is_some()))
}

fn list(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::list(args))
}

fn is_list(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].is_list()))
}

fn length(args: Vec<Value>) -> Result<Value, Fault> {
    if !args[0].is_list() {
        return Err(Fault::Expected("a list", args[0].clone()));
    }
    let mut count = 0;
    let mut head = &args[0];
    while let Some((_, rest)) = head.as_pair() {
        count += 1;
        head = rest;
    }
    Ok(int(count))
}

fn equal(args: Vec<Value>) -> Result<Value, Fault> {
    Ok(Value::boolean(args[0].equal(&args[1])))
}

fn exactly(n: usize, primitive: Primitive) -> (Arity, Primitive) {
    (Arity::Exact(n), primitive)
}

fn at_least(n: usize, primitive: Primitive) -> (Arity, Primitive) {
    (Arity::AtLeast(n), primitive)
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let table = hashmap! {
            "+" => at_least(2, sum),
            "-" => at_least(1, minus),
            "*" => at_least(2, times),
            "/" => at_least(2, divide),
            "=" => at_least(2, num_eq),
            "<" => at_least(2, less),
            ">" => at_least(2, greater),
            "<=" => at_least(2, less_equal),
            ">=" => at_least(2, greater_equal),
            "add1" => exactly(1, add1),
            "sub1" => exactly(1, sub1),
            "abs" => exactly(1, abs),
            "sqr" => exactly(1, sqr),
            "sqrt" => exactly(1, sqrt),
            "expt" => exactly(2, expt),
            "max" => at_least(1, max),
            "min" => at_least(1, min),
            "quotient" => exactly(2, quotient),
            "remainder" => exactly(2, remainder),
            "modulo" => exactly(2, modulo),
            "floor" => exactly(1, floor),
            "ceiling" => exactly(1, ceiling),
            "round" => exactly(1, round),
            "numerator" => exactly(1, numerator),
            "denominator" => exactly(1, denominator),
            "exact->inexact" => exactly(1, exact_to_inexact),
            "inexact->exact" => exactly(1, inexact_to_exact),
            "real-part" => exactly(1, real_part),
            "imag-part" => exactly(1, imag_part),
            "magnitude" => exactly(1, magnitude),
            "zero?" => exactly(1, is_zero),
            "positive?" => exactly(1, is_positive),
            "negative?" => exactly(1, is_negative),
            "even?" => exactly(1, is_even),
            "odd?" => exactly(1, is_odd),
            "number?" => exactly(1, is_number),
            "integer?" => exactly(1, is_integer),
            "rational?" => exactly(1, is_rational),
            "real?" => exactly(1, is_real),
            "complex?" => exactly(1, is_number),
            "exact?" => exactly(1, is_exact),
            "inexact?" => exactly(1, is_inexact),
            "number->string" => exactly(1, number_to_string),
            "not" => exactly(1, not),
            "boolean?" => exactly(1, is_boolean),
            "boolean=?" => exactly(2, boolean_equal),
            "string?" => exactly(1, is_string),
            "string-length" => exactly(1, string_length),
            "string-append" => at_least(0, string_append),
            "string=?" => at_least(2, string_equal),
            "string<?" => at_least(2, string_less),
            "substring" => at_least(2, substring),
            "string->number" => exactly(1, string_to_number),
            "string->symbol" => exactly(1, string_to_symbol),
            "symbol->string" => exactly(1, symbol_to_string),
            "symbol?" => exactly(1, is_symbol),
            "symbol=?" => exactly(2, symbol_equal),
            "string-upcase" => exactly(1, string_upcase),
            "string-downcase" => exactly(1, string_downcase),
            "cons" => exactly(2, cons),
            "first" => exactly(1, first),
            "rest" => exactly(1, rest),
            "empty?" => exactly(1, is_empty),
            "cons?" => exactly(1, is_cons),
            "list" => at_least(0, list),
            "list?" => exactly(1, is_list),
            "length" => exactly(1, length),
            "equal?" => exactly(2, equal),
        };
        table.into_iter()
            .map(|(name, (arity, primitive))|
                (name, Builtin { name, arity, primitive }))
            .collect()
    };
}

const LITERALS: &[&str] = &["true", "false", "empty", "null", "pi", "e"];

fn literal_value(name: &str) -> Option<Value> {
    match name {
        "true" => Some(Value::boolean(true)),
        "false" => Some(Value::boolean(false)),
        "empty" | "null" => Some(Value::Empty),
        "pi" => Some(Value::number(Number::float(consts::PI))),
        "e" => Some(Value::number(Number::float(consts::E))),
        _ => None,
    }
}

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

pub fn is_literal(name: &str) -> bool {
    LITERALS.contains(&name)
}

pub fn initial_environment() -> Environment {
    let mut bindings: HashMap<String, Value> = BUILTINS.values()
        .map(|builtin| (builtin.name.to_string(),
            Value::Callable(Callable::Builtin(builtin))))
        .collect();
    for name in LITERALS {
        if let Some(value) = literal_value(name) {
            bindings.insert(name.to_string(), value);
        }
    }
    Environment::from_hashmap(bindings)
}

#[cfg(test)]
mod test {
    use crate::read::parse_number;
    use crate::value::Value;
    use super::lookup;

    fn num(text: &str) -> Value {
        Value::number(parse_number(text).unwrap().unwrap())
    }

    fn call(name: &str, args: Vec<Value>) -> String {
        match lookup(name).unwrap().call(args) {
            Ok(value) => value.to_string(),
            Err(err) => err.to_string(),
        }
    }

    fn comparison(name: &str, args: &[&str], output: &str) {
        assert_eq!(call(name, args.iter().map(|a| num(a)).collect()), output);
    }

    #[test]
    fn test_arithmetic() {
        comparison("+", &["1", "2", "3"], "6");
        comparison("-", &["5"], "-5");
        comparison("-", &["10", "1", "2"], "7");
        comparison("*", &["1/2", "4"], "2");
        comparison("/", &["1", "4"], "0.25");
        comparison("/", &["4", "0"], "/: division by zero");
        comparison("+", &["1", "0.5"], "#i1.5");
    }

    #[test]
    fn test_comparisons() {
        comparison("<", &["1", "2", "3"], "#true");
        comparison("<", &["1", "3", "2"], "#false");
        comparison("=", &["1", "1.0"], "#true");
        comparison(">=", &["2", "2", "1"], "#true");
    }

    #[test]
    fn test_integer_operations() {
        comparison("quotient", &["17", "5"], "3");
        comparison("modulo", &["-7", "2"], "1");
        comparison("remainder", &["7", "0"], "remainder: division by zero");
        comparison("max", &["1", "2.0", "3"], "#i3.0");
        comparison("even?", &["4"], "#true");
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(call("+", vec![num("1"), Value::string("a")]),
            "+: expects a number, given \"a\"");
        assert_eq!(call("+", vec![num("1")]),
            "+: expects at least 2 arguments, but found only 1");
        assert_eq!(call("first", vec![Value::Empty]),
            "first: expects a non-empty list, given '()");
        assert_eq!(call("add1", vec![]), "add1: expects 1 argument, but found none");
    }

    #[test]
    fn test_strings() {
        assert_eq!(call("string-append",
            vec![Value::string("ab"), Value::string("cd")]), "\"abcd\"");
        assert_eq!(call("substring", vec![Value::string("hello"), num("1"),
            num("3")]), "\"el\"");
        assert_eq!(call("string->number", vec![Value::string("1/2")]), "0.5");
        assert_eq!(call("string->number", vec![Value::string("x")]), "#false");
        assert_eq!(call("number->string", vec![num("2.5")]), "\"2.5\"");
    }

    #[test]
    fn test_lists() {
        assert_eq!(call("cons", vec![num("1"), Value::Empty]), "(cons 1 '())");
        assert_eq!(call("cons", vec![num("1"), num("2")]),
            "cons: second argument must be a list, but received 1 and 2");
        assert_eq!(call("length", vec![Value::list(vec![num("1"), num("2")])]),
            "2");
    }
}
