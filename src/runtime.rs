
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use gc::{Finalize, Gc, GcCell, Trace};

use crate::builtin::{self, Builtin};
use crate::config::Config;
use crate::equality::SchemeEq;
use crate::error::{arity_message, Error, RuntimeError};
use crate::expr::{Arity, Conditional, Expr, Lambda, TestCase};
use crate::value::{StructType, Value};

// Grow the native stack by STACK_GROW_SIZE once less than STACK_RED_ZONE is left.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

// Clone-by-reference environment
#[derive(Clone, Finalize, Trace)]
pub struct Environment(Gc<GcCell<EnvironmentData>>);

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<environment>")
    }
}

#[derive(Finalize, Trace)]
pub struct EnvironmentData {
    parent: Option<Environment>,
    local: HashMap<String, Value>,
}

#[derive(Clone, Finalize, Trace)]
pub enum Callable {
    Closure(Closure),
    Builtin(#[unsafe_ignore_trace] &'static Builtin),
    Constructor(#[unsafe_ignore_trace] Rc<StructType>),
    Predicate(#[unsafe_ignore_trace] Rc<StructType>),
    Accessor(#[unsafe_ignore_trace] Rc<StructType>, usize),
}

/// A lambda together with the environment it was evaluated in.
#[derive(Clone, Finalize, Trace)]
pub struct Closure {
    #[unsafe_ignore_trace]
    pub lambda: Rc<Lambda>,
    pub environment: Environment,
}

impl Environment {
    fn from_data(data: EnvironmentData) -> Environment {
        Environment(Gc::new(GcCell::new(data)))
    }

    pub fn from_hashmap(hmap: HashMap<String, Value>) -> Environment {
        Environment::from_data(EnvironmentData {
            parent: None,
            local: hmap,
        })
    }

    pub fn lookup(&self, variable: &str) -> Option<Value> {
        let data = self.0.borrow();
        match data.local.get(variable) {
            Some(value) => Some(value.clone()),
            None => data.parent.as_ref().and_then(|env| env.lookup(variable)),
        }
    }

    pub fn insert(&self, variable: &str, val: Value) {
        self.0.borrow_mut().local.insert(variable.to_string(), val);
    }

    pub fn make_child(&self) -> Environment {
        Environment::from_data(EnvironmentData {
            parent: Some(self.clone()),
            local: HashMap::new(),
        })
    }
}

fn check_arity(name: &str, arity: Arity, args: &[Value]) -> Result<(), Error> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(Error::builtin(arity_message(name, arity, args.len())))
    }
}

impl Callable {
    pub fn name(&self) -> String {
        match self {
            Callable::Closure(closure) => closure.lambda.display_name().to_string(),
            Callable::Builtin(builtin) => builtin.name.to_string(),
            Callable::Constructor(kind) => format!("make-{}", kind.name),
            Callable::Predicate(kind) => format!("{}?", kind.name),
            Callable::Accessor(kind, index) =>
                format!("{}-{}", kind.name, kind.fields[*index]),
        }
    }

    pub fn call(&self, args: Vec<Value>, interpreter: &mut Interpreter) ->
        Result<Value, Error> {

        match self {
            Callable::Builtin(builtin) => builtin.call(args),
            Callable::Closure(closure) => {
                let lambda = &closure.lambda;
                check_arity(lambda.display_name(), lambda.arity(), &args)?;
                let frame = closure.environment.make_child();
                for (param, arg) in lambda.params.iter().zip(args) {
                    frame.insert(param, arg);
                }
                interpreter.enter()?;
                let result = interpreter.eval(&lambda.body, &frame);
                interpreter.leave();
                result
            },
            Callable::Constructor(kind) => {
                let arity = Arity::Exact(kind.fields.len());
                if !arity.accepts(args.len()) {
                    return Err(Error::Runtime(RuntimeError::Structure(
                        arity_message(&self.name(), arity, args.len()))));
                }
                Ok(Value::instance(kind.clone(), args))
            },
            Callable::Predicate(kind) => {
                check_arity(&self.name(), Arity::Exact(1), &args)?;
                let matches = args[0].as_instance()
                    .map_or(false, |instance| Rc::ptr_eq(&instance.kind, kind));
                Ok(Value::boolean(matches))
            },
            Callable::Accessor(kind, index) => {
                check_arity(&self.name(), Arity::Exact(1), &args)?;
                match args[0].as_instance() {
                    Some(instance) if Rc::ptr_eq(&instance.kind, kind) =>
                        Ok(instance.fields[*index].clone()),
                    _ => Err(Error::Runtime(RuntimeError::Structure(format!(
                        "{}: expects a {}, given {}", self.name(), kind.name,
                        args[0])))),
                }
            },
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#<procedure:{}>", self.name())
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Evaluates resolved programs. One interpreter per run; the global frame
/// starts out holding the built-in library.
pub struct Interpreter {
    globals: Environment,
    depth: usize,
    max_depth: usize,
}

impl Interpreter {
    pub fn new(config: &Config) -> Interpreter {
        Interpreter {
            globals: builtin::initial_environment(),
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            return Err(Error::StackOverflow);
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Runs one top-level form. Definitions produce no value to print.
    pub fn execute(&mut self, form: &Expr) -> Result<Option<Value>, Error> {
        let globals = self.globals.clone();
        match form {
            Expr::DefineVariable { name, value } => {
                let value = self.eval(value, &globals)?;
                globals.insert(name, value);
                Ok(None)
            },
            Expr::DefineStructure { name, fields } => {
                let kind = Rc::new(StructType {
                    name: name.clone(),
                    fields: fields.clone(),
                });
                globals.insert(name, Value::Structure(kind.clone()));
                let constructor = Callable::Constructor(kind.clone());
                globals.insert(&constructor.name(), Value::Callable(constructor));
                let predicate = Callable::Predicate(kind.clone());
                globals.insert(&predicate.name(), Value::Callable(predicate));
                for index in 0..fields.len() {
                    let accessor = Callable::Accessor(kind.clone(), index);
                    globals.insert(&accessor.name(), Value::Callable(accessor));
                }
                Ok(None)
            },
            expr => self.eval(expr, &globals).map(Some),
        }
    }

    pub fn eval(&mut self, expr: &Expr, env: &Environment) -> Result<Value, Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Expr, env: &Environment) -> Result<Value, Error> {
        match expr {
            Expr::Literal(value) | Expr::Quoted(value) => Ok(value.clone()),
            Expr::Identifier(name) => env.lookup(name).ok_or_else(||
                Error::internal(format!("{} is unbound after resolution", name))),
            Expr::Lambda(lambda) => Ok(Value::Callable(Callable::Closure(Closure {
                lambda: lambda.clone(),
                environment: env.clone(),
            }))),
            Expr::Call { callee, arguments } => {
                let procedure = self.eval(callee, env)?;
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval(argument, env)?);
                }
                match procedure.as_callable() {
                    Some(callable) => callable.call(args, self),
                    None => Err(Error::internal(format!(
                        "tried to call the non-procedure {}", procedure))),
                }
            },
            Expr::If { form, test, then_branch, else_branch } => {
                let question = self.eval(test, env)?;
                match question.as_boolean() {
                    Some(true) => self.eval(then_branch, env),
                    Some(false) => match else_branch {
                        Some(else_branch) => self.eval(else_branch, env),
                        None => Err(Error::Runtime(RuntimeError::Condition(
                            "cond: all question results were false".to_string()))),
                    },
                    None => Err(question_error(*form, &question)),
                }
            },
            Expr::DefineVariable { .. } | Expr::DefineStructure { .. } =>
                Err(Error::internal("definition reached outside the top level")),
        }
    }

    pub fn run_test(&mut self, test: &TestCase) -> Result<(), Error> {
        let globals = self.globals.clone();
        let actual = self.eval(&test.actual, &globals)?;
        let expected = self.eval(&test.expected, &globals)?;
        if actual.equal(&expected) {
            Ok(())
        } else {
            Err(Error::Runtime(RuntimeError::TestFailure {
                actual: actual.to_string(),
                expected: expected.to_string(),
            }))
        }
    }
}

fn question_error(form: Conditional, question: &Value) -> Error {
    Error::Runtime(RuntimeError::Condition(format!(
        "{}: question result is not true or false: {}", form, question)))
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use num::FromPrimitive;

    use crate::number::Number;
    use crate::value::Value;
    use super::Environment;

    #[test]
    fn test_child_environment_shadows_parent() {
        let globals = Environment::from_hashmap(HashMap::new());
        globals.insert("x", Value::number(Number::from_i64(1).unwrap()));
        let child = globals.make_child();
        child.insert("x", Value::boolean(true));
        assert_eq!(child.lookup("x").and_then(|v| v.as_boolean()), Some(true));
        assert!(globals.lookup("x").and_then(|v| v.as_boolean()).is_none());
        assert!(child.lookup("y").is_none());
    }
}
