//! Static checks and lowering from IR-1 (`Syntax`) to IR-2 (`Expr`).
//!
//! Resolution is a single pass in source order: a name must be defined
//! before it is used, except inside the function body that defines it and
//! inside `check-expect`, which is resolved after everything else.

use std::collections::{HashMap, HashSet};
use std::mem;
use std::rc::Rc;

use either::Either;

use crate::builtin;
use crate::error::{arity_message, plural, Error};
use crate::expr::{Arity, Conditional, Expr, Lambda, Program, TestCase};
use crate::read::{Keyword, Literal, Syntax};
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Variable,
    Function(Arity),
    BuiltinFunction(Arity),
    BuiltinLiteral,
    Structure,
    Parameter,
}

impl Kind {
    fn is_builtin(self) -> bool {
        match self {
            Kind::BuiltinFunction(_) | Kind::BuiltinLiteral => true,
            _ => false,
        }
    }
}

/// Scopes from outermost (the top level) to innermost. The built-in
/// library sits below the top level and is consulted last.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Kind>>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn define(&mut self, name: &str, kind: Kind) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), kind);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Kind> {
        self.scopes.iter().rev()
            .find_map(|scope| scope.get(name).copied())
            .or_else(|| builtin_kind(name))
    }
}

fn builtin_kind(name: &str) -> Option<Kind> {
    if let Some(builtin) = builtin::lookup(name) {
        Some(Kind::BuiltinFunction(builtin.arity))
    } else if builtin::is_literal(name) {
        Some(Kind::BuiltinLiteral)
    } else {
        None
    }
}

fn found(part: Option<&Syntax>) -> String {
    match part {
        Some(syntax) => format!("found a {}", syntax.describe()),
        None => "nothing's there".to_string(),
    }
}

fn extra_parts(n: usize) -> String {
    plural(n, "extra part")
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::number(n.clone()),
        Literal::String(s) => Value::string(s.as_str()),
        Literal::Boolean(b) => Value::boolean(*b),
    }
}

pub fn resolve(forms: &[Syntax]) -> Result<Program, Error> {
    Resolver::new().resolve_program(forms)
}

pub struct Resolver {
    symbols: SymbolTable,
    in_function_body: bool,
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver {
            symbols: SymbolTable::new(),
            in_function_body: false,
        }
    }

    pub fn resolve_program(&mut self, forms: &[Syntax]) -> Result<Program, Error> {
        let mut program = Program::default();
        let mut deferred = Vec::new();
        for form in forms {
            match form.head_keyword() {
                Some(Keyword::CheckExpect) => deferred.push(self.check_expect(form)?),
                _ => program.forms.push(self.resolve_form(form)?),
            }
        }
        for (actual, expected) in deferred {
            program.tests.push(TestCase {
                actual: self.resolve_expr(actual)?,
                expected: self.resolve_expr(expected)?,
            });
        }
        Ok(program)
    }

    fn resolve_form(&mut self, form: &Syntax) -> Result<Expr, Error> {
        let items = form.as_group().unwrap_or(&[]);
        match form.head_keyword() {
            Some(Keyword::Define) => self.define(&items[1..]),
            Some(Keyword::DefineStruct) => self.define_struct(&items[1..]),
            _ => self.resolve_expr(form),
        }
    }

    fn check_expect<'a>(&self, form: &'a Syntax) -> Result<(&'a Syntax, &'a Syntax), Error> {
        let parts = &form.as_group().unwrap_or(&[])[1..];
        match parts {
            [actual, expected] => Ok((actual, expected)),
            _ => Err(Error::resolve(arity_message("check-expect",
                Arity::Exact(2), parts.len()))),
        }
    }

    pub fn resolve_expr(&mut self, syntax: &Syntax) -> Result<Expr, Error> {
        match syntax {
            Syntax::Literal(literal) => Ok(Expr::Literal(literal_value(literal))),
            Syntax::Identifier(name) => self.reference(name),
            Syntax::Group(items) => match syntax.head_keyword() {
                Some(keyword) => self.special_form(keyword, &items[1..]),
                None => self.call(items),
            },
            Syntax::Keyword(keyword) => Err(Error::internal(format!(
                "keyword {} outside the head of a group", keyword))),
        }
    }

    fn special_form(&mut self, keyword: Keyword, parts: &[Syntax]) ->
        Result<Expr, Error> {

        match keyword {
            Keyword::Define => Err(Error::resolve(
                "define: found a definition that is not at the top level")),
            Keyword::DefineStruct => Err(Error::resolve(
                "define-struct: found a definition that is not at the top level")),
            Keyword::CheckExpect => Err(Error::resolve(
                "check-expect: found a test that is not at the top level")),
            Keyword::Lambda => self.lambda(parts),
            Keyword::Quote => self.quote(parts),
            Keyword::If => self.syntax_if(parts),
            Keyword::Cond => self.cond(parts),
            Keyword::And => self.connective(Conditional::And, parts),
            Keyword::Or => self.connective(Conditional::Or, parts),
            Keyword::Else => Err(Error::resolve(
                "else: not allowed here, because this is not a question in a clause")),
        }
    }

    fn reference(&self, name: &str) -> Result<Expr, Error> {
        match self.symbols.lookup(name) {
            None => Err(Error::resolve(format!(
                "{}: this variable is not defined", name))),
            Some(Kind::Function(_)) | Some(Kind::BuiltinFunction(_)) =>
                Err(Error::resolve(format!(
                    "{}: expected a function call, but there is no open \
                    parenthesis before this function", name))),
            Some(Kind::Structure) => Err(Error::resolve(format!(
                "{0}: this is a structure type, did you mean make-{0}?", name))),
            Some(Kind::Variable) | Some(Kind::Parameter) | Some(Kind::BuiltinLiteral) =>
                Ok(Expr::Identifier(name.to_string())),
        }
    }

    fn call(&mut self, items: &[Syntax]) -> Result<Expr, Error> {
        let not_a_function = |what: String| Error::resolve(format!(
            "function call: expected a function after the open parenthesis, \
            but {}", what));

        let (head, arguments) = match items.split_first() {
            Some(split) => split,
            None => return Err(not_a_function(found(None))),
        };
        let name = match head {
            Syntax::Identifier(name) => name,
            other => return Err(not_a_function(found(Some(other)))),
        };
        let arity = match self.symbols.lookup(name) {
            None => return Err(Error::resolve(format!(
                "{}: this variable is not defined", name))),
            Some(Kind::Function(arity)) => Some(arity),
            Some(Kind::BuiltinFunction(arity @ Arity::Exact(_))) => Some(arity),
            Some(Kind::BuiltinFunction(Arity::AtLeast(_))) => None,
            Some(Kind::Structure) =>
                return Err(not_a_function("found a structure type".to_string())),
            Some(Kind::Variable) | Some(Kind::Parameter) | Some(Kind::BuiltinLiteral) =>
                return Err(not_a_function(found(Some(head)))),
        };
        if let Some(arity) = arity {
            if !arity.accepts(arguments.len()) {
                return Err(Error::resolve(arity_message(name, arity,
                    arguments.len())));
            }
        }
        let arguments = arguments.iter()
            .map(|argument| self.resolve_expr(argument))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expr::Call {
            callee: Box::new(Expr::Identifier(name.to_string())),
            arguments,
        })
    }

    fn check_fresh(&self, name: &str) -> Result<(), Error> {
        match self.symbols.lookup(name) {
            Some(kind) if kind.is_builtin() => Err(Error::resolve(format!(
                "{}: this name was defined in the language or a required \
                library and cannot be re-defined", name))),
            Some(_) => Err(Error::resolve(format!(
                "{}: this name was defined previously and cannot be re-defined",
                name))),
            None => Ok(()),
        }
    }

    fn define(&mut self, parts: &[Syntax]) -> Result<Expr, Error> {
        let target = match parts.first() {
            Some(Syntax::Identifier(name)) => Either::Left(name),
            Some(Syntax::Group(header)) => Either::Right(header),
            other => return Err(Error::resolve(format!(
                "define: expected a variable name, or a function name and its \
                variables (in parentheses), but {}", found(other)))),
        };
        match target {
            Either::Left(name) => self.define_variable(name, &parts[1..]),
            Either::Right(header) => self.define_function(header, &parts[1..]),
        }
    }

    fn define_variable(&mut self, name: &str, rest: &[Syntax]) ->
        Result<Expr, Error> {

        self.check_fresh(name)?;
        let value = match rest {
            [] => return Err(Error::resolve(format!(
                "define: expected an expression after the variable name {}, \
                but nothing's there", name))),
            [value] => value,
            [_, extra @ ..] => return Err(Error::resolve(format!(
                "define: expected only one expression after the variable name \
                {}, but found {}", name, extra_parts(extra.len())))),
        };

        if value.head_keyword() == Some(Keyword::Lambda) {
            let parts = &value.as_group().unwrap_or(&[])[1..];
            let (params, body) = lambda_parts(parts)?;
            self.symbols.define(name, Kind::Function(Arity::Exact(params.len())));
            let lambda = self.function(Some(name), params, body)?;
            return Ok(Expr::DefineVariable {
                name: name.to_string(),
                value: Box::new(lambda),
            });
        }

        let value = self.resolve_expr(value)?;
        self.symbols.define(name, Kind::Variable);
        Ok(Expr::DefineVariable {
            name: name.to_string(),
            value: Box::new(value),
        })
    }

    fn define_function(&mut self, header: &[Syntax], rest: &[Syntax]) ->
        Result<Expr, Error> {

        let name = match header.first() {
            Some(Syntax::Identifier(name)) => name,
            other => return Err(Error::resolve(format!(
                "define: expected the name of the function, but {}",
                found(other)))),
        };
        self.check_fresh(name)?;
        let (params, body) = function_parts(&header[1..], rest)?;
        self.symbols.define(name, Kind::Function(Arity::Exact(params.len())));
        let lambda = self.function(Some(name), params, body)?;
        Ok(Expr::DefineVariable {
            name: name.to_string(),
            value: Box::new(lambda),
        })
    }

    /// Resolves a function body in a fresh scope binding `params`.
    fn function(&mut self, name: Option<&str>, params: Vec<String>, body: &Syntax) ->
        Result<Expr, Error> {

        self.symbols.push_scope();
        for param in &params {
            self.symbols.define(param, Kind::Parameter);
        }
        let was_in_body = mem::replace(&mut self.in_function_body, true);
        let body = self.resolve_expr(body);
        self.in_function_body = was_in_body;
        self.symbols.pop_scope();
        Ok(Expr::Lambda(Rc::new(Lambda {
            name: name.map(str::to_string),
            params,
            body: body?,
        })))
    }

    fn lambda(&mut self, parts: &[Syntax]) -> Result<Expr, Error> {
        if !self.in_function_body {
            return Err(Error::resolve(
                "lambda: found a lambda that is not a function definition"));
        }
        let (params, body) = lambda_parts(parts)?;
        self.function(None, params, body)
    }

    fn define_struct(&mut self, parts: &[Syntax]) -> Result<Expr, Error> {
        let name = match parts.first() {
            Some(Syntax::Identifier(name)) => name,
            other => return Err(Error::resolve(format!(
                "define-struct: expected the structure name after \
                define-struct, but {}", found(other)))),
        };
        let field_syntax = match parts.get(1) {
            Some(Syntax::Group(fields)) => fields,
            other => return Err(Error::resolve(format!(
                "define-struct: expected at least one field name (in \
                parentheses) after the structure name, but {}", found(other)))),
        };
        let mut fields = Vec::new();
        for field in field_syntax {
            match field {
                Syntax::Identifier(field) if fields.contains(field) =>
                    return Err(Error::resolve(format!(
                        "define-struct: found a field name that is used more \
                        than once: {}", field))),
                Syntax::Identifier(field) => fields.push(field.clone()),
                other => return Err(Error::resolve(format!(
                    "define-struct: expected a field name, but {}",
                    found(Some(other))))),
            }
        }
        if parts.len() > 2 {
            return Err(Error::resolve(format!(
                "define-struct: expected nothing after the field names, but \
                found {}", extra_parts(parts.len() - 2))));
        }

        let mut bindings = vec![
            (name.clone(), Kind::Structure),
            (format!("make-{}", name), Kind::Function(Arity::Exact(fields.len()))),
            (format!("{}?", name), Kind::Function(Arity::Exact(1))),
        ];
        for field in &fields {
            bindings.push((format!("{}-{}", name, field),
                Kind::Function(Arity::Exact(1))));
        }
        for (binding, kind) in bindings {
            self.check_fresh(&binding)?;
            self.symbols.define(&binding, kind);
        }
        Ok(Expr::DefineStructure {
            name: name.clone(),
            fields,
        })
    }

    fn quote(&mut self, parts: &[Syntax]) -> Result<Expr, Error> {
        let quoted = match parts {
            [quoted] => quoted,
            _ => return Err(Error::resolve(format!(
                "quote: expected a single part after quote, but found {}",
                plural(parts.len(), "part")))),
        };
        match quoted {
            Syntax::Identifier(name) => Ok(Expr::Quoted(Value::symbol(name.as_str()))),
            Syntax::Group(items) if items.is_empty() => Ok(Expr::Quoted(Value::Empty)),
            other => Err(Error::resolve(format!(
                "quote: expected a name or () after the quote, but {}",
                found(Some(other))))),
        }
    }

    fn syntax_if(&mut self, parts: &[Syntax]) -> Result<Expr, Error> {
        let (test, then_branch, else_branch) = match parts {
            [test, then_branch, else_branch] => (test, then_branch, else_branch),
            [] => return Err(Error::resolve(
                "if: expected a question and two answers, but nothing's there")),
            _ if parts.len() < 3 => return Err(Error::resolve(format!(
                "if: expected a question and two answers, but found only {}",
                plural(parts.len(), "part")))),
            _ => return Err(Error::resolve(format!(
                "if: expected a question and two answers, but found {}",
                plural(parts.len(), "part")))),
        };
        Ok(Expr::If {
            form: Conditional::If,
            test: Box::new(self.resolve_expr(test)?),
            then_branch: Box::new(self.resolve_expr(then_branch)?),
            else_branch: Some(Box::new(self.resolve_expr(else_branch)?)),
        })
    }

    fn cond(&mut self, clauses: &[Syntax]) -> Result<Expr, Error> {
        if clauses.is_empty() {
            return Err(Error::resolve(
                "cond: expected a clause after cond, but nothing's there"));
        }
        let mut resolved = Vec::with_capacity(clauses.len());
        for (index, clause) in clauses.iter().enumerate() {
            let parts = match clause {
                Syntax::Group(parts) => parts,
                other => return Err(Error::resolve(format!(
                    "cond: expected a clause with a question and an answer, \
                    but {}", found(Some(other))))),
            };
            let (question, answer) = match parts.as_slice() {
                [question, answer] => (question, answer),
                [] => return Err(Error::resolve(
                    "cond: expected a clause with a question and an answer, \
                    but found an empty part")),
                [_] => return Err(Error::resolve(
                    "cond: expected a clause with a question and an answer, \
                    but found a clause with only one part")),
                _ => return Err(Error::resolve(format!(
                    "cond: expected a clause with a question and an answer, \
                    but found a clause with {} parts", parts.len()))),
            };
            let question = match question {
                Syntax::Keyword(Keyword::Else) if index + 1 < clauses.len() =>
                    return Err(Error::resolve(
                        "cond: found an else clause that isn't the last clause \
                        in its cond expression")),
                Syntax::Keyword(Keyword::Else) => None,
                question => Some(self.resolve_expr(question)?),
            };
            resolved.push((question, self.resolve_expr(answer)?));
        }

        let mut lowered: Option<Box<Expr>> = None;
        for (question, answer) in resolved.into_iter().rev() {
            lowered = Some(Box::new(match question {
                None => answer,
                Some(test) => Expr::If {
                    form: Conditional::Cond,
                    test: Box::new(test),
                    then_branch: Box::new(answer),
                    else_branch: lowered,
                },
            }));
        }
        lowered.map(|expr| *expr)
            .ok_or_else(|| Error::internal("cond lowered to nothing"))
    }

    /// `and`/`or` become nested `If`s; the last operand is also checked
    /// for being a boolean.
    fn connective(&mut self, form: Conditional, parts: &[Syntax]) ->
        Result<Expr, Error> {

        let arity = Arity::AtLeast(2);
        if !arity.accepts(parts.len()) {
            return Err(Error::resolve(arity_message(&form.to_string(), arity,
                parts.len())));
        }
        let operands = parts.iter()
            .map(|part| self.resolve_expr(part))
            .collect::<Result<Vec<_>, _>>()?;
        let short_circuit = form == Conditional::Or;
        let mut lowered: Option<Expr> = None;
        for operand in operands.into_iter().rev() {
            let rest = lowered.take().unwrap_or_else(|| Expr::boolean(!short_circuit));
            let (then_branch, else_branch) = if short_circuit {
                (Expr::boolean(true), rest)
            } else {
                (rest, Expr::boolean(false))
            };
            lowered = Some(Expr::If {
                form,
                test: Box::new(operand),
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            });
        }
        lowered.ok_or_else(|| Error::internal("connective lowered to nothing"))
    }
}

/// Validates a parameter list and a single body expression.
fn params_and_body<'a>(form: &str, params: &[Syntax], rest: &'a [Syntax]) ->
    Result<(Vec<String>, &'a Syntax), Error> {

    let mut names = Vec::with_capacity(params.len());
    let mut seen = HashSet::new();
    for param in params {
        match param {
            Syntax::Identifier(name) if !seen.insert(name.as_str()) =>
                return Err(Error::resolve(format!(
                    "{}: found a variable that is used more than once: {}",
                    form, name))),
            Syntax::Identifier(name) => names.push(name.clone()),
            other => return Err(Error::resolve(format!(
                "{}: expected a variable, but {}", form, found(Some(other))))),
        }
    }
    match rest {
        [] => Err(Error::resolve(format!(
            "{}: expected an expression for the function body, but nothing's \
            there", form))),
        [body] => Ok((names, body)),
        [_, extra @ ..] => Err(Error::resolve(format!(
            "{}: expected only one expression for the function body, but found \
            {}", form, extra_parts(extra.len())))),
    }
}

fn function_parts<'a>(params: &[Syntax], rest: &'a [Syntax]) ->
    Result<(Vec<String>, &'a Syntax), Error> {

    if params.is_empty() {
        return Err(Error::resolve(
            "define: expected at least one variable after the function name, \
            but found none"));
    }
    params_and_body("define", params, rest)
}

fn lambda_parts(parts: &[Syntax]) -> Result<(Vec<String>, &Syntax), Error> {
    let params = match parts.first() {
        Some(Syntax::Group(params)) => params,
        other => return Err(Error::resolve(format!(
            "lambda: expected at least one variable (in parentheses) after \
            lambda, but {}", found(other)))),
    };
    if params.is_empty() {
        return Err(Error::resolve(
            "lambda: expected at least one variable after lambda, but found none"));
    }
    params_and_body("lambda", params, &parts[1..])
}

#[cfg(test)]
mod test {
    use crate::read::read;
    use crate::expr::Expr;
    use super::resolve;

    fn error(input: &str) -> String {
        let forms = read(input).unwrap();
        resolve(&forms).unwrap_err().to_string()
    }

    fn comparison(input: &str, output: &str) {
        assert_eq!(error(input), output);
    }

    #[test]
    fn test_resolves_function_definition() {
        let program = resolve(&read("(define (f x) (+ x 1)) (f 2)").unwrap()).unwrap();
        assert_eq!(program.forms.len(), 2);
        assert!(program.forms[0].is_definition());
        assert!(program.tests.is_empty());
        match &program.forms[1] {
            Expr::Call { arguments, .. } => assert_eq!(arguments.len(), 1),
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn test_tests_see_later_definitions() {
        let program = resolve(&read("(check-expect (f 1) 2) (define (f x) (+ x 1))")
            .unwrap()).unwrap();
        assert_eq!(program.forms.len(), 1);
        assert_eq!(program.tests.len(), 1);
    }

    #[test]
    fn test_unbound_and_forward_references() {
        comparison("x", "x: this variable is not defined");
        comparison("(define y x) (define x 1)", "x: this variable is not defined");
        comparison("(g 1)", "g: this variable is not defined");
    }

    #[test]
    fn test_function_references() {
        comparison("(define (f x) x) f",
            "f: expected a function call, but there is no open parenthesis before this function");
        comparison("add1",
            "add1: expected a function call, but there is no open parenthesis before this function");
        comparison("(define-struct point (x y)) point",
            "point: this is a structure type, did you mean make-point?");
    }

    #[test]
    fn test_call_heads() {
        comparison("(define x 1) (x 2)",
            "function call: expected a function after the open parenthesis, but found a variable");
        comparison("(1 2)",
            "function call: expected a function after the open parenthesis, but found a number");
        comparison("((f) 2)",
            "function call: expected a function after the open parenthesis, but found a part");
        comparison("()",
            "function call: expected a function after the open parenthesis, but nothing's there");
        comparison("(define (f x) (x 1))",
            "function call: expected a function after the open parenthesis, but found a variable");
    }

    #[test]
    fn test_arity() {
        comparison("(define (f x) x) (f)", "f: expects 1 argument, but found none");
        comparison("(define (f x y) x) (f 1)", "f: expects 2 arguments, but found only 1");
        comparison("(define (f x) x) (f 1 2)", "f: expects only 1 argument, but found 2");
        comparison("(add1 1 2)", "add1: expects only 1 argument, but found 2");
        comparison("(define-struct p (a)) (make-p)",
            "make-p: expects 1 argument, but found none");
    }

    #[test]
    fn test_redefinition() {
        comparison("(define + 1)",
            "+: this name was defined in the language or a required library and cannot be re-defined");
        comparison("(define x 1) (define x 2)",
            "x: this name was defined previously and cannot be re-defined");
        comparison("(define (point-x a) a) (define-struct point (x))",
            "point-x: this name was defined previously and cannot be re-defined");
    }

    #[test]
    fn test_define_shapes() {
        comparison("(define (f x) (define y 1))",
            "define: found a definition that is not at the top level");
        comparison("(define)",
            "define: expected a variable name, or a function name and its variables (in parentheses), but nothing's there");
        comparison("(define 1 2)",
            "define: expected a variable name, or a function name and its variables (in parentheses), but found a number");
        comparison("(define x)",
            "define: expected an expression after the variable name x, but nothing's there");
        comparison("(define x 1 2 3)",
            "define: expected only one expression after the variable name x, but found 2 extra parts");
        comparison("(define (f) 1)",
            "define: expected at least one variable after the function name, but found none");
        comparison("(define (f 1) 1)", "define: expected a variable, but found a number");
        comparison("(define (f x x) 1)",
            "define: found a variable that is used more than once: x");
        comparison("(define (f x))",
            "define: expected an expression for the function body, but nothing's there");
        comparison("(define (f x) 1 2)",
            "define: expected only one expression for the function body, but found 1 extra part");
    }

    #[test]
    fn test_lambda() {
        comparison("(lambda (x) x)", "lambda: found a lambda that is not a function definition");
        comparison("(define f (lambda () 1))",
            "lambda: expected at least one variable after lambda, but found none");
        assert!(resolve(&read("(define f (lambda (x) (f x)))").unwrap()).is_ok());
        assert!(resolve(&read("(define (f x) (lambda (y) (+ x y)))").unwrap()).is_ok());
    }

    #[test]
    fn test_define_struct_shapes() {
        comparison("(define-struct)",
            "define-struct: expected the structure name after define-struct, but nothing's there");
        comparison("(define-struct 1 (x))",
            "define-struct: expected the structure name after define-struct, but found a number");
        comparison("(define-struct p x)",
            "define-struct: expected at least one field name (in parentheses) after the structure name, but found a variable");
        comparison("(define-struct p (1))",
            "define-struct: expected a field name, but found a number");
        comparison("(define-struct p (x x))",
            "define-struct: found a field name that is used more than once: x");
        comparison("(define-struct p (x) y)",
            "define-struct: expected nothing after the field names, but found 1 extra part");
    }

    #[test]
    fn test_quote() {
        comparison("(quote 1)", "quote: expected a name or () after the quote, but found a number");
        comparison("'(1 2)", "quote: expected a name or () after the quote, but found a part");
        comparison("(quote a b)", "quote: expected a single part after quote, but found 2 parts");
        assert!(resolve(&read("'a '()").unwrap()).is_ok());
    }

    #[test]
    fn test_check_expect() {
        comparison("(check-expect 1)", "check-expect: expects 2 arguments, but found only 1");
        comparison("(check-expect 1 2 3)", "check-expect: expects only 2 arguments, but found 3");
        comparison("(define (f x) (check-expect x 1))",
            "check-expect: found a test that is not at the top level");
    }

    #[test]
    fn test_conditionals() {
        comparison("(if 1 2)", "if: expected a question and two answers, but found only 2 parts");
        comparison("(if 1 2 3 4)", "if: expected a question and two answers, but found 4 parts");
        comparison("(cond)", "cond: expected a clause after cond, but nothing's there");
        comparison("(cond 1)",
            "cond: expected a clause with a question and an answer, but found a number");
        comparison("(cond [else 1] [#true 2])",
            "cond: found an else clause that isn't the last clause in its cond expression");
        comparison("(else 1)", "else: not allowed here, because this is not a question in a clause");
        comparison("(and #true)", "and: expects at least 2 arguments, but found only 1");
        comparison("(or)", "or: expects at least 2 arguments, but found none");
    }
}
