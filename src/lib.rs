//! An interpreter for the Beginning Student Language.
//!
//! Source text goes through four stages: scanning, reading into untyped
//! syntax, resolution into checked expressions, and evaluation. The first
//! error from any stage ends the run and is reported as one printed line.

extern crate either;
extern crate gc;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate maplit;

pub mod builtin;
pub mod config;
pub mod equality;
pub mod error;
pub mod expr;
pub mod number;
pub mod port;
pub mod read;
pub mod resolve;
pub mod runtime;
pub mod value;

use std::io;
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::{debug, error, trace, warn};

pub use crate::config::Config;
pub use crate::error::{Error, RuntimeError};
pub use crate::port::Port;
use crate::runtime::Interpreter;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    pub printed_lines: Vec<String>,
}

pub fn run(source: &str) -> Output {
    run_with_config(source, &Config::default())
}

/// Runs the pipeline on a worker thread with `config.stack_size` bytes of
/// stack, collecting every printed line.
pub fn run_with_config(source: &str, config: &Config) -> Output {
    let owned = source.to_string();
    let worker_config = *config;
    let worker = run_on_worker(config.stack_size, move |port| {
        let _ = run_with(&owned, &worker_config, port);
    });

    let printed_lines = match worker {
        Ok(lines) => lines,
        Err(err) => {
            warn!(%err, "could not spawn evaluator thread, running in place");
            let mut lines = Vec::new();
            let _ = run_with(source, config, &mut lines);
            lines
        },
    };
    Output { printed_lines }
}

// Lines displayed before a panic are kept, followed by an internal error.
fn run_on_worker<F>(stack_size: usize, job: F) -> io::Result<Vec<String>>
    where F: FnOnce(&mut dyn Port) + Send + 'static {

    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut sink = lines.clone();
    let handle = thread::Builder::new()
        .name("bsl-eval".to_string())
        .stack_size(stack_size)
        .spawn(move || job(&mut sink))?;
    let panicked = handle.join().is_err();

    let mut printed = mem::take(&mut *lines.lock()
        .unwrap_or_else(PoisonError::into_inner));
    if panicked {
        error!("evaluator thread panicked");
        printed.push(Error::internal("the evaluator panicked").to_string());
    }
    Ok(printed)
}

/// Runs the pipeline on the calling thread. The error that ended the run,
/// if any, has already been displayed when it is returned.
pub fn run_with(source: &str, config: &Config, port: &mut dyn Port) ->
    Result<(), Error> {

    let result = execute(source, config, port);
    if let Err(err) = &result {
        if err.is_fatal() {
            error!(%err, "run aborted");
        }
        port.display(&err.to_string());
    }
    result
}

fn execute(source: &str, config: &Config, port: &mut dyn Port) ->
    Result<(), Error> {

    let tokens = read::scan(source)?;
    debug!(tokens = tokens.len(), "scanned");
    let forms = read::Reader::new(tokens).read_program()?;
    debug!(forms = forms.len(), "read");
    let program = resolve::resolve(&forms)?;
    debug!(forms = program.forms.len(), tests = program.tests.len(), "resolved");

    let mut interpreter = Interpreter::new(config);
    for form in &program.forms {
        trace!(?form, "evaluating");
        if let Some(value) = interpreter.execute(form)? {
            port.display(&value.to_string());
        }
    }

    if !program.tests.is_empty() {
        for test in &program.tests {
            interpreter.run_test(test)?;
        }
        port.display(&test_summary(program.tests.len()));
    }
    Ok(())
}

fn test_summary(count: usize) -> String {
    match count {
        1 => "The test passed!".to_string(),
        2 => "Both tests passed!".to_string(),
        n => format!("All {} tests passed!", n),
    }
}

#[cfg(test)]
mod test {
    use super::{run, run_on_worker, run_with, Config};

    fn comparison(input: &str, output: &[&str]) {
        assert_eq!(run(input).printed_lines, output);
    }

    #[test]
    fn test_sums() {
        comparison("(+ 1 2)", &["3"]);
    }

    #[test]
    fn test_definitions_print_nothing() {
        comparison("(define x 1) (define (f y) y) x", &["1"]);
    }

    #[test]
    fn test_values_before_an_error_stay_printed() {
        comparison("1 (/ 1 0) 2", &["1", "/: division by zero"]);
    }

    #[test]
    fn test_scan_error_stops_everything() {
        comparison("1 2 #q", &["read-syntax: bad syntax `#q`"]);
    }

    #[test]
    fn test_run_in_place() {
        let mut lines = Vec::new();
        let result = run_with("(* 6 7)", &Config::default(), &mut lines);
        assert!(result.is_ok());
        assert_eq!(lines, vec!["42".to_string()]);
    }

    #[test]
    fn test_output_survives_an_evaluator_panic() {
        let lines = run_on_worker(1 << 20, |port| {
            port.display("1");
            panic!("evaluator bug");
        }).unwrap();
        assert_eq!(lines, vec!["1".to_string(),
            "internal error: the evaluator panicked".to_string()]);
    }

    #[test]
    fn test_deep_bounded_recursion_in_place() {
        let mut lines = Vec::new();
        let result = run_with("(define (count n) (if (= n 0) 0 (+ 1 (count (- n 1))))) \
            (count 30000)", &Config::default(), &mut lines);
        assert!(result.is_ok());
        assert_eq!(lines, vec!["30000".to_string()]);
    }

    #[test]
    fn test_recursion_limit() {
        let config = Config::default().with_max_depth(50);
        let mut lines = Vec::new();
        let result = run_with("(define (f n) (if (= n 0) 0 (f (- n 1)))) (f 100)",
            &config, &mut lines);
        assert!(result.is_err());
        assert_eq!(lines, vec!["out of memory: the program recursed too deeply"
            .to_string()]);
    }

    #[test]
    fn test_summaries() {
        comparison("(check-expect 1 1) (check-expect 2 2)", &["Both tests passed!"]);
        comparison("(check-expect 1 1) (check-expect 2 2) (check-expect 3 3)",
            &["All 3 tests passed!"]);
    }
}
