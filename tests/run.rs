use pretty_assertions::assert_eq;

use bsl::run;

fn comparison(input: &str, output: &[&str]) {
    let expected: Vec<String> = output.iter().map(|line| line.to_string()).collect();
    assert_eq!(run(input).printed_lines, expected);
}

#[test]
fn test_addition() {
    comparison("(+ 1 2)", &["3"]);
}

#[test]
fn test_function_call() {
    comparison("(define (f x) (+ x 1)) (f 2)", &["3"]);
}

#[test]
fn test_division_by_zero() {
    comparison("(/ 4 0)", &["/: division by zero"]);
    comparison("3/0", &["read-syntax: division by zero in `3/0`"]);
}

#[test]
fn test_structure_accessor() {
    comparison("(define-struct point (x y)) (point-x (make-point 3 4))", &["3"]);
}

#[test]
fn test_structure_predicate() {
    comparison("(define-struct p (x)) (define-struct q (x)) \
        (p? (make-p 1)) (p? 1) (p? (make-q 1)) (q? (make-q (make-p 2)))",
        &["#true", "#false", "#false", "#true"]);
    comparison("(define-struct p (x)) (p? 1 2)",
        &["p?: expects only 1 argument, but found 2"]);
}

#[test]
fn test_single_check_expect() {
    comparison("(check-expect (+ 1 1) 2)", &["The test passed!"]);
}

#[test]
fn test_exact_fraction_prints_as_decimal() {
    comparison("1/2", &["0.5"]);
}

#[test]
fn test_printed_values() {
    comparison("#true #f \"hi\" 'apple '() (list 1 2) 2.0 (sqrt -4)",
        &["#true", "#false", "\"hi\"", "'apple", "'()", "(cons 1 (cons 2 '()))",
          "#i2.0", "0+2i"]);
    comparison("(define-struct posn (x y)) (make-posn 1 (make-posn 2 3)) make-posn",
        &["make-posn: expected a function call, but there is no open parenthesis \
           before this function"]);
    comparison("(define-struct posn (x y)) (make-posn 1 (make-posn 2 3))",
        &["(make-posn 1 (make-posn 2 3))"]);
}

#[test]
fn test_numeric_tower() {
    comparison("(+ 1/3 1/6) (* 2 0.5) (+ 1 #i1/2) (* 1+2i 3-1i) (exact->inexact 1/4)",
        &["0.5", "#i1.0", "#i1.5", "5+5i", "#i0.25"]);
    comparison("(expt 2 100)", &["1267650600228229401496703205376"]);
    comparison("(/ 1 0.0)", &["#i+inf.0"]);
    comparison("(/ 1 #i0) (/ -1 #i0)", &["#i+inf.0", "#i-inf.0"]);
    let huge = format!("1{}/3", "0".repeat(400));
    comparison("(/ (expt 10 400) 3)", &[huge.as_str()]);
    comparison("1e5000 -1e5000", &["#i+inf.0", "#i-inf.0"]);
    comparison("#e1e5000", &["read-syntax: no exact representation for `#e1e5000`"]);
}

#[test]
fn test_recursion() {
    comparison("(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 20)",
        &["2432902008176640000"]);
    comparison("(define (count n) (cond [(= n 0) 'done] [else (count (- n 1))])) \
        (count 5000)", &["'done"]);
}

#[test]
fn test_deep_bounded_recursion() {
    comparison("(define (sum n) (if (= n 0) 0 (+ n (sum (- n 1))))) (sum 50000)",
        &["1250025000"]);
}

#[test]
fn test_runaway_recursion() {
    comparison("(define (f n) (+ 1 (f n))) (f 1)",
        &["out of memory: the program recursed too deeply"]);
}

#[test]
fn test_closures_capture_their_environment() {
    comparison("(define (adder n) (lambda (x) (+ x n))) \
        (define add5 (adder 5)) add5",
        &["#<procedure:lambda>"]);
    comparison("(define sq (lambda (x) (* x x))) (sq 7)", &["49"]);
}

#[test]
fn test_conditionals() {
    comparison("(if (> 2 1) 'yes 'no)", &["'yes"]);
    comparison("(cond [(< 1 0) 1] [else 2])", &["2"]);
    comparison("(cond [(< 1 0) 1])", &["cond: all question results were false"]);
    comparison("(if 1 2 3)", &["if: question result is not true or false: 1"]);
    comparison("(and #true 5)", &["and: question result is not true or false: 5"]);
    comparison("(or #false #true) (and #true #false)", &["#true", "#false"]);
}

#[test]
fn test_runtime_errors_stop_the_run() {
    comparison("1 (first '()) 2", &["1", "first: expects a non-empty list, given '()"]);
    comparison("(define-struct a (x)) (define-struct b (x)) (a-x (make-b 1))",
        &["a-x: expects a a, given (make-b 1)"]);
    comparison("(+ 1 \"2\")", &["+: expects a number, given \"2\""]);
    comparison("(+ 1)", &["+: expects at least 2 arguments, but found only 1"]);
}

#[test]
fn test_check_expect_reports() {
    comparison("(check-expect 1 1) (check-expect (+ 1 1) 2)", &["Both tests passed!"]);
    comparison("(check-expect (f 1) 2) (define (f x) (+ x 1)) (f 0)",
        &["1", "The test passed!"]);
    comparison("(check-expect (+ 1 1) 3)",
        &["Actual value 2 differs from 3, the expected value."]);
    comparison("(define-struct p (x)) (check-expect (make-p 1) (make-p 1.0))",
        &["The test passed!"]);
}

#[test]
fn test_resolution_errors_prevent_evaluation() {
    comparison("1 x", &["x: this variable is not defined"]);
    comparison("(define (f) 1)",
        &["define: expected at least one variable after the function name, but found none"]);
    comparison("(define (f x) x) (f)", &["f: expects 1 argument, but found none"]);
    comparison("(define (f) 1)(f 1)",
        &["define: expected at least one variable after the function name, but found none"]);
    comparison("(define sqrt 1)",
        &["sqrt: this name was defined in the language or a required library and cannot be re-defined"]);
    comparison("(define a 1) (define a 2)",
        &["a: this name was defined previously and cannot be re-defined"]);
}

#[test]
fn test_read_errors() {
    comparison("(+ 1 2", &["read-syntax: expected a `)` to close `(`"]);
    comparison("(+ 1 2]", &["read-syntax: expected `)` to close preceding `(`, found instead `]`"]);
    comparison(")", &["read-syntax: unexpected `)`"]);
    comparison("(f define)",
        &["define: expected an open parenthesis before define, but found none"]);
    comparison("\"abc", &["read-syntax: expected a closing `\"`"]);
}

#[test]
fn test_quoted_keywords() {
    comparison("(quote define) 'define (quote else)", &["'define", "'define", "'else"]);
}

#[test]
fn test_comments_and_brackets() {
    comparison("; a comment\n#| block #| nested |# |# [+ {* 2 3} 1]", &["7"]);
}
