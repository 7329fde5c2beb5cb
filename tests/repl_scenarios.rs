// ABOUTME: End-to-end REPL scenarios — each a sequence of top-level forms and their printed output

use minilisp::eval::eval;
use minilisp::interp::Interpreter;
use minilisp::printer::format_value;
use minilisp::reader::{read_expression, BufferSource};

/// Read and evaluate every top-level form in `program`, returning the
/// printed form of each result in order — exactly what a REPL session
/// would print, one line per form.
fn run(program: &str) -> Vec<String> {
    let mut interp = Interpreter::new();
    let env = interp.root_env;
    let mut source = BufferSource::new(program);
    let mut output = Vec::new();
    loop {
        match read_expression(&interp.heap, &interp.symbols, &mut source).unwrap() {
            None => break,
            Some(form) => {
                let result = eval(&mut interp, env, form).unwrap();
                output.push(format_value(&interp.heap, result));
            }
        }
    }
    output
}

#[test]
fn add_sums_several_integers() {
    assert_eq!(run("(add 1 2 3)"), vec!["6"]);
}

#[test]
fn define_then_setq_then_lookup() {
    assert_eq!(run("(define x 10) (setq x (add x 5)) x"), vec!["10", "15", "15"]);
}

#[test]
fn defun_then_call() {
    assert_eq!(run("(defun f (a b) (add a b)) (f 3 4)"), vec!["<function>", "7"]);
}

#[test]
fn defmacro_unless_expands_and_evaluates() {
    assert_eq!(
        run("(defmacro unless (c . body) (cons 'if (cons c (cons () body)))) (unless () 1 2)"),
        vec!["<macro>", "2"]
    );
}

#[test]
fn setcar_mutates_a_shared_cell_in_place() {
    assert_eq!(
        run("(define c (cons 1 2)) (setcar c 9) c"),
        vec!["(1 . 2)", "(9 . 2)", "(9 . 2)"]
    );
}

#[test]
fn while_loop_counts_to_three() {
    assert_eq!(
        run("(define i 0) (while (lt i 3) (setq i (add i 1))) i"),
        vec!["0", "()", "3"]
    );
}
