// ABOUTME: Tag dispatch, macro expansion, and application — the recursive evaluator

use crate::env;
use crate::error::LispError;
use crate::interp::Interpreter;
use crate::value::Value;

/// `eval(env, value) -> value`, dispatching on tag per §4.5. Int, True,
/// Nil, Primitive, Function, and Macro are self-evaluating; a Symbol is
/// looked up; a Cell is a call or a macro use.
pub fn eval(interp: &mut Interpreter, env: Value, value: Value) -> Result<Value, LispError> {
    match value {
        Value::Nil | Value::True | Value::Dot | Value::CloseParen => Ok(value),
        Value::Ref(_) => {
            if interp.heap.is_symbol(value) {
                eval_symbol(interp, env, value)
            } else if interp.heap.is_cell(value) {
                eval_cell(interp, env, value)
            } else {
                // Int, Primitive, Function, Macro, Env
                Ok(value)
            }
        }
    }
}

fn eval_symbol(interp: &mut Interpreter, env: Value, symbol: Value) -> Result<Value, LispError> {
    match env::find(&interp.heap, env, symbol) {
        Some(pair) => {
            let (_, bound) = interp.heap.cell(pair).expect("find returns a binding cell");
            Ok(bound)
        }
        None => {
            let name = interp.heap.symbol_name(symbol).unwrap_or_else(|| "?".into());
            Err(LispError::UndefinedSymbol(name.to_string()))
        }
    }
}

fn eval_cell(interp: &mut Interpreter, env: Value, form: Value) -> Result<Value, LispError> {
    let _guard = interp.heap.root_many(&[env, form]);
    let (head, tail) = interp.heap.cell(form).expect("form is a cell");

    if interp.heap.is_symbol(head) {
        if let Some(pair) = env::find(&interp.heap, env, head) {
            let (_, bound) = interp.heap.cell(pair).expect("find returns a binding cell");
            if interp.heap.as_macro(bound).is_some() {
                let expanded = apply_macro(interp, bound, tail)?;
                let _guard2 = interp.heap.root(expanded);
                return eval(interp, env, expanded);
            }
        }
    }

    let head_val = eval(interp, env, head)?;
    let _guard2 = interp.heap.root_many(&[head_val, tail, env]);

    if let Some((_name, f)) = interp.heap.as_primitive(head_val) {
        return f(interp, env, tail);
    }

    if let Some((params, body, captured_env)) = interp.heap.as_function(head_val) {
        let args = eval_list(interp, env, tail)?;
        let _guard3 = interp.heap.root_many(&[args, captured_env, params, body]);
        let call_env = env::push_env(&interp.heap, captured_env, params, args)?;
        let _guard4 = interp.heap.root(call_env);
        return progn(interp, call_env, body);
    }

    Err(LispError::NotCallable)
}

/// Evaluate each element of `list` left-to-right into a new list, per the
/// function-application step of §4.5. `list` must be a proper list.
pub fn eval_list(interp: &mut Interpreter, env: Value, list: Value) -> Result<Value, LispError> {
    if list.is_nil() {
        return Ok(Value::Nil);
    }
    let (head, tail) = interp.heap.cell(list).ok_or(LispError::ArgumentsNotList)?;
    let _guard = interp.heap.root_many(&[env, tail]);
    let head_val = eval(interp, env, head)?;
    let _guard2 = interp.heap.root_many(&[head_val, env]);
    let rest = eval_list(interp, env, tail)?;
    let _guard3 = interp.heap.root_many(&[head_val, rest]);
    interp.heap.cons(head_val, rest)
}

/// Evaluate each element of `body` in order, returning the last result, or
/// `Nil` for an empty sequence — the `progn` rule, shared by function
/// bodies, `if`'s else-branch, and `while`'s loop body.
pub fn progn(interp: &mut Interpreter, env: Value, mut body: Value) -> Result<Value, LispError> {
    let mut result = Value::Nil;
    loop {
        if body.is_nil() {
            return Ok(result);
        }
        let (head, tail) = interp.heap.cell(body).ok_or(LispError::ArgumentsNotList)?;
        let _guard = interp.heap.root_many(&[env, tail]);
        result = eval(interp, env, head)?;
        body = tail;
    }
}

/// Apply a macro to its unevaluated arguments, producing the form it
/// expands to. The caller is responsible for evaluating that form in its
/// own environment — this function never evaluates the expansion.
fn apply_macro(interp: &mut Interpreter, macro_val: Value, unevaluated_args: Value) -> Result<Value, LispError> {
    let (params, body, captured_env) = interp.heap.as_macro(macro_val).expect("caller checked as_macro");
    let _guard = interp.heap.root_many(&[params, body, captured_env, unevaluated_args]);
    let call_env = env::push_env(&interp.heap, captured_env, params, unevaluated_args)?;
    let _guard2 = interp.heap.root(call_env);
    progn(interp, call_env, body)
}

/// One-step macro expansion without evaluating the result, for the
/// `macroexpand` primitive. A form whose head is not bound to a macro is
/// returned unchanged.
pub fn expand_once(interp: &mut Interpreter, env: Value, form: Value) -> Result<Value, LispError> {
    if !interp.heap.is_cell(form) {
        return Ok(form);
    }
    let (head, tail) = interp.heap.cell(form).expect("checked is_cell");
    if !interp.heap.is_symbol(head) {
        return Ok(form);
    }
    match env::find(&interp.heap, env, head) {
        Some(pair) => {
            let (_, bound) = interp.heap.cell(pair).expect("find returns a binding cell");
            if interp.heap.as_macro(bound).is_some() {
                apply_macro(interp, bound, tail)
            } else {
                Ok(form)
            }
        }
        None => Ok(form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{read_expression, BufferSource};

    fn eval_str(interp: &mut Interpreter, env: Value, text: &str) -> Value {
        let mut src = BufferSource::new(text);
        let form = read_expression(&interp.heap, &interp.symbols, &mut src).unwrap().unwrap();
        eval(interp, env, form).unwrap()
    }

    #[test]
    fn integers_and_booleans_self_evaluate() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        assert_eq!(interp.heap.as_int(eval_str(&mut interp, env, "5")), Some(5));
        assert!(eval_str(&mut interp, env, "t").is_truthy());
    }

    #[test]
    fn undefined_symbol_is_an_error() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        let mut src = BufferSource::new("nonexistent");
        let form = read_expression(&interp.heap, &interp.symbols, &mut src).unwrap().unwrap();
        assert!(matches!(eval(&mut interp, env, form), Err(LispError::UndefinedSymbol(_))));
    }

    #[test]
    fn add_primitive_sums_arguments() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        assert_eq!(interp.heap.as_int(eval_str(&mut interp, env, "(add 1 2 3)")), Some(6));
    }

    #[test]
    fn defun_then_call_closure() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        eval_str(&mut interp, env, "(defun f (a b) (add a b))");
        assert_eq!(interp.heap.as_int(eval_str(&mut interp, env, "(f 3 4)")), Some(7));
    }

    /// §8: "eval is idempotent on self-evaluating tags" — Int, True, Nil,
    /// Function, Macro, Primitive all evaluate to themselves.
    #[test]
    fn eval_is_idempotent_on_self_evaluating_tags() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;

        let n = interp.heap.make_int(5).unwrap();
        assert_eq!(eval(&mut interp, env, n).unwrap(), n);
        assert_eq!(eval(&mut interp, env, Value::True).unwrap(), Value::True);
        assert_eq!(eval(&mut interp, env, Value::Nil).unwrap(), Value::Nil);

        let func = eval_str(&mut interp, env, "(lambda (x) x)");
        assert_eq!(eval(&mut interp, env, func).unwrap(), func);

        eval_str(&mut interp, env, "(defmacro m (x) x)");
        let mac = eval_str(&mut interp, env, "m");
        assert_eq!(eval(&mut interp, env, mac).unwrap(), mac);

        let add = eval_str(&mut interp, env, "add");
        assert_eq!(eval(&mut interp, env, add).unwrap(), add);
    }

    #[test]
    fn macro_expands_before_evaluation() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        eval_str(
            &mut interp,
            env,
            "(defmacro unless (c . body) (cons 'if (cons c (cons () body))))",
        );
        let result = eval_str(&mut interp, env, "(unless () 1 2)");
        assert_eq!(interp.heap.as_int(result), Some(2));
    }
}
