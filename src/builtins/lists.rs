// ABOUTME: quote, cons, car, cdr, setcar — the cell constructors and accessors

use super::{bind, eval_args, list_to_vec};
use crate::error::LispError;
use crate::interp::Interpreter;
use crate::value::Value;

pub fn register(interp: &mut Interpreter) -> Result<(), LispError> {
    bind(interp, "quote", quote)?;
    bind(interp, "cons", cons)?;
    bind(interp, "car", car)?;
    bind(interp, "cdr", cdr)?;
    bind(interp, "setcar", setcar)?;
    Ok(())
}

fn quote(interp: &mut Interpreter, _env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() != 1 {
        return Err(LispError::arity("quote", "1", items.len()));
    }
    Ok(items[0])
}

fn cons(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("cons", "2", items.len()));
    }
    interp.heap.cons(items[0], items[1])
}

fn car(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 1 {
        return Err(LispError::arity("car", "1", items.len()));
    }
    let (head, _) = interp.heap.cell(items[0]).ok_or_else(|| LispError::type_mismatch("car", "cell", 1))?;
    Ok(head)
}

fn cdr(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 1 {
        return Err(LispError::arity("cdr", "1", items.len()));
    }
    let (_, tail) = interp.heap.cell(items[0]).ok_or_else(|| LispError::type_mismatch("cdr", "cell", 1))?;
    Ok(tail)
}

fn setcar(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("setcar", "2", items.len()));
    }
    if !interp.heap.is_cell(items[0]) {
        return Err(LispError::type_mismatch("setcar", "cell", 1));
    }
    interp.heap.set_head(items[0], items[1]);
    Ok(items[0])
}
