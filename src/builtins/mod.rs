// ABOUTME: Registers the fixed primitive table (§4.6) into the root environment

use crate::env;
use crate::error::LispError;
use crate::heap::Heap;
use crate::interp::Interpreter;
use crate::value::{PrimitiveFn, Value};

mod arithmetic;
mod io;
mod lists;
mod special_forms;

/// Install every primitive into `interp.root_env`. Called once, from
/// `Interpreter::with_heap`.
pub fn register_all(interp: &mut Interpreter) -> Result<(), LispError> {
    lists::register(interp)?;
    arithmetic::register(interp)?;
    special_forms::register(interp)?;
    io::register(interp)?;
    Ok(())
}

fn bind(interp: &mut Interpreter, name: &'static str, f: PrimitiveFn) -> Result<(), LispError> {
    let symbol = interp.intern(name)?;
    let prim = interp.heap.make_primitive(name, f)?;
    let root_env = interp.root_env;
    env::add_variable(&interp.heap, root_env, symbol, prim)
}

/// Collect a proper list into a `Vec` without evaluating its elements.
/// `quote`, `lambda`, `defun`, `defmacro`, `setq`'s first argument, and
/// similar unevaluated-argument primitives use this.
fn list_to_vec(heap: &Heap, mut list: Value) -> Result<Vec<Value>, LispError> {
    let mut out = Vec::new();
    while !list.is_nil() {
        let (head, tail) = heap.cell(list).ok_or(LispError::ArgumentsNotList)?;
        out.push(head);
        list = tail;
    }
    Ok(out)
}

/// Build a proper list from a slice, right to left.
fn vec_to_list(heap: &Heap, items: &[Value]) -> Result<Value, LispError> {
    let mut list = Value::Nil;
    for v in items.iter().rev() {
        let _guard = heap.root_many(&[*v, list]);
        list = heap.cons(*v, list)?;
    }
    Ok(list)
}

/// Evaluate every element of `args` left-to-right and collect the results
/// into a `Vec`, for primitives whose table entry says "all" under
/// Evaluation. Goes through `eval::eval_list` so the evaluated results stay
/// rooted (as one already-built list) for the whole walk, rather than
/// accumulating loose `Value`s a collection could invalidate mid-primitive.
fn eval_args(interp: &mut Interpreter, env: Value, args: Value) -> Result<Vec<Value>, LispError> {
    let evaluated = crate::eval::eval_list(interp, env, args)?;
    list_to_vec(&interp.heap, evaluated)
}
