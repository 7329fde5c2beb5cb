// ABOUTME: add, sub, lt, eq, cmp — integer arithmetic and comparison

use super::{bind, eval_args};
use crate::error::LispError;
use crate::interp::Interpreter;
use crate::value::Value;

pub fn register(interp: &mut Interpreter) -> Result<(), LispError> {
    bind(interp, "add", add)?;
    bind(interp, "sub", sub)?;
    bind(interp, "lt", lt)?;
    bind(interp, "eq", eq)?;
    bind(interp, "cmp", cmp)?;
    Ok(())
}

fn as_ints(interp: &Interpreter, name: &'static str, values: &[Value]) -> Result<Vec<i32>, LispError> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| interp.heap.as_int(*v).ok_or_else(|| LispError::type_mismatch(name, "integer", i + 1)))
        .collect()
}

fn add(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    let nums = as_ints(interp, "add", &items)?;
    let sum = nums.iter().fold(0i32, |acc, n| acc.saturating_add(*n));
    interp.heap.make_int(sum)
}

fn sub(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.is_empty() {
        return Err(LispError::arity("sub", "at least 1", 0));
    }
    let nums = as_ints(interp, "sub", &items)?;
    let result = if nums.len() == 1 {
        -nums[0]
    } else {
        nums[1..].iter().fold(nums[0], |acc, n| acc.saturating_sub(*n))
    };
    interp.heap.make_int(result)
}

fn lt(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("lt", "2", items.len()));
    }
    let nums = as_ints(interp, "lt", &items)?;
    Ok(if nums[0] < nums[1] { Value::True } else { Value::Nil })
}

fn eq(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("eq", "2", items.len()));
    }
    let nums = as_ints(interp, "eq", &items)?;
    Ok(if nums[0] == nums[1] { Value::True } else { Value::Nil })
}

fn cmp(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("cmp", "2", items.len()));
    }
    Ok(if items[0] == items[1] { Value::True } else { Value::Nil })
}
