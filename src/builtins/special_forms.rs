// ABOUTME: setq, while, gensym, if, lambda, defun, defmacro, define, macroexpand

use super::{bind, list_to_vec, vec_to_list};
use crate::env;
use crate::error::LispError;
use crate::eval;
use crate::interp::Interpreter;
use crate::value::Value;

pub fn register(interp: &mut Interpreter) -> Result<(), LispError> {
    bind(interp, "setq", setq)?;
    bind(interp, "while", while_)?;
    bind(interp, "gensym", gensym)?;
    bind(interp, "if", if_)?;
    bind(interp, "lambda", lambda)?;
    bind(interp, "defun", defun)?;
    bind(interp, "defmacro", defmacro)?;
    bind(interp, "define", define)?;
    bind(interp, "macroexpand", macroexpand)?;
    Ok(())
}

fn setq(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("setq", "2", items.len()));
    }
    let symbol = items[0];
    if !interp.heap.is_symbol(symbol) {
        return Err(LispError::type_mismatch("setq", "symbol", 1));
    }
    let value = eval::eval(interp, env, items[1])?;
    let _guard = interp.heap.root(value);
    match env::find(&interp.heap, env, symbol) {
        Some(pair) => {
            interp.heap.set_tail(pair, value);
            Ok(value)
        }
        None => {
            let name = interp.heap.symbol_name(symbol).expect("checked is_symbol");
            Err(LispError::UnboundVariable(name.to_string()))
        }
    }
}

fn while_(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() < 2 {
        return Err(LispError::arity("while", "at least 2", items.len()));
    }
    let cond = items[0];
    let (_, body) = interp.heap.cell(args).expect("args non-empty, checked above");
    loop {
        let c = eval::eval(interp, env, cond)?;
        if !c.is_truthy() {
            break;
        }
        eval::progn(interp, env, body)?;
    }
    Ok(Value::Nil)
}

fn gensym(interp: &mut Interpreter, _env: Value, args: Value) -> Result<Value, LispError> {
    if !args.is_nil() {
        let items = list_to_vec(&interp.heap, args)?;
        return Err(LispError::arity("gensym", "0", items.len()));
    }
    interp.gensym()
}

fn if_(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() < 2 {
        return Err(LispError::arity("if", "at least 2", items.len()));
    }
    let cond = eval::eval(interp, env, items[0])?;
    if cond.is_truthy() {
        eval::eval(interp, env, items[1])
    } else if items.len() == 2 {
        Ok(Value::Nil)
    } else {
        let mut result = Value::Nil;
        for form in &items[2..] {
            result = eval::eval(interp, env, *form)?;
        }
        Ok(result)
    }
}

fn lambda(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let (params, body) = interp.heap.cell(args).ok_or_else(|| LispError::arity("lambda", "at least 2", 0))?;
    if body.is_nil() {
        return Err(LispError::arity("lambda", "at least 2", 1));
    }
    interp.heap.make_function(params, body, env)
}

fn defun(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() < 3 {
        return Err(LispError::arity("defun", "at least 3", items.len()));
    }
    let name = items[0];
    if !interp.heap.is_symbol(name) {
        return Err(LispError::type_mismatch("defun", "symbol", 1));
    }
    let params = items[1];
    let body = vec_to_list(&interp.heap, &items[2..])?;
    let _guard = interp.heap.root_many(&[name, params, body, env]);
    let func = interp.heap.make_function(params, body, env)?;
    let _guard2 = interp.heap.root(func);
    env::add_variable(&interp.heap, env, name, func)?;
    Ok(func)
}

fn defmacro(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() < 3 {
        return Err(LispError::arity("defmacro", "at least 3", items.len()));
    }
    let name = items[0];
    if !interp.heap.is_symbol(name) {
        return Err(LispError::type_mismatch("defmacro", "symbol", 1));
    }
    let params = items[1];
    let body = vec_to_list(&interp.heap, &items[2..])?;
    let _guard = interp.heap.root_many(&[name, params, body, env]);
    let mac = interp.heap.make_macro(params, body, env)?;
    let _guard2 = interp.heap.root(mac);
    env::add_variable(&interp.heap, env, name, mac)?;
    Ok(mac)
}

fn define(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() != 2 {
        return Err(LispError::arity("define", "2", items.len()));
    }
    let name = items[0];
    if !interp.heap.is_symbol(name) {
        return Err(LispError::type_mismatch("define", "symbol", 1));
    }
    let value = eval::eval(interp, env, items[1])?;
    let _guard = interp.heap.root_many(&[name, value, env]);
    env::add_variable(&interp.heap, env, name, value)?;
    Ok(value)
}

fn macroexpand(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = list_to_vec(&interp.heap, args)?;
    if items.len() != 1 {
        return Err(LispError::arity("macroexpand", "1", items.len()));
    }
    eval::expand_once(interp, env, items[0])
}
