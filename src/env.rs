// ABOUTME: Heap-resident environment frames — an alist of bindings chained to a parent

use crate::error::LispError;
use crate::heap::Heap;
use crate::value::Value;

/// Allocate the empty root environment: no bindings yet, no parent.
/// Primitives are installed into it afterward by `builtins::register_all`.
pub fn new_root(heap: &Heap) -> Result<Value, LispError> {
    heap.make_env(Value::Nil, Value::Nil)
}

/// Allocate a new frame with `parent` as its enclosing environment,
/// binding `params` to `args` position-wise. `params` may be a proper list
/// (exact arity) or end in a dotted symbol (that symbol collects the
/// remaining arguments as a list), matching the reader's dotted-pair
/// grammar and the reference interpreter's `push_env`.
pub fn push_env(heap: &Heap, parent: Value, params: Value, args: Value) -> Result<Value, LispError> {
    let _root = heap.root_many(&[parent, params, args]);
    let env = heap.make_env(Value::Nil, parent)?;
    let _root_env = heap.root(env);

    let mut p = params;
    let mut a = args;
    loop {
        if p.is_nil() {
            if !a.is_nil() {
                return Err(LispError::ArgumentCountMismatch);
            }
            break;
        }
        if heap.is_symbol(p) {
            // Dotted rest parameter: binds the remainder of `args` as-is.
            add_variable(heap, env, p, a)?;
            break;
        }
        let (param_head, param_tail) = heap.cell(p).ok_or(LispError::ArgumentsNotList)?;
        let (arg_head, arg_tail) = heap.cell(a).ok_or(LispError::ArgumentCountMismatch)?;
        add_variable(heap, env, param_head, arg_head)?;
        p = param_tail;
        a = arg_tail;
    }
    Ok(env)
}

/// Prepend a fresh `(symbol . value)` binding onto `env`'s frame,
/// shadowing any existing binding for `symbol` in this frame.
pub fn add_variable(heap: &Heap, env: Value, symbol: Value, value: Value) -> Result<(), LispError> {
    let _root = heap.root_many(&[env, symbol, value]);
    let (bindings, _parent) = heap.as_env(env).ok_or(LispError::Internal("add_variable on non-environment"))?;
    let pair = heap.cons(symbol, value)?;
    let _root_pair = heap.root(pair);
    let new_bindings = heap.cons(pair, bindings)?;
    heap.set_env_bindings(env, new_bindings);
    Ok(())
}

/// Walk `env`'s chain of frames looking for a binding for `symbol`
/// (compared by reference equality, since symbols are interned). Returns
/// the `(symbol . value)` cons cell itself, not just the value, so `setq`
/// can mutate its tail in place rather than rebuilding the alist.
pub fn find(heap: &Heap, env: Value, symbol: Value) -> Option<Value> {
    let mut current = env;
    loop {
        let (bindings, parent) = heap.as_env(current)?;
        let mut cursor = bindings;
        while let Some((pair, rest)) = heap.cell(cursor) {
            if let Some((bound_symbol, _)) = heap.cell(pair) {
                if bound_symbol == symbol {
                    return Some(pair);
                }
            }
            cursor = rest;
        }
        if parent.is_nil() {
            return None;
        }
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;
    use crate::symbols::SymbolTable;

    #[test]
    fn add_variable_then_find_round_trips() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let env = new_root(&heap).unwrap();
        let x = symbols.intern("x").unwrap();
        let five = heap.make_int(5).unwrap();
        add_variable(&heap, env, x, five).unwrap();
        let pair = find(&heap, env, x).unwrap();
        let (_, value) = heap.cell(pair).unwrap();
        assert_eq!(heap.as_int(value), Some(5));
    }

    #[test]
    fn find_walks_up_to_parent_frame() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let root = new_root(&heap).unwrap();
        let x = symbols.intern("x").unwrap();
        let five = heap.make_int(5).unwrap();
        add_variable(&heap, root, x, five).unwrap();

        let child = push_env(&heap, root, Value::Nil, Value::Nil).unwrap();
        let pair = find(&heap, child, x).unwrap();
        let (_, value) = heap.cell(pair).unwrap();
        assert_eq!(heap.as_int(value), Some(5));
    }

    #[test]
    fn push_env_binds_dotted_rest_parameter() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let root = new_root(&heap).unwrap();
        let rest = symbols.intern("rest").unwrap();

        let a = heap.make_int(1).unwrap();
        let b = heap.make_int(2).unwrap();
        let args = heap.cons(a, heap.cons(b, Value::Nil).unwrap()).unwrap();

        let frame = push_env(&heap, root, rest, args).unwrap();
        let pair = find(&heap, frame, rest).unwrap();
        let (_, bound) = heap.cell(pair).unwrap();
        assert_eq!(bound, args);
    }

    #[test]
    fn push_env_rejects_arity_mismatch() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let root = new_root(&heap).unwrap();
        let x = symbols.intern("x").unwrap();
        let params = heap.cons(x, Value::Nil).unwrap();
        let result = push_env(&heap, root, params, Value::Nil);
        assert!(matches!(result, Err(LispError::ArgumentCountMismatch)));
    }
}
