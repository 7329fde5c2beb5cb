// ABOUTME: Process-wide symbol interning — linear lookup through a heap-resident cell chain

use crate::error::LispError;
use crate::heap::{Heap, PinnedRoot};
use crate::value::Value;
use std::cell::RefCell;

/// All symbols are interned: two symbols with the same name are the same
/// heap reference, so callers can compare symbols with `==` on `Value`
/// rather than comparing names. The table itself is an ordinary Lisp list
/// of symbol cells living on the heap (not an auxiliary `HashMap`), matching
/// the reference interpreter's global `symbols` list exactly — `intern`
/// walks it with `cdr`/`car` the same way `eval` walks any other list.
pub struct SymbolTable {
    heap: Heap,
    /// Handle onto the pinned root tracking the current list head, repointed
    /// on every successful `intern` so the collector always traces the
    /// latest head rather than a stale snapshot.
    head_root: PinnedRoot,
    head: RefCell<Value>,
}

impl SymbolTable {
    pub fn new(heap: Heap) -> Self {
        let head_root = heap.pin_root(Value::Nil);
        SymbolTable {
            heap,
            head_root,
            head: RefCell::new(Value::Nil),
        }
    }

    /// Return the interned symbol named `name`, allocating and linking a
    /// new one in if this is the first time it has been seen.
    pub fn intern(&self, name: &str) -> Result<Value, LispError> {
        if name.len() > crate::value::SYMBOL_MAX_LEN {
            return Err(LispError::SymbolTooLong);
        }

        let mut cursor = *self.head.borrow();
        while let Some((sym, rest)) = self.heap.cell(cursor) {
            if self.heap.symbol_name(sym).as_deref() == Some(name) {
                return Ok(sym);
            }
            cursor = rest;
        }

        let sym = self.heap.make_symbol_obj(name)?;
        let _guard = self.heap.root(sym);
        let new_head = self.heap.cons(sym, *self.head.borrow())?;
        *self.head.borrow_mut() = new_head;
        self.heap.set_pinned(self.head_root, new_head);
        Ok(sym)
    }
}
