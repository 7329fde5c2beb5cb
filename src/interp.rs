// ABOUTME: Interpreter context — the heap, the root environment, and the gensym counter

use crate::builtins;
use crate::env;
use crate::error::LispError;
use crate::heap::Heap;
use crate::symbols::SymbolTable;
use crate::value::Value;

/// Owns every piece of process-wide mutable state the §5 resource model
/// calls out: the heap and its byte budget, the interned symbol table, the
/// root environment, and the monotonic `gensym` counter. Bundled into one
/// struct (rather than left as free-standing globals) so a host can run
/// more than one interpreter instance, and so tests can construct a fresh
/// one per case without fighting shared state.
pub struct Interpreter {
    pub heap: Heap,
    pub symbols: SymbolTable,
    pub root_env: Value,
    gensym_counter: u32,
}

impl Interpreter {
    /// A fresh interpreter with the default heap budget, the symbol table
    /// seeded, and the primitive table installed in the root environment.
    pub fn new() -> Self {
        Self::with_heap(Heap::new())
    }

    pub fn with_heap(heap: Heap) -> Self {
        let symbols = SymbolTable::new(heap.clone());
        let root_env = env::new_root(&heap).expect("allocating the root environment cannot fail on an empty heap");
        heap.pin_root(root_env);

        let mut interp = Interpreter {
            heap,
            symbols,
            root_env,
            gensym_counter: 0,
        };
        interp.define_constants().expect("binding constants cannot fail on an empty heap");
        builtins::register_all(&mut interp).expect("installing primitives cannot fail on an empty heap");
        interp
    }

    /// Binds the reader-inaccessible sentinel `t` into the root environment,
    /// mirroring `plisp.c`'s `define_constants`. The reader grammar has no
    /// literal boolean token — a bare `t` in source text is read as an
    /// ordinary symbol, so without this binding it is simply undefined.
    fn define_constants(&mut self) -> Result<(), LispError> {
        let sym = self.intern("t")?;
        let root_env = self.root_env;
        env::add_variable(&self.heap, root_env, sym, Value::True)
    }

    pub fn gensym(&mut self) -> Result<Value, LispError> {
        let n = self.gensym_counter;
        self.gensym_counter += 1;
        self.heap.make_symbol_obj(&format!("G__{n}"))
    }

    pub fn intern(&self, name: &str) -> Result<Value, LispError> {
        self.symbols.intern(name)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
