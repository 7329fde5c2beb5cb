// ABOUTME: Version banner and the REPL's welcome text

use crate::heap::DEFAULT_HEAP_BYTES;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "minilisp";
pub const WELCOME_SUBTITLE: &str = "A minimal LISP interpreter with a root-tracked garbage collector";

pub const HELP_TEXT: &str = r#"
Type any expression to read, evaluate, and print it. Ctrl-D or end of
input exits the REPL. There is no error recovery: a malformed expression
or a runtime error terminates the session.
"#;

/// The default byte budget, surfaced in `--help` output and the banner.
pub fn default_heap_bytes() -> usize {
    DEFAULT_HEAP_BYTES
}
