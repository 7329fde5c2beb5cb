// ABOUTME: Error types for reader, evaluator and heap failures — all of them fatal

use thiserror::Error;

/// Every error in this interpreter is fatal: there is no recovery, and the
/// REPL does not survive one (§7). Errors are still plumbed as ordinary
/// `Result`s through `?` rather than calling `std::process::exit` from deep
/// call stacks — only the driver (the REPL loop / batch runner) converts an
/// `Err` into a diagnostic line and a non-zero exit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    // ---- reader errors (§4.3) ----
    #[error("unable to handle character: {0:?}")]
    UnrecognizedChar(char),

    #[error("symbol name too long (max {SYMBOL_MAX_LEN} bytes)", SYMBOL_MAX_LEN = crate::value::SYMBOL_MAX_LEN)]
    SymbolTooLong,

    #[error("close paranthesis expected after dot")]
    DotNotFollowedByCloseParen,

    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    #[error("stray close paranthesis")]
    StrayCloseParen,

    #[error("stray dot")]
    StrayDot,

    // ---- evaluator errors (§4.5, §4.6) ----
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("the head of a list must be a function")]
    NotCallable,

    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityMismatch {
        function: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("{function}: wrong argument type{}: expected {expected}", ArgPos(*.position))]
    TypeMismatch {
        function: &'static str,
        expected: &'static str,
        position: usize,
    },

    #[error("{function}: {message}")]
    Malformed {
        function: &'static str,
        message: String,
    },

    #[error("setq: unbound variable {0}")]
    UnboundVariable(String),

    #[error("cannot apply function: number of arguments does not match")]
    ArgumentCountMismatch,

    #[error("arguments must be a list")]
    ArgumentsNotList,

    // ---- heap errors (§4.1) ----
    #[error("memory exhausted")]
    MemoryExhausted,

    #[error("{0}")]
    Internal(&'static str),
}

/// Renders " at argument N" for a 1-based position, or nothing for 0
/// (meaning "no specific argument").
struct ArgPos(usize);

impl std::fmt::Display for ArgPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            Ok(())
        } else {
            write!(f, " at argument {}", self.0)
        }
    }
}

impl LispError {
    pub fn arity(function: &'static str, expected: &'static str, actual: usize) -> Self {
        LispError::ArityMismatch {
            function,
            expected,
            actual,
        }
    }

    pub fn type_mismatch(function: &'static str, expected: &'static str, position: usize) -> Self {
        LispError::TypeMismatch {
            function,
            expected,
            position,
        }
    }

    pub fn malformed(function: &'static str, message: impl Into<String>) -> Self {
        LispError::Malformed {
            function,
            message: message.into(),
        }
    }

    /// Whether this error originated inside heap/allocator machinery rather
    /// than user-visible reading or evaluation — used only to prefix the
    /// diagnostic printed by the driver, per §7's "Internal errors ...
    /// Same termination path, prefixed as internal."
    pub fn is_internal(&self) -> bool {
        matches!(self, LispError::MemoryExhausted | LispError::Internal(_))
    }
}
