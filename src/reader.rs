// ABOUTME: Tokenizer and recursive-descent parser reading one expression at a time from a char stream

use crate::error::LispError;
use crate::heap::Heap;
use crate::symbols::SymbolTable;
use crate::value::Value;

/// The host-provided character stream. `unread_char` is always called with
/// the character most recently returned by `read_char`; the reader never
/// pushes back more than one character at a time.
pub trait CharSource {
    fn read_char(&mut self) -> Option<char>;
    fn peek_char(&mut self) -> Option<char>;
    fn unread_char(&mut self, c: char);
}

/// An in-memory `CharSource` over an owned string, used by the batch
/// runner, the REPL (one accumulated line buffer per top-level read), and
/// every test in this module.
pub struct BufferSource {
    chars: Vec<char>,
    pos: usize,
}

impl BufferSource {
    pub fn new(text: &str) -> Self {
        BufferSource {
            chars: text.chars().collect(),
            pos: 0,
        }
    }
}

impl CharSource for BufferSource {
    fn read_char(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unread_char(&mut self, _c: char) {
        self.pos = self.pos.saturating_sub(1);
    }
}

fn is_sym_char(c: char) -> bool {
    matches!(c, '~' | '!' | '@' | '#' | '$' | '&' | '^' | '*' | '-' | '_' | '=' | '+' | ':' | '/' | '?' | '<' | '>')
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || is_sym_char(c)
}

fn is_symbol_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_sym_char(c)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Read one complete expression from `source`, or `Ok(None)` at end of
/// stream. Allocates through `heap` and `symbols`; every intermediate value
/// that spans an allocating call is registered on the root stack.
pub fn read_expression(heap: &Heap, symbols: &SymbolTable, source: &mut dyn CharSource) -> Result<Option<Value>, LispError> {
    skip_atmosphere(source);
    match source.read_char() {
        None => Ok(None),
        Some(c) => Ok(Some(read_from(heap, symbols, source, c)?)),
    }
}

/// Like [`read_expression`] but end-of-stream is an error — used where the
/// grammar demands another expression (after `'` or after `.`).
fn read_required_expression(heap: &Heap, symbols: &SymbolTable, source: &mut dyn CharSource) -> Result<Value, LispError> {
    read_expression(heap, symbols, source)?.ok_or(LispError::UnclosedParenthesis)
}

fn skip_atmosphere(source: &mut dyn CharSource) {
    loop {
        match source.peek_char() {
            Some(c) if is_whitespace(c) => {
                source.read_char();
            }
            Some(';') => {
                source.read_char();
                loop {
                    match source.read_char() {
                        None => return,
                        Some('\n') => break,
                        Some('\r') => {
                            if source.peek_char() == Some('\n') {
                                source.read_char();
                            }
                            break;
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => return,
        }
    }
}

fn read_from(heap: &Heap, symbols: &SymbolTable, source: &mut dyn CharSource, c: char) -> Result<Value, LispError> {
    match c {
        '(' => read_list(heap, symbols, source),
        ')' => Ok(Value::CloseParen),
        '\'' => {
            let inner = read_required_expression(heap, symbols, source)?;
            let _guard = heap.root(inner);
            let quote = symbols.intern("quote")?;
            let _guard2 = heap.root_many(&[inner, quote]);
            let tail = heap.cons(inner, Value::Nil)?;
            heap.cons(quote, tail)
        }
        '.' => Ok(Value::Dot),
        '-' => match source.peek_char() {
            Some(d) if d.is_ascii_digit() => read_integer(heap, source, true),
            _ => read_symbol(heap, symbols, source, '-'),
        },
        d if d.is_ascii_digit() => {
            source.unread_char(d);
            read_integer(heap, source, false)
        }
        s if is_symbol_start(s) => read_symbol(heap, symbols, source, s),
        other => Err(LispError::UnrecognizedChar(other)),
    }
}

/// Reads the run of digits immediately following the current position
/// (the leading `-`, if any, has already been consumed by the caller).
fn read_integer(heap: &Heap, source: &mut dyn CharSource, negative: bool) -> Result<Value, LispError> {
    let mut n: i32 = 0;
    while let Some(d) = source.peek_char() {
        if !d.is_ascii_digit() {
            break;
        }
        source.read_char();
        let digit = d.to_digit(10).unwrap() as i32;
        n = n.saturating_mul(10).saturating_add(digit);
    }
    if negative {
        n = -n;
    }
    heap.make_int(n)
}

fn read_symbol(heap: &Heap, symbols: &SymbolTable, source: &mut dyn CharSource, first: char) -> Result<Value, LispError> {
    let mut name = String::new();
    name.push(first);
    loop {
        match source.peek_char() {
            Some(c) if is_symbol_continue(c) => {
                source.read_char();
                name.push(c);
                if name.len() > crate::value::SYMBOL_MAX_LEN {
                    return Err(LispError::SymbolTooLong);
                }
            }
            _ => break,
        }
    }
    symbols.intern(&name)
}

/// After `(`, loop reading sub-expressions onto a reversed accumulator,
/// splicing in a dotted tail or reversing into a proper list at `)`.
fn read_list(heap: &Heap, symbols: &SymbolTable, source: &mut dyn CharSource) -> Result<Value, LispError> {
    let mut acc = Value::Nil;
    loop {
        skip_atmosphere(source);
        let c = source.read_char().ok_or(LispError::UnclosedParenthesis)?;
        if c == ')' {
            return reverse_onto(heap, acc, Value::Nil);
        }
        if c == '.' {
            let _guard = heap.root(acc);
            let tail = read_required_expression(heap, symbols, source)?;
            let _guard2 = heap.root_many(&[acc, tail]);
            skip_atmosphere(source);
            match source.read_char() {
                Some(')') => return reverse_onto(heap, acc, tail),
                _ => return Err(LispError::DotNotFollowedByCloseParen),
            }
        }
        let elt = read_from(heap, symbols, source, c)?;
        let _guard = heap.root_many(&[acc, elt]);
        acc = heap.cons(elt, acc)?;
    }
}

/// Reverse a list built by prepending (`acc`), producing a fresh chain that
/// terminates at `tail` instead of `Nil`.
fn reverse_onto(heap: &Heap, mut acc: Value, mut tail: Value) -> Result<Value, LispError> {
    loop {
        match heap.cell(acc) {
            None => return Ok(tail),
            Some((head, rest)) => {
                let _guard = heap.root_many(&[rest, tail, head]);
                tail = heap.cons(head, tail)?;
                acc = rest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    fn read_one(heap: &Heap, symbols: &SymbolTable, text: &str) -> Value {
        let mut src = BufferSource::new(text);
        read_expression(heap, symbols, &mut src).unwrap().unwrap()
    }

    #[test]
    fn reads_positive_and_negative_integers() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        assert_eq!(heap.as_int(read_one(&heap, &symbols, "42")), Some(42));
        assert_eq!(heap.as_int(read_one(&heap, &symbols, "-7")), Some(-7));
    }

    #[test]
    fn a_minus_not_followed_by_a_digit_is_a_symbol() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "-foo");
        assert_eq!(heap.symbol_name(v).as_deref(), Some("-foo"));
    }

    #[test]
    fn reads_a_symbol() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "foo-bar?");
        assert_eq!(heap.symbol_name(v).as_deref(), Some("foo-bar?"));
    }

    #[test]
    fn reads_a_proper_list() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "(1 2 3)");
        let (a, rest) = heap.cell(v).unwrap();
        assert_eq!(heap.as_int(a), Some(1));
        let (b, rest) = heap.cell(rest).unwrap();
        assert_eq!(heap.as_int(b), Some(2));
        let (c, rest) = heap.cell(rest).unwrap();
        assert_eq!(heap.as_int(c), Some(3));
        assert!(rest.is_nil());
    }

    #[test]
    fn reads_a_dotted_pair() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "(1 . 2)");
        let (a, tail) = heap.cell(v).unwrap();
        assert_eq!(heap.as_int(a), Some(1));
        assert_eq!(heap.as_int(tail), Some(2));
    }

    #[test]
    fn quote_shorthand_expands_to_quote_form() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "'x");
        let (head, rest) = heap.cell(v).unwrap();
        assert_eq!(heap.symbol_name(head).as_deref(), Some("quote"));
        let (arg, rest) = heap.cell(rest).unwrap();
        assert_eq!(heap.symbol_name(arg).as_deref(), Some("x"));
        assert!(rest.is_nil());
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let v = read_one(&heap, &symbols, "; a comment\n42");
        assert_eq!(heap.as_int(v), Some(42));
    }

    #[test]
    fn end_of_stream_returns_none() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let mut src = BufferSource::new("   ");
        assert_eq!(read_expression(&heap, &symbols, &mut src).unwrap(), None);
    }

    #[test]
    fn unclosed_list_is_an_error() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let mut src = BufferSource::new("(1 2");
        assert!(matches!(
            read_expression(&heap, &symbols, &mut src),
            Err(LispError::UnclosedParenthesis)
        ));
    }

    #[test]
    fn stray_close_paren_is_returned_as_a_sentinel() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let mut src = BufferSource::new(")");
        assert_eq!(read_expression(&heap, &symbols, &mut src).unwrap(), Some(Value::CloseParen));
    }

    #[test]
    fn symbol_too_long_is_an_error() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let text: String = std::iter::repeat('a').take(crate::value::SYMBOL_MAX_LEN + 5).collect();
        let mut src = BufferSource::new(&text);
        assert!(matches!(read_expression(&heap, &symbols, &mut src), Err(LispError::SymbolTooLong)));
    }

    #[test]
    fn dot_without_close_paren_is_an_error() {
        let heap = Heap::new();
        let symbols = SymbolTable::new(heap.clone());
        let mut src = BufferSource::new("(1 . 2 3)");
        assert!(matches!(
            read_expression(&heap, &symbols, &mut src),
            Err(LispError::DotNotFollowedByCloseParen)
        ));
    }
}
