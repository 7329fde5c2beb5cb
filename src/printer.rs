// ABOUTME: Renders values to their printed form per the reader-compatible grammar

use crate::heap::Heap;
use crate::value::Value;
use std::io::{self, Write};

/// Write `value`'s printed form to `out`, with no trailing newline — the
/// caller (REPL, `print` primitive) decides whether one follows.
pub fn write_value(heap: &Heap, value: Value, out: &mut dyn Write) -> io::Result<()> {
    match value {
        Value::Nil => write!(out, "()"),
        Value::True => write!(out, "t"),
        Value::Dot => write!(out, "."),
        Value::CloseParen => write!(out, ")"),
        Value::Ref(_) => {
            if let Some(n) = heap.as_int(value) {
                write!(out, "{n}")
            } else if let Some(name) = heap.symbol_name(value) {
                write!(out, "{name}")
            } else if heap.is_cell(value) {
                write_cell(heap, value, out)
            } else if heap.as_primitive(value).is_some() {
                write!(out, "<primitive>")
            } else if heap.as_function(value).is_some() {
                write!(out, "<function>")
            } else if heap.as_macro(value).is_some() {
                write!(out, "<macro>")
            } else {
                write!(out, "<environment>")
            }
        }
    }
}

fn write_cell(heap: &Heap, value: Value, out: &mut dyn Write) -> io::Result<()> {
    write!(out, "(")?;
    let mut cursor = value;
    let mut first = true;
    loop {
        let (head, tail) = heap.cell(cursor).expect("write_cell called on a non-cell");
        if !first {
            write!(out, " ")?;
        }
        first = false;
        write_value(heap, head, out)?;
        if tail.is_nil() {
            break;
        }
        if heap.is_cell(tail) {
            cursor = tail;
            continue;
        }
        write!(out, " . ")?;
        write_value(heap, tail, out)?;
        break;
    }
    write!(out, ")")
}

/// Convenience used by tests and the `print` primitive: render to an owned
/// `String` rather than threading a `Write` sink through.
pub fn format_value(heap: &Heap, value: Value) -> String {
    let mut buf = Vec::new();
    write_value(heap, value, &mut buf).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(buf).expect("printed form is always valid UTF-8")
}
