// ABOUTME: print — the interpreter's only output primitive

use super::{bind, eval_args};
use crate::error::LispError;
use crate::interp::Interpreter;
use crate::printer;
use crate::value::Value;

pub fn register(interp: &mut Interpreter) -> Result<(), LispError> {
    bind(interp, "print", print)?;
    Ok(())
}

fn print(interp: &mut Interpreter, env: Value, args: Value) -> Result<Value, LispError> {
    let items = eval_args(interp, env, args)?;
    if items.len() != 1 {
        return Err(LispError::arity("print", "1", items.len()));
    }
    println!("{}", printer::format_value(&interp.heap, items[0]));
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{read_expression, BufferSource};

    #[test]
    fn print_returns_nil() {
        let mut interp = Interpreter::new();
        let env = interp.root_env;
        let mut src = BufferSource::new("(print 5)");
        let form = read_expression(&interp.heap, &interp.symbols, &mut src).unwrap().unwrap();
        assert_eq!(crate::eval::eval(&mut interp, env, form).unwrap(), Value::Nil);
    }
}
