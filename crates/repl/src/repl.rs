//! The interactive loop
//!
//! Reads a line, evaluates every complete form on it, prints the last value
//! in `write` form, and keeps going. Evaluation errors are printed and the
//! prompt returns; Ctrl-C abandons the current line, Ctrl-D exits.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use schist_core::{Value, write_str};
use schist_vm::Interpreter;

const PROMPT: &str = "schist> ";

pub fn run(interpreter: &Interpreter) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                match interpreter.load_str(&line) {
                    Ok(Some(Value::Void)) | Ok(None) => {}
                    Ok(Some(value)) => println!("{}", write_str(&value)),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}
