//! Ports
//!
//! An input port hands out characters, an output port accepts bytes; both
//! carry a close state. The interpreter's current ports sit on the host's
//! stdin/stdout; in-memory backings exist for tests and embedding.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::error::{Result, SchemeError};

#[derive(Debug)]
pub enum InputSource {
    /// Host stdin, buffered a line at a time.
    Stdin { pending: VecDeque<char> },
    /// Fixed text, for tests and embedded use.
    Text { chars: Vec<char>, pos: usize },
}

#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    Buffer(Vec<u8>),
}

#[derive(Debug)]
pub enum PortKind {
    Input(RefCell<InputSource>),
    Output(RefCell<OutputSink>),
}

#[derive(Debug)]
pub struct Port {
    pub kind: PortKind,
    closed: Cell<bool>,
}

impl Port {
    pub fn stdin() -> Rc<Port> {
        Rc::new(Port {
            kind: PortKind::Input(RefCell::new(InputSource::Stdin {
                pending: VecDeque::new(),
            })),
            closed: Cell::new(false),
        })
    }

    pub fn stdout() -> Rc<Port> {
        Rc::new(Port {
            kind: PortKind::Output(RefCell::new(OutputSink::Stdout)),
            closed: Cell::new(false),
        })
    }

    /// An input port over fixed text.
    pub fn from_text(text: &str) -> Rc<Port> {
        Rc::new(Port {
            kind: PortKind::Input(RefCell::new(InputSource::Text {
                chars: text.chars().collect(),
                pos: 0,
            })),
            closed: Cell::new(false),
        })
    }

    /// An output port collecting bytes in memory.
    pub fn buffer() -> Rc<Port> {
        Rc::new(Port {
            kind: PortKind::Output(RefCell::new(OutputSink::Buffer(Vec::new()))),
            closed: Cell::new(false),
        })
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, PortKind::Input(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, PortKind::Output(_))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn close(&self) {
        self.closed.set(true);
    }

    /// Read one character; `None` at end of stream. Blocks on stdin.
    pub fn read_char(&self) -> Result<Option<char>> {
        if self.closed.get() {
            return Err(SchemeError::eval("read-char: port is closed"));
        }
        let source = match &self.kind {
            PortKind::Input(source) => source,
            PortKind::Output(_) => {
                return Err(SchemeError::eval("read-char: not an input port"));
            }
        };
        let mut source = source.borrow_mut();
        match &mut *source {
            InputSource::Text { chars, pos } => {
                let ch = chars.get(*pos).copied();
                if ch.is_some() {
                    *pos += 1;
                }
                Ok(ch)
            }
            InputSource::Stdin { pending } => {
                if let Some(ch) = pending.pop_front() {
                    return Ok(Some(ch));
                }
                let mut line = String::new();
                let n = std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| SchemeError::eval(format!("read-char: {e}")))?;
                if n == 0 {
                    return Ok(None);
                }
                pending.extend(line.chars());
                Ok(pending.pop_front())
            }
        }
    }

    /// Write bytes to the sink. Flushes stdout so REPL output interleaves
    /// correctly with prompts.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if self.closed.get() {
            return Err(SchemeError::eval("write: port is closed"));
        }
        let sink = match &self.kind {
            PortKind::Output(sink) => sink,
            PortKind::Input(_) => return Err(SchemeError::eval("write: not an output port")),
        };
        let mut sink = sink.borrow_mut();
        match &mut *sink {
            OutputSink::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(bytes)
                    .and_then(|_| handle.flush())
                    .map_err(|e| SchemeError::eval(format!("write: {e}")))
            }
            OutputSink::Buffer(buf) => {
                buf.extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    pub fn write_text(&self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Contents of a buffer-backed output port.
    pub fn buffered(&self) -> Option<Vec<u8>> {
        match &self.kind {
            PortKind::Output(sink) => match &*sink.borrow() {
                OutputSink::Buffer(buf) => Some(buf.clone()),
                OutputSink::Stdout => None,
            },
            PortKind::Input(_) => None,
        }
    }
}
