use std::fmt::Write;

use crate::config::BufferConfig;
use crate::emitter;
use crate::error::{LoopError, LoopErrorKind};
use crate::label::LoopLabelStack;
use crate::token::{Command, COMMENT_MARKER};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Scanning,
    InComment,
    Done,
}

struct CompileState<'a> {
    config: &'a BufferConfig,
    output: String,
    labels: LoopLabelStack,
    /// Byte index of every `[` still open, innermost last.
    open: Vec<usize>,
}

/// Add line of assembly to output, using format! syntax.
macro_rules! push_asm {
    ($state:expr, $($arg:tt)*) => {
        (writeln!(&mut $state.output, $($arg)*)).unwrap()
    };
}

impl<'a> CompileState<'a> {
    fn new(config: &'a BufferConfig) -> Self {
        Self {
            config,
            output: String::new(),
            labels: LoopLabelStack::new(),
            open: Vec::new(),
        }
    }

    fn dispatch(&mut self, command: Command, code: &[u8], i: usize) -> Result<(), LoopError> {
        let label = match command {
            Command::LoopOpen => {
                self.open.push(i);
                Some(self.labels.enter_loop())
            }
            Command::LoopClose => {
                let label = self
                    .labels
                    .exit_loop()
                    .map_err(|_| LoopError::new(LoopErrorKind::ExtraCloseLoop, code, i))?;
                self.open.pop();
                Some(label)
            }
            _ => None,
        };

        for line in emitter::emit(command, self.config, label) {
            push_asm!(self, "{}", line);
        }
        Ok(())
    }

    fn finish(self, code: &[u8]) -> Result<String, LoopError> {
        if self.labels.finish().is_err() {
            let start = self.open.last().copied().unwrap_or(0);
            return Err(LoopError::new(LoopErrorKind::UnclosedLoop, code, start));
        }
        let mut output = self.output;
        output.push_str(emitter::epilogue());
        Ok(output)
    }
}

/// Translates brainfuck source into a complete NASM program.
///
/// The source is scanned once. `;` starts a comment running through the next
/// newline, the eight operators are translated, and everything else is
/// skipped. Nothing is returned unless every bracket is matched.
pub fn compile(code: &[u8], config: &BufferConfig) -> Result<String, LoopError> {
    let mut state = CompileState::new(config);
    state.output.push_str(&emitter::prologue(config));

    let mut scan = State::Scanning;
    let mut i = 0;
    while scan != State::Done {
        let c = match code.get(i) {
            Some(c) => *c,
            None => {
                scan = State::Done;
                continue;
            }
        };

        match scan {
            State::Scanning if c == COMMENT_MARKER => scan = State::InComment,
            State::Scanning => {
                if let Some(command) = Command::from_byte(c) {
                    state.dispatch(command, code, i)?;
                }
            }
            State::InComment if c == b'\n' => scan = State::Scanning,
            State::InComment | State::Done => (),
        }
        i += 1;
    }

    state.finish(code)
}
