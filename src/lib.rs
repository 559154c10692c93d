//! Single-pass brainfuck to x86_64 NASM compiler.

mod token;
mod config;
mod label;
mod emitter;
mod compiler;
mod error;
pub mod assembly;

pub use token::{Command, COMMENT_MARKER};
pub use config::{parse_number, BufferConfig, ElementWidth, DEFAULT_TAPE_LENGTH};
pub use label::{Label, LoopLabelStack, UnbalancedLoop};
pub use emitter::{epilogue, prologue};
pub use compiler::compile;
pub use error::{ConfigError, Error, LoopError, LoopErrorKind};
