use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    UnbalancedLoop(#[from] LoopError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} process failed with {status}")]
    Toolchain { stage: &'static str, status: i32 },
    #[error("could not run {stage}: {source}")]
    ToolchainSpawn {
        stage: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("no object format is known for this platform")]
    UnsupportedPlatform,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("{0}: is not a valid number of bytes for buffer element (expected 1, 2, 4 or 8)")]
    InvalidElementWidth(usize),
    #[error("buffer length must be greater than zero")]
    ZeroTapeLength,
    #[error("buffer of {length} elements of {width} bytes is too large")]
    TapeTooLarge { length: usize, width: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopErrorKind {
    /// A `]` with no open loop.
    ExtraCloseLoop,
    /// End of input reached with a `[` still open.
    UnclosedLoop,
}

/// An unbalanced bracket, with enough of the source kept around to point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopError {
    kind: LoopErrorKind,
    line: Vec<u8>,
    linenum: usize,
    offset: usize,
}

impl LoopError {
    /// `i` is the byte index of the offending bracket in `code`.
    pub(crate) fn new(kind: LoopErrorKind, code: &[u8], i: usize) -> Self {
        let (line, linenum, offset) = find_line(code, i);
        Self {
            kind,
            line: line.into(),
            linenum,
            offset,
        }
    }

    pub fn kind(&self) -> LoopErrorKind {
        self.kind
    }

    /// 1-based line of the offending bracket.
    pub fn line(&self) -> usize {
        self.linenum
    }

    /// 1-based column of the offending bracket, in characters.
    pub fn column(&self) -> usize {
        String::from_utf8_lossy(&self.line[..self.offset]).chars().count() + 1
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let line = String::from_utf8_lossy(&self.line);
        let prefix = String::from_utf8_lossy(&self.line[..self.offset]);
        let width = UnicodeWidthStr::width(&*prefix);

        match self.kind {
            LoopErrorKind::UnclosedLoop => {
                writeln!(f, "reached end of input with unterminated loop")?;
                writeln!(f, "loop started at {}:{}", self.linenum, self.column())?;
            }
            LoopErrorKind::ExtraCloseLoop => {
                writeln!(
                    f,
                    "] found at {}:{} when not in a loop",
                    self.linenum,
                    self.column()
                )?;
            }
        }

        writeln!(f, "{}", line.trim_end_matches('\r'))?;
        write!(f, "{}^", " ".repeat(width))
    }
}

impl error::Error for LoopError {}

/// Returns the line containing byte `i`, its 1-based number, and the byte
/// offset of `i` within it.
fn find_line(code: &[u8], i: usize) -> (&[u8], usize, usize) {
    let offset = code[..i].iter().rev().take_while(|x| **x != b'\n').count();
    let start = i - offset;
    let end = i + code[i..].iter().take_while(|x| **x != b'\n').count();
    let linenum = code[..start].iter().filter(|x| **x == b'\n').count() + 1;
    (&code[start..end], linenum, offset)
}
