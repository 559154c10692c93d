use std::convert::TryFrom;
use std::mem;

use static_assertions::{assert_eq_size, const_assert};

use crate::error::ConfigError;

pub const DEFAULT_TAPE_LENGTH: usize = 256;

/// Size of one tape cell. The discriminant is the width in bytes.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ElementWidth {
    Byte = 1,
    Word = 2,
    Dword = 4,
    Qword = 8,
}

assert_eq_size!(element_width_size_assert; ElementWidth, u8);
// The widest cell is addressed through a 64-bit register.
const_assert!(qword_width_assert; ElementWidth::Qword as usize == mem::size_of::<u64>());

impl ElementWidth {
    /// Width in bytes.
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Operand size keyword for memory accesses, e.g. `inc byte [rbx]`.
    pub fn operand_keyword(self) -> &'static str {
        match self {
            ElementWidth::Byte => "byte",
            ElementWidth::Word => "word",
            ElementWidth::Dword => "dword",
            ElementWidth::Qword => "qword",
        }
    }

    /// `.bss` reservation directive reserving one element per count.
    pub fn reserve_directive(self) -> &'static str {
        match self {
            ElementWidth::Byte => "resb",
            ElementWidth::Word => "resw",
            ElementWidth::Dword => "resd",
            ElementWidth::Qword => "resq",
        }
    }
}

impl Default for ElementWidth {
    fn default() -> Self {
        ElementWidth::Byte
    }
}

impl TryFrom<usize> for ElementWidth {
    type Error = ConfigError;

    fn try_from(bytes: usize) -> Result<Self, ConfigError> {
        match bytes {
            1 => Ok(ElementWidth::Byte),
            2 => Ok(ElementWidth::Word),
            4 => Ok(ElementWidth::Dword),
            8 => Ok(ElementWidth::Qword),
            other => Err(ConfigError::InvalidElementWidth(other)),
        }
    }
}

/// Shape of the tape the compiled program runs on. Fixed for one compilation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BufferConfig {
    element_width: ElementWidth,
    tape_length: usize,
}

impl BufferConfig {
    /// Fails if the tape is empty or its size in bytes overflows `usize`.
    pub fn new(element_width: ElementWidth, tape_length: usize) -> Result<Self, ConfigError> {
        if tape_length == 0 {
            return Err(ConfigError::ZeroTapeLength);
        }
        if tape_length.checked_mul(element_width.bytes()).is_none() {
            return Err(ConfigError::TapeTooLarge {
                length: tape_length,
                width: element_width.bytes(),
            });
        }
        Ok(Self {
            element_width,
            tape_length,
        })
    }

    /// Builds a config from the raw command line strings.
    pub fn from_args(tape_length: &str, element_width: &str) -> Result<Self, ConfigError> {
        let width = ElementWidth::try_from(parse_number(element_width)?)?;
        Self::new(width, parse_number(tape_length)?)
    }

    /// Width of one tape cell.
    pub fn element_width(&self) -> ElementWidth {
        self.element_width
    }

    /// Number of cells on the tape.
    pub fn tape_length(&self) -> usize {
        self.tape_length
    }

    /// Total tape size in bytes.
    pub fn tape_bytes(&self) -> usize {
        self.tape_length * self.element_width.bytes()
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            element_width: ElementWidth::default(),
            tape_length: DEFAULT_TAPE_LENGTH,
        }
    }
}

/// Parses a plain decimal number: no sign, no surrounding text.
pub fn parse_number(s: &str) -> Result<usize, ConfigError> {
    let invalid = || ConfigError::InvalidNumber(s.to_string());
    if !s.bytes().next().map_or(false, |c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    s.parse::<usize>().map_err(|_| invalid())
}
