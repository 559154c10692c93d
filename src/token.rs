use std::fmt;

/// Marker that starts a comment running to the end of the line.
pub const COMMENT_MARKER: u8 = b';';

/// One brainfuck operator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// `>` advance the tape pointer one cell
    MoveRight,
    /// `<` move the tape pointer back one cell
    MoveLeft,
    /// `+` increment the current cell
    Increment,
    /// `-` decrement the current cell
    Decrement,
    /// `.` write the current cell to stdout
    Output,
    /// `,` read from stdin into the current cell
    Input,
    /// `[` skip past the matching `]` if the current cell is zero
    LoopOpen,
    /// `]` jump back to the matching `[` if the current cell is nonzero
    LoopClose,
}

impl Command {
    /// Classifies one source byte. Anything that is not one of the eight
    /// operators (including the comment marker) yields `None`.
    pub fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'>' => Some(Command::MoveRight),
            b'<' => Some(Command::MoveLeft),
            b'+' => Some(Command::Increment),
            b'-' => Some(Command::Decrement),
            b'.' => Some(Command::Output),
            b',' => Some(Command::Input),
            b'[' => Some(Command::LoopOpen),
            b']' => Some(Command::LoopClose),
            _ => None,
        }
    }

    /// The source character for this operator.
    pub fn symbol(self) -> char {
        match self {
            Command::MoveRight => '>',
            Command::MoveLeft => '<',
            Command::Increment => '+',
            Command::Decrement => '-',
            Command::Output => '.',
            Command::Input => ',',
            Command::LoopOpen => '[',
            Command::LoopClose => ']',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
