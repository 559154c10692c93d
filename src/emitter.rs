//! NASM templates for each command, plus the fixed program prologue and
//! epilogue. The tape pointer lives in `rbx`; I/O and exit use the Linux
//! x86_64 syscall ABI.

use crate::config::BufferConfig;
use crate::label::Label;
use crate::token::Command;
use crate::token::Command::*;

/// Reserves the tape and points `rbx` at its first cell.
pub fn prologue(config: &BufferConfig) -> String {
    format!(
        concat!(
            "global _start\n\n",
            "section .bss\n",
            "\tbuffer: {} {}\n\n",
            "section .text\n",
            "_start:\n",
            "\tmov rbx, buffer\n"
        ),
        config.element_width().reserve_directive(),
        config.tape_length()
    )
}

/// `exit(0)`.
pub fn epilogue() -> &'static str {
    concat!(
        "\n",
        "    mov rdi, 0   ; exit\n",
        "    mov rax, 60  ; exit\n",
        "    syscall      ; exit\n"
    )
}

/// Lines implementing `command`. Brackets take the label the loop label
/// stack handed out for this loop; the driver always supplies one.
pub(crate) fn emit(
    command: Command,
    config: &BufferConfig,
    label: Option<Label>,
) -> Vec<String> {
    let width = config.element_width();
    let size = width.operand_keyword();

    match (command, label) {
        (MoveRight, _) => vec![format!("    add rbx, {}                ; >", width.bytes())],
        (MoveLeft, _) => vec![format!("    sub rbx, {}                ; <", width.bytes())],
        (Increment, _) => vec![format!("    inc {} [rbx]           ; +", size)],
        (Decrement, _) => vec![format!("    dec {} [rbx]           ; -", size)],
        // One unit per transfer, whatever the cell width.
        (Output, _) => syscall(1, 1, '.'),
        (Input, _) => syscall(0, 0, ','),
        (LoopOpen, Some(label)) => vec![
            format!("label_open_{}:          ; [", label),
            format!("    cmp {} [rbx], 0        ; [", size),
            format!("    je  label_close_{}  ; [", label),
        ],
        (LoopClose, Some(label)) => vec![
            format!("label_close_{}:         ; ]", label),
            format!("    cmp {} [rbx], 0        ; ]", size),
            format!("    jne label_open_{}   ; ]", label),
        ],
        (LoopOpen, None) | (LoopClose, None) => {
            panic!("{} emitted without a loop label", command)
        }
    }
}

/// read/write of one unit between `fd` and the cell at `rbx`.
fn syscall(number: u8, fd: u8, op: char) -> Vec<String> {
    vec![
        format!("    mov rdi, {}               ; {}", fd, op),
        format!("    mov rsi, rbx             ; {}", op),
        format!("    mov rdx, 1               ; {}", op),
        format!("    mov rax, {}               ; {}", number, op),
        format!("    syscall                  ; {}", op),
    ]
}
