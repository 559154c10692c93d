use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn bfc() -> Command {
    Command::cargo_bin("bfc").unwrap()
}

/// Empty directory under the system temp dir, unique to this test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("bfc_cli_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir(&dir).unwrap();
    dir
}

/// Writes an executable shell script standing in for a toolchain stage.
#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
}

/// `PATH` with `dir` searched first.
fn path_with(dir: &Path) -> std::ffi::OsString {
    let mut paths = vec![dir.to_path_buf()];
    if let Some(path) = env::var_os("PATH") {
        paths.extend(env::split_paths(&path));
    }
    env::join_paths(paths).unwrap()
}

#[test]
fn assembly_to_stdout() {
    bfc()
        .args(&["-S", "-o", "-"])
        .write_stdin("+.")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "global _start\n\nsection .bss\n\tbuffer: resb 256\n",
        ))
        .stdout(predicate::str::contains("    inc byte [rbx]           ; +\n"))
        .stdout(predicate::str::contains("    syscall                  ; .\n"))
        .stdout(predicate::str::ends_with("    syscall      ; exit\n"));
}

#[test]
fn buffer_options() {
    bfc()
        .args(&["-S", "-o", "-", "-b", "30000", "-e", "8"])
        .write_stdin(">[-]")
        .assert()
        .success()
        .stdout(predicate::str::contains("\tbuffer: resq 30000\n"))
        .stdout(predicate::str::contains("    add rbx, 8                ; >\n"))
        .stdout(predicate::str::contains("    cmp qword [rbx], 0        ; [\n"));
}

#[test]
fn comments_are_stripped() {
    let with_comment = bfc()
        .args(&["-S", "-o", "-"])
        .write_stdin("+;comment [ ]\n+")
        .output()
        .unwrap();
    let without = bfc()
        .args(&["-S", "-o", "-"])
        .write_stdin("++")
        .output()
        .unwrap();
    assert!(with_comment.status.success());
    assert_eq!(with_comment.stdout, without.stdout);
}

#[test]
fn reads_named_file_and_writes_output_file() {
    let dir = env::temp_dir();
    let src = dir.join(format!("bfc_cli_{}.b", std::process::id()));
    let dst = dir.join(format!("bfc_cli_{}.asm", std::process::id()));
    fs::write(&src, "[-]").unwrap();

    bfc()
        .arg("-S")
        .arg("-o")
        .arg(&dst)
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let asm = fs::read_to_string(&dst).unwrap();
    assert!(asm.contains("label_open_000_000:"));
    assert!(asm.contains("    jne label_open_000_000   ; ]\n"));

    fs::remove_file(&src).unwrap();
    fs::remove_file(&dst).unwrap();
}

#[test]
fn missing_input_file() {
    bfc()
        .args(&["-S", "-o", "-", "/nonexistent/prog.b"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("bfc: /nonexistent/prog.b:"));
}

#[test]
fn extra_close_loop() {
    bfc()
        .args(&["-S", "-o", "-"])
        .write_stdin("+]")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("] found at 1:2 when not in a loop"));
}

#[test]
fn unclosed_loop() {
    bfc()
        .args(&["-S", "-o", "-"])
        .write_stdin("[[]")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unterminated loop"));
}

#[test]
fn invalid_element_width() {
    bfc()
        .args(&["-S", "-o", "-", "-e", "3"])
        .write_stdin("+")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "3: is not a valid number of bytes for buffer element",
        ));
}

#[test]
fn invalid_buffer_length() {
    for bad in ["-5", "12k", "0"].iter() {
        bfc()
            .args(&["-S", "-o", "-", "-b", *bad])
            .write_stdin("+")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty());
    }
}

#[test]
fn assembly_defaults_to_a_asm() {
    let dir = scratch_dir("default_asm");
    bfc()
        .arg("-S")
        .current_dir(&dir)
        .write_stdin("+")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let asm = fs::read_to_string(dir.join("a.asm")).unwrap();
    assert!(asm.starts_with("global _start\n"));
    assert!(asm.contains("    inc byte [rbx]           ; +\n"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn stdout_without_assembly_flag_skips_toolchain() {
    let dir = scratch_dir("stdout_exec");
    bfc()
        .args(&["-o", "-"])
        .current_dir(&dir)
        // No assembler or linker can be found.
        .env("PATH", &dir)
        .write_stdin("+.")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("global _start\n"))
        .stdout(predicate::str::contains("    syscall                  ; .\n"))
        .stdout(predicate::str::ends_with("    syscall      ; exit\n"));

    assert!(!dir.join("a.out").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn toolchain_status_is_passed_through() {
    let dir = scratch_dir("nasm_fails");
    fake_tool(&dir, "nasm", "exit 7");
    fake_tool(&dir, "ld", "exit 0");

    bfc()
        .current_dir(&dir)
        .env("PATH", path_with(&dir))
        .write_stdin("+")
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("bfc: nasm process failed with 7"));

    assert!(!dir.join("a.out").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn linker_failure_is_reported() {
    let dir = scratch_dir("ld_fails");
    fake_tool(&dir, "nasm", "exit 0");
    fake_tool(&dir, "ld", "exit 2");

    bfc()
        .current_dir(&dir)
        .env("PATH", path_with(&dir))
        .write_stdin("+")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bfc: ld process failed with 2"));

    fs::remove_dir_all(&dir).unwrap();
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn executable_defaults_to_a_out() {
    let dir = scratch_dir("default_exec");
    fake_tool(&dir, "nasm", "exit 0");
    // ld -o <output> <object>
    fake_tool(&dir, "ld", "echo linked > \"$2\"");

    bfc()
        .current_dir(&dir)
        .env("PATH", path_with(&dir))
        .write_stdin("+")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.join("a.out")).unwrap(), "linked\n");
    fs::remove_dir_all(&dir).unwrap();
}
