use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{self, Command};

use crate::error::Error;

/// `nasm -f` output format for the host.
pub fn object_format() -> Option<&'static str> {
    if cfg!(target_os = "linux") {
        Some("elf64")
    } else if cfg!(target_os = "macos") {
        Some("macho64")
    } else {
        None
    }
}

/// Give up after this many names are found taken.
const TEMP_ATTEMPTS: u32 = 100;

/// Assembly and object files for one build; removed when dropped.
///
/// Both files are created with `create_new`, so an existing path (or a
/// symlink planted at a predictable name) is never opened or truncated.
struct TempFiles {
    asm: PathBuf,
    obj: PathBuf,
}

fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

impl TempFiles {
    /// Claims a fresh `bfc_asm_<pid>_<n>.asm` and its `.o` in `dir`. Returns
    /// the open assembly file alongside.
    fn create_in(dir: &Path) -> Result<(Self, File), Error> {
        let mut last = None;
        for n in 0..TEMP_ATTEMPTS {
            let asm = dir.join(format!("bfc_asm_{}_{}.asm", process::id(), n));
            let mut obj = asm.clone().into_os_string();
            obj.push(".o");
            let obj = PathBuf::from(obj);

            let file = match create_new(&asm) {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    last = Some((asm, err));
                    continue;
                }
                Err(err) => return Err(Error::io(asm, err)),
            };
            match create_new(&obj) {
                Ok(_) => return Ok((Self { asm, obj }, file)),
                Err(err) => {
                    let _ = fs::remove_file(&asm);
                    if err.kind() != io::ErrorKind::AlreadyExists {
                        return Err(Error::io(obj, err));
                    }
                    last = Some((obj, err));
                }
            }
        }
        let (path, err) = match last {
            Some(last) => last,
            None => (dir.to_path_buf(), io::ErrorKind::AlreadyExists.into()),
        };
        Err(Error::io(path, err))
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.asm);
        let _ = fs::remove_file(&self.obj);
    }
}

/// Runs one toolchain stage to completion.
fn run(stage: &'static str, command: &mut Command) -> Result<(), Error> {
    let status = command
        .status()
        .map_err(|source| Error::ToolchainSpawn { stage, source })?;
    if status.success() {
        Ok(())
    } else {
        // Killed by a signal if there is no code.
        Err(Error::Toolchain {
            stage,
            status: status.code().unwrap_or(-1),
        })
    }
}

pub fn assemble(asm: &Path, obj: &Path) -> Result<(), Error> {
    let format = object_format().ok_or(Error::UnsupportedPlatform)?;
    run(
        "nasm",
        Command::new("nasm")
            .arg("-f")
            .arg(format)
            .arg("-o")
            .arg(obj)
            .arg(asm),
    )
}

pub fn link(obj: &Path, out_name: &Path) -> Result<(), Error> {
    run("ld", Command::new("ld").arg("-o").arg(out_name).arg(obj))
}

/// Assembles and links `code` into the executable `out_name`.
pub fn asm_and_link(code: &str, out_name: &Path, verbose: bool) -> Result<(), Error> {
    let (tmp, mut file) = TempFiles::create_in(&env::temp_dir())?;
    file.write_all(code.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|err| Error::io(&tmp.asm, err))?;
    drop(file);

    if verbose {
        eprintln!("Assembling...");
    }
    assemble(&tmp.asm, &tmp.obj)?;

    if verbose {
        eprintln!("Linking...");
    }
    link(&tmp.obj, out_name)
}
