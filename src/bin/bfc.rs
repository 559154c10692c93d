use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{App, Arg};

use bfc::{assembly, compile, BufferConfig, Error};

struct Options {
    compile_to_exec: bool,
    output: Option<String>,
    input: Option<String>,
    config: BufferConfig,
    verbose: bool,
}

impl Options {
    fn match_options() -> Result<Self> {
        let matches = App::new("bfc")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Brainfuck compiler")
            .arg(
                Arg::with_name("output_asm")
                    .short("S")
                    .help("Output assembly instead of compiled executable"),
            )
            .arg(
                Arg::with_name("out_name")
                    .short("o")
                    .help("Output filename ('-' for stdout)")
                    .takes_value(true)
                    .empty_values(false)
                    .value_name("file"),
            )
            .arg(
                Arg::with_name("buffer_len")
                    .short("b")
                    .help("Length of the buffer available to the program")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .default_value("256")
                    .value_name("buffer_len"),
            )
            .arg(
                Arg::with_name("elem_bytes")
                    .short("e")
                    .help("Number of bytes in each element of the program's buffer (1, 2, 4 or 8)")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .default_value("1")
                    .value_name("buffer_elem_bytes"),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .help("Print progress to stderr"),
            )
            .arg(
                Arg::with_name("FILENAME")
                    .help("Brainfuck source (read stdin if not present)")
                    .index(1),
            )
            .get_matches();

        let config = BufferConfig::from_args(
            matches.value_of("buffer_len").unwrap_or("256"),
            matches.value_of("elem_bytes").unwrap_or("1"),
        )
        .map_err(Error::from)?;

        Ok(Options {
            compile_to_exec: !matches.is_present("output_asm"),
            output: matches.value_of("out_name").map(str::to_string),
            input: matches.value_of("FILENAME").map(str::to_string),
            config,
            verbose: matches.is_present("verbose"),
        })
    }

    fn get_output(&self) -> &str {
        match self.output.as_ref() {
            Some(output) => output,
            None if self.compile_to_exec => "a.out",
            None => "a.asm",
        }
    }
}

fn read_input(input: Option<&str>) -> Result<Vec<u8>, Error> {
    let mut code = Vec::new();
    match input {
        Some(path) => File::open(path)
            .and_then(|mut file| file.read_to_end(&mut code))
            .map_err(|err| Error::io(path, err))?,
        None => io::stdin()
            .read_to_end(&mut code)
            .map_err(|err| Error::io("<stdin>", err))?,
    };
    Ok(code)
}

fn open_output_file(name: &str) -> Result<Box<dyn Write>, Error> {
    if name == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        let file = File::create(name).map_err(|err| Error::io(name, err))?;
        Ok(Box::new(file))
    }
}

fn run() -> Result<()> {
    let options = Options::match_options()?;
    let code = read_input(options.input.as_deref())?;

    if options.verbose {
        eprintln!("Compiling...");
    }
    let output = compile(&code, &options.config).map_err(Error::from)?;

    let out_name = options.get_output();
    if options.compile_to_exec && out_name != "-" {
        assembly::asm_and_link(&output, Path::new(out_name), options.verbose)?;
    } else {
        let mut asmfile = open_output_file(out_name)?;
        asmfile
            .write_all(output.as_bytes())
            .and_then(|()| asmfile.flush())
            .map_err(|err| Error::io(PathBuf::from(out_name), err))?;
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("bfc: {}", err);
        let code = match err.downcast_ref::<Error>() {
            Some(Error::Toolchain { status, .. }) if *status > 0 => *status,
            _ => 1,
        };
        process::exit(code);
    }
}
