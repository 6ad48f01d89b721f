use std::env::args;
use std::io::Write;

use smolisa::assembler;
use smolisa::error::AssemblerError;

enum Error {
    Io(std::io::Error),
    Assembler(AssemblerError),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<AssemblerError> for Error {
    fn from(e: AssemblerError) -> Error {
        Error::Assembler(e)
    }
}

fn print_usage() {
    println!("smolisa-as: Assemble smolisa programs");
    println!();
    println!("Usage: smolisa-as [--help] <source>");
    println!();
    println!(" --help, -h  Display this help text.");
    println!("   <source>  The assembly source file.");
    println!();
    println!("The byte image is written to standard output.");
}

fn main() {
    let args: Vec<_> = args().collect();

    if args.len() == 1
        || args.iter().any(|arg| arg == "--help")
        || args.iter().any(|arg| arg == "-h")
    {
        print_usage();
        return;
    }

    let source_path = &args[1];

    match run(source_path) {
        Ok(()) => (),
        Err(Error::Io(io)) => {
            eprintln!("IO error: {}", io);
            std::process::exit(1);
        }
        Err(Error::Assembler(e)) => {
            eprintln!("assembler exited: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(source_path: &str) -> Result<(), Error> {
    let source = std::fs::read_to_string(source_path)?;
    let image = assembler::assemble(&source)?;

    let stdout = std::io::stdout();
    stdout.lock().write_all(&image)?;

    Ok(())
}
