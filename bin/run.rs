use slog::{o, Drain, Logger};

use smolisa::emulator::{DebugTraceStyle, Emulator};
use smolisa::error::EmulatorError;
use smolisa::mmu::{Mmu, BANK_SIZE};

use std::env::args;

enum Error {
    Io(std::io::Error),
    ImageTooLarge(usize),
    Execution(EmulatorError),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

fn print_usage() {
    println!("smolisa-emu: Run smolisa byte images");
    println!();
    println!("Usage: smolisa-emu [--help] <image>");
    println!();
    println!(" --help, -h  Display this help text.");
    println!("    <image>  The raw byte image, loaded into bank 0 at address 0.");
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

    let image_path = &args[1];

    match run(image_path) {
        Ok(()) => (),
        Err(Error::Io(io)) => {
            eprintln!("IO error: {}", io);
            std::process::exit(1);
        }
        Err(Error::ImageTooLarge(size)) => {
            eprintln!("image is {} bytes, which does not fit in a 64 KiB bank", size);
            std::process::exit(1);
        }
        Err(Error::Execution(fault)) => {
            eprintln!("emulator exited: {}", fault);
            std::process::exit(1);
        }
    }
}

fn terminal_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

fn run(image_path: &str) -> Result<(), Error> {
    let image = std::fs::read(image_path)?;

    if image.len() > BANK_SIZE {
        return Err(Error::ImageTooLarge(image.len()));
    }

    let mut mmu = Mmu::new();
    mmu.load(0, 0, &image);

    let mut emulator = Emulator::with_logger(mmu, terminal_logger());

    match emulator.run() {
        Ok(()) => Ok(()),
        Err(fault) => {
            eprintln!("{}", emulator.debug_state(DebugTraceStyle::Multiline));
            Err(Error::Execution(fault))
        }
    }
}
