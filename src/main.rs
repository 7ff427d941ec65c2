use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use color_eyre::eyre::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ls8::memory::Ram;
use ls8::processor::Processor;

/// LS-8 emulator
#[derive(Parser)]
struct Args {
    /// Program object file to execute
    program: PathBuf,

    /// Dump PC, the next three memory bytes and all registers each cycle
    /// (shown at trace log level)
    #[arg(long)]
    trace: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let args = Args::parse();

    let log_level = if args.trace {
        LevelFilter::Trace
    } else {
        args.log_level
    };
    SimpleLogger::new().with_level(log_level).init()?; // logging

    let mut mem = match Ram::from_file(&args.program) {
        Ok(mem) => mem,
        Err(report) => {
            let not_found = report
                .downcast_ref::<io::Error>()
                .map(|err| err.kind() == io::ErrorKind::NotFound)
                .unwrap_or(false);
            if not_found {
                eprintln!("ls8: {} not found", args.program.display());
                process::exit(2);
            }
            return Err(report);
        }
    };

    let mut cpu = Processor::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.trace {
        while cpu.running {
            cpu.trace(&mem);
            cpu.execute(&mut mem, &mut out)?;
        }
    } else {
        cpu.run(&mut mem, &mut out)?;
    }

    Ok(())
}
